use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::opcode::Opcode;

/// Index of a register in a bank
pub type Address = usize;

/// 1-based line a jump lands on; `0` or anything past the end halts
pub type Line = usize;

/// A single machine instruction
///
/// Register operands come first; a jump's target line is never a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
  /// `r[n] ← 0`
  Zero(Address),
  /// `r[n] ← r[n] + 1`
  Successor(Address),
  /// `r[dst] ← r[src]`, operands are `(src, dst)`
  Copy(Address, Address),
  /// `if r[a] = r[b] : goto q`, operands are `(a, b, q)`
  Jump(Address, Address, Line),
}

impl Instruction {
  pub const fn opcode(&self) -> Opcode {
    match self {
      Self::Zero(_) => Opcode::Zero,
      Self::Successor(_) => Opcode::Successor,
      Self::Copy(..) => Opcode::Copy,
      Self::Jump(..) => Opcode::Jump,
    }
  }

  /// Highest register operand of this instruction
  pub fn highest_register(&self) -> Address {
    match *self {
      Self::Zero(n) | Self::Successor(n) => n,
      Self::Copy(a, b) | Self::Jump(a, b, _) => a.max(b),
    }
  }

  /// Rewrite every register operand through `f`, leaving jump targets alone
  pub fn map_registers<F>(&self, mut f: F) -> Result<Self>
  where
    F: FnMut(Address) -> Result<Address>,
  {
    Ok(match *self {
      Self::Zero(n) => Self::Zero(f(n)?),
      Self::Successor(n) => Self::Successor(f(n)?),
      Self::Copy(s, d) => Self::Copy(f(s)?, f(d)?),
      Self::Jump(a, b, q) => Self::Jump(f(a)?, f(b)?, q),
    })
  }

  /// Rewrite the target of a jump through `f`; other instructions are
  /// returned unchanged
  pub fn map_target<F>(&self, f: F) -> Self
  where
    F: FnOnce(Line) -> Line,
  {
    match *self {
      Self::Jump(a, b, q) => Self::Jump(a, b, f(q)),
      other => other,
    }
  }

  /// The positional parameters, in document order
  pub fn params(&self) -> Vec<usize> {
    match *self {
      Self::Zero(n) | Self::Successor(n) => vec![n],
      Self::Copy(s, d) => vec![s, d],
      Self::Jump(a, b, q) => vec![a, b, q],
    }
  }

  /// Builds an instruction from a tag and loosely typed positional
  /// parameters, checking arity and sign
  pub fn from_parts(opcode: Opcode, params: &[i64]) -> Result<Self> {
    if params.len() != opcode.arity() {
      return Err(Error::Construction(format!(
        "`{opcode}` takes {} parameter(s), got {}",
        opcode.arity(),
        params.len()
      )));
    }
    let mut operands = Vec::with_capacity(params.len());
    for &p in params {
      let p = usize::try_from(p).map_err(|_| {
        Error::Construction(format!("`{opcode}` parameter {p} is not a natural number"))
      })?;
      operands.push(p);
    }
    Ok(match (opcode, operands.as_slice()) {
      (Opcode::Zero, &[n]) => Self::Zero(n),
      (Opcode::Successor, &[n]) => Self::Successor(n),
      (Opcode::Copy, &[s, d]) => Self::Copy(s, d),
      (Opcode::Jump, &[a, b, q]) => Self::Jump(a, b, q),
      // arity was checked above
      _ => return Err(Error::Construction(format!("malformed `{opcode}` instruction"))),
    })
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::Zero(n) | Self::Successor(n) => write!(f, "{}({n})", self.opcode()),
      Self::Copy(s, d) => write!(f, "{}({s}, {d})", self.opcode()),
      Self::Jump(a, b, q) => write!(f, "{}({a}, {b}, {q})", self.opcode()),
    }
  }
}
