use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The tag of an instruction, as it appears in program documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
  /// Resets a register.
  ///
  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Zero      | `r[n] ← 0`    | `Z(n)`   |
  Zero,

  /// Increments a register.
  ///
  /// | Operation | Semantics/RTL     | Assembly |
  /// |-----------|-------------------|----------|
  /// | Successor | `r[n] ← r[n] + 1` | `S(n)`   |
  Successor,

  /// Copies one register into another.
  ///
  /// | Operation | Semantics/RTL | Assembly  |
  /// |-----------|---------------|-----------|
  /// | Copy      | `r[k] ← r[j]` | `C(j, k)` |
  Copy,

  /// Jumps to a 1-based line if two registers hold the same value.
  ///
  /// | Operation | Semantics/RTL                  | Assembly     |
  /// |-----------|--------------------------------|--------------|
  /// | Jump      | `if r[m] = r[n] : pc ← q`      | `J(m, n, q)` |
  ///
  /// - A target of `0`, or past the last line, halts the machine.
  Jump,
}

impl Opcode {
  /// The single-letter mnemonic
  pub const fn mnemonic(self) -> &'static str {
    match self {
      Self::Zero => "Z",
      Self::Successor => "S",
      Self::Copy => "C",
      Self::Jump => "J",
    }
  }

  /// Number of positional parameters the instruction takes
  pub const fn arity(self) -> usize {
    match self {
      Self::Zero | Self::Successor => 1,
      Self::Copy => 2,
      Self::Jump => 3,
    }
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.mnemonic())
  }
}

impl FromStr for Opcode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Z" => Ok(Self::Zero),
      "S" => Ok(Self::Successor),
      "C" => Ok(Self::Copy),
      "J" => Ok(Self::Jump),
      other => Err(Error::Construction(format!("unknown operator `{other}`"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_mnemonics() {
    for op in [Opcode::Zero, Opcode::Successor, Opcode::Copy, Opcode::Jump] {
      assert_eq!(op.mnemonic().parse::<Opcode>().ok(), Some(op));
    }
  }

  #[test]
  fn parse_unknown() {
    assert!(matches!("X".parse::<Opcode>(), Err(Error::Construction(_))));
    // mnemonics are case sensitive
    assert!("z".parse::<Opcode>().is_err());
  }

  #[test]
  fn arity() {
    assert_eq!(Opcode::Zero.arity(), 1);
    assert_eq!(Opcode::Successor.arity(), 1);
    assert_eq!(Opcode::Copy.arity(), 2);
    assert_eq!(Opcode::Jump.arity(), 3);
  }
}
