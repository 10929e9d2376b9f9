//! Program algebra: normalisation, concatenation and relocation.
//!
//! All three are pure; they borrow their inputs and build a fresh
//! [`Program`]. Together they are enough to assemble larger machines out of
//! small, separately checked fragments:
//!
//! ```
//! use urm::algebra::{concatenate, relocate};
//! use urm::instruction::Instruction::*;
//! use urm::program::Program;
//!
//! // r0 ← r1 + r2
//! let add: Program = vec![Copy(2, 0), Zero(2), Jump(1, 2, 0), Successor(0), Successor(2), Jump(3, 3, 3)].into();
//! // same thing on r3..r6
//! let moved = relocate(&add, &[3, 4, 5, 6]).unwrap();
//! let both = concatenate(&add, &moved);
//! assert_eq!(both.len(), 12);
//! ```

use std::ops::Add;

use crate::error::{Error, Result};
use crate::instruction::{Address, Instruction};
use crate::program::Program;
use crate::region::Region;

/// Rewrites every jump target outside `[1, len]` to `len + 1`
pub fn normalize(program: &Program) -> Program {
  let len = program.len();
  program
    .iter()
    .map(|i| i.map_target(|q| if (1..=len).contains(&q) { q } else { len + 1 }))
    .collect()
}

/// Builds a program that runs `p` to completion and then falls into `q`
///
/// `p` is normalised first so that every way out of it lands on the first
/// line of `q`. Jumps inside `q` are shifted by the length of `p`, except for
/// a target of `0`, which is kept as is.
pub fn concatenate(p: &Program, q: &Program) -> Program {
  if p.is_empty() {
    return q.clone();
  }
  let prefix = normalize(p);
  let offset = prefix.len();
  let suffix = q
    .iter()
    .map(|i| i.map_target(|t| if t == 0 { 0 } else { t.saturating_add(offset) }));
  prefix.iter().copied().chain(suffix).collect()
}

/// Renames every register operand `r` of `program` to `mapping[r]`
///
/// `mapping` must have exactly `haddr + 1` entries (none for a program that
/// references no registers). Jump targets are left untouched.
pub fn relocate(program: &Program, mapping: &[Address]) -> Result<Program> {
  let expected = match program.haddr() {
    Some(highest) => highest.checked_add(1).ok_or_else(|| {
      Error::Validation(format!("register {highest} cannot be relocated"))
    })?,
    None => 0,
  };
  if mapping.len() != expected {
    return Err(Error::Validation(format!(
      "relocation mapping has {} entries, program needs {expected}",
      mapping.len()
    )));
  }
  program
    .instructions()
    .iter()
    .map(|i| {
      i.map_registers(|r| {
        mapping
          .get(r)
          .copied()
          .ok_or_else(|| Error::Validation(format!("register {r} has no relocation entry")))
      })
    })
    .collect::<Result<Vec<Instruction>>>()
    .map(Program::from)
}

impl Add for &Program {
  type Output = Program;

  fn add(self, rhs: Self) -> Program {
    concatenate(self, rhs)
  }
}

impl Add for Program {
  type Output = Program;

  fn add(self, rhs: Program) -> Program {
    concatenate(&self, &rhs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use Instruction::*;

  fn predecessor() -> Program {
    vec![Jump(0, 1, 0), Successor(2), Jump(1, 2, 0), Successor(0), Successor(2), Jump(0, 0, 3)].into()
  }

  mod normalize {
    use super::*;

    #[test]
    fn rewrites_out_of_range_targets() {
      let program: Program = vec![Jump(0, 1, 0), Zero(1), Jump(1, 2, 9), Jump(0, 0, 3)].into();
      let normal = normalize(&program);
      assert_eq!(
        normal.instructions(),
        &[Jump(0, 1, 5), Zero(1), Jump(1, 2, 5), Jump(0, 0, 3)]
      );
    }

    #[test]
    fn leaves_input_alone() {
      let program = predecessor();
      let before = program.clone();
      let _ = normalize(&program);
      assert_eq!(program, before);
    }

    #[test]
    fn is_idempotent() {
      let once = normalize(&predecessor());
      assert_eq!(normalize(&once), once);
    }

    #[test]
    fn empty() {
      assert!(normalize(&Program::empty()).is_empty());
    }
  }

  mod concatenate {
    use super::*;

    #[test]
    fn empty_prefix_returns_suffix_verbatim() {
      let q = predecessor();
      assert_eq!(concatenate(&Program::empty(), &q), q);
    }

    #[test]
    fn empty_suffix_returns_normalized_prefix() {
      let p = predecessor();
      assert_eq!(concatenate(&p, &Program::empty()), normalize(&p));
    }

    #[test]
    fn shifts_suffix_jumps() {
      let p: Program = vec![Zero(0), Jump(0, 0, 7)].into();
      let q: Program = vec![Successor(1), Jump(1, 2, 1), Jump(1, 2, 5)].into();
      let pq = concatenate(&p, &q);
      assert_eq!(
        pq.instructions(),
        &[Zero(0), Jump(0, 0, 3), Successor(1), Jump(1, 2, 3), Jump(1, 2, 7)]
      );
    }

    // a zero target inside the suffix is kept literally, never shifted
    #[test]
    fn keeps_zero_target_in_suffix() {
      let p = predecessor();
      let q = predecessor();
      let pq = concatenate(&p, &q);
      assert_eq!(pq.len(), 12);
      assert_eq!(pq.line(7), Some(&Jump(0, 1, 0)));
      assert_eq!(pq.line(9), Some(&Jump(1, 2, 0)));
      assert_eq!(pq.line(12), Some(&Jump(0, 0, 9)));
      // while the prefix's zero targets were normalised to fall through
      assert_eq!(pq.line(1), Some(&Jump(0, 1, 7)));
      assert_eq!(pq.line(3), Some(&Jump(1, 2, 7)));
    }

    // shifting saturates, and a saturated target still lies past the end
    #[test]
    fn huge_target_stays_out_of_range() {
      let p: Program = vec![Zero(0)].into();
      let q: Program = vec![Jump(0, 0, usize::MAX), Jump(0, 0, usize::MAX - 1)].into();
      let pq = concatenate(&p, &q);
      assert_eq!(pq.line(2), Some(&Jump(0, 0, usize::MAX)));
      assert_eq!(pq.line(3), Some(&Jump(0, 0, usize::MAX)));
    }

    #[test]
    fn add_operator() {
      let p = predecessor();
      let q: Program = vec![Copy(0, 1)].into();
      assert_eq!(&p + &q, concatenate(&p, &q));
      assert_eq!(p.clone() + q.clone(), concatenate(&p, &q));
    }

    #[test]
    fn is_associative() {
      let p = predecessor();
      let q: Program = vec![Copy(0, 1), Zero(0), Jump(2, 2, 0), Jump(0, 1, 40)].into();
      let r = predecessor();
      let left = concatenate(&concatenate(&p, &q), &r);
      let right = concatenate(&p, &concatenate(&q, &r));
      assert_eq!(left, right);
    }
  }

  mod relocate {
    use super::*;

    #[test]
    fn renames_registers_not_targets() {
      let moved = relocate(&predecessor(), &[3, 5, 4]).unwrap();
      assert_eq!(
        moved.instructions(),
        &[Jump(3, 5, 0), Successor(4), Jump(5, 4, 0), Successor(3), Successor(4), Jump(3, 3, 3)]
      );
    }

    #[test]
    fn wrong_mapping_length() {
      let err = relocate(&predecessor(), &[3, 4]).unwrap_err();
      assert!(matches!(err, Error::Validation(_)));
      let err = relocate(&predecessor(), &[3, 4, 5, 6]).unwrap_err();
      assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn highest_address_register() {
      let program: Program = vec![Successor(usize::MAX)].into();
      let err = relocate(&program, &[0]).unwrap_err();
      assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn register_free_program_takes_empty_mapping() {
      assert_eq!(relocate(&Program::empty(), &[]).unwrap(), Program::empty());
      assert!(relocate(&Program::empty(), &[0]).is_err());
    }
  }
}
