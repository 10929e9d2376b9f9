//! Worked example programs shared by the integration tests.
//!
//! Inputs live in `r1` (and `r2`), the answer ends up in `r0`.

#![allow(dead_code)]

use urm::instruction::Instruction::{self, *};
use urm::program::Program;
use urm::registers::{Inputs, Natural, RegisterBank};
use urm::vm::{self, Execution};

pub const LIMIT: u64 = 10_000;

/// `r0 ← max(r1 - 1, 0)`
pub fn predecessor() -> Program {
  vec![Jump(0, 1, 0), Successor(2), Jump(1, 2, 0), Successor(0), Successor(2), Jump(0, 0, 3)].into()
}

/// `r0 ← r1 + r2`
pub fn addition() -> Program {
  vec![Copy(2, 0), Zero(2), Jump(1, 2, 0), Successor(0), Successor(2), Jump(3, 3, 3)].into()
}

/// `r0 ← r1 × r2`
pub fn multiplication() -> Program {
  #[rustfmt::skip]
  let instructions = vec![
    Jump(1, 3, 12),
    Jump(2, 3, 11),
    Copy(1, 3),
    Successor(5),
    Jump(2, 5, 11),
    Zero(4),
    Successor(3),
    Successor(4),
    Jump(1, 4, 4),
    Jump(1, 1, 7),
    Copy(3, 1),
    Zero(2),
    Zero(3),
    Zero(4),
    Zero(5),
    Copy(1, 0),
  ];
  instructions.into()
}

/// `r0 ← max(r1 - r2, 0)`
pub fn subtraction() -> Program {
  #[rustfmt::skip]
  let instructions = vec![
    Copy(1, 4),
    Jump(3, 2, 14),
    Jump(5, 4, 10),
    Successor(5),
    Jump(5, 4, 9),
    Successor(5),
    Successor(0),
    Jump(0, 0, 5),
    Zero(5),
    Successor(3),
    Copy(0, 4),
    Zero(0),
    Jump(0, 0, 2),
    Copy(4, 0),
  ];
  instructions.into()
}

/// `r0 ← 1` if `r1 > r2`, else `0`
pub fn greater_than() -> Program {
  #[rustfmt::skip]
  let instructions = vec![
    Zero(0),
    // either side at zero decides it
    Jump(1, 0, 25),
    Jump(2, 0, 24),
    // r1 ← r1 - 1
    Zero(3),
    Jump(3, 1, 25),
    Successor(4),
    Jump(1, 4, 11),
    Successor(3),
    Successor(4),
    Jump(0, 0, 7),
    Copy(3, 1),
    Zero(4),
    // r2 ← r2 - 1
    Zero(3),
    Jump(3, 2, 25),
    Successor(4),
    Jump(2, 4, 20),
    Successor(3),
    Successor(4),
    Jump(0, 0, 16),
    Copy(3, 2),
    Zero(4),
    Zero(3),
    Jump(0, 0, 2),
    Successor(0),
  ];
  instructions.into()
}

/// `r0 ← fib(r1)`
pub fn fibonacci() -> Program {
  #[rustfmt::skip]
  let instructions = vec![
    Jump(1, 0, 0),
    Successor(0),
    Jump(1, 0, 0),
    Successor(2),
    // loop until r2 = r1
    Jump(1, 2, 0),
    Successor(2),
    Copy(0, 4),
    Zero(0),
    Zero(5),
    Copy(4, 0),
    // r0 ← r0 + r3
    Jump(5, 3, 15),
    Successor(0),
    Successor(5),
    Jump(1, 1, 11),
    Copy(4, 3),
    Jump(2, 2, 5),
  ];
  instructions.into()
}

/// Runs `program` on a freshly allocated bank with `args` in `r1, r2, ...`
pub fn run(program: &Program, args: &[Natural]) -> Execution {
  let bank = RegisterBank::for_region(program).unwrap();
  let inputs: Inputs = args.iter().enumerate().map(|(i, &v)| (i + 1, v)).collect();
  vm::execute(program, &bank, &inputs, LIMIT).unwrap()
}

pub fn program(instructions: &[Instruction]) -> Program {
  instructions.to_vec().into()
}
