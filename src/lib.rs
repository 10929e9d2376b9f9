//! Unlimited Register Machine (URM) simulator
//!
//! A URM has as many natural-number registers as it needs and four
//! instructions: zero, successor, copy and conditional jump. Small programs
//! can be glued together with [`algebra`] (normalise, concatenate, relocate)
//! and run on a [`vm::Vm`], which records a full trace and gives up after a
//! fixed number of steps instead of looping forever.
//!
//! ```
//! use urm::instruction::Instruction::*;
//! use urm::program::Program;
//! use urm::registers::{Inputs, RegisterBank};
//! use urm::vm;
//!
//! // r0 ← r1 + r2
//! let add: Program = vec![Copy(2, 0), Zero(2), Jump(1, 2, 0), Successor(0), Successor(2), Jump(3, 3, 3)].into();
//! let bank = RegisterBank::for_region(&add).unwrap();
//! let inputs = Inputs::from([(1, 5), (2, 7)]);
//! let execution = vm::execute(&add, &bank, &inputs, vm::DEFAULT_SAFETY_LIMIT).unwrap();
//! assert_eq!(execution.registers[0], 12);
//! ```

pub mod algebra;
pub mod document;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod region;
pub mod registers;
pub mod vm;

pub use error::{Error, Result};
