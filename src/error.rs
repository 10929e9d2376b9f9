use crate::instruction::Instruction;
use crate::vm::Execution;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while building, transforming or running a program
///
/// Every variant is produced before the offending state change is applied,
/// so a caller never observes a half-built program or a half-written bank.
#[derive(thiserror::Error, Debug)]
pub enum Error {
  /// A program element or document entry could not be turned into an
  /// instruction (unknown operator, wrong arity, negative operand...).
  #[error("construction error: {0}")]
  Construction(String),

  /// The register bank cannot hold every register the program references.
  #[error("program references register {highest} but the bank only has {available} registers")]
  Configuration { highest: usize, available: usize },

  /// A value or mapping was rejected before it was written anywhere.
  #[error("validation error: {0}")]
  Validation(String),

  /// The run executed `limit` steps without halting.
  ///
  /// The partial execution (trace so far, bank at the moment of the abort)
  /// is kept so it can still be inspected.
  #[error("exceeded the safety limit of {limit} steps")]
  NonTermination {
    limit: u64,
    partial: Box<Execution>,
  },

  /// An instruction could not be applied for a reason not covered above.
  #[error("failed to execute `{instruction}` at line {line}")]
  Execution {
    /// 1-based line of the offending instruction
    line: usize,
    instruction: Instruction,
    #[source]
    source: Fault,
  },
}

impl From<serde_json::Error> for Error {
  fn from(err: serde_json::Error) -> Self {
    Self::Construction(err.to_string())
  }
}

/// The low-level reason a single instruction failed to apply
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
  #[error("register {index} is outside a bank of {len} registers")]
  RegisterOutOfBounds { index: usize, len: usize },

  #[error("register {index} overflowed")]
  Overflow { index: usize },
}
