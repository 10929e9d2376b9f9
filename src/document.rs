//! The JSON interchange format used by front ends.
//!
//! A program document looks like
//!
//! ```json
//! {
//!   "instructions": [
//!     { "operator": "C", "params": [2, 0] },
//!     { "operator": "J", "params": [1, 2, 0] }
//!   ],
//!   "safetyLimit": 10000
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::program::{Element, Program};
use crate::registers::{Natural, RegisterBank};
use crate::vm::{Execution, DEFAULT_SAFETY_LIMIT};

/// One instruction: an operator tag plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  pub operator: String,
  pub params: Vec<i64>,
}

/// A program together with the safety limit it should run under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDocument {
  pub instructions: Vec<Entry>,
  #[serde(default = "default_safety_limit")]
  pub safety_limit: u64,
}

fn default_safety_limit() -> u64 {
  DEFAULT_SAFETY_LIMIT
}

impl ProgramDocument {
  pub fn from_json(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Validates every entry and builds the program
  pub fn build(&self) -> Result<(Program, u64)> {
    let elements = self
      .instructions
      .iter()
      .map(|entry| Element::Tagged(entry.operator.clone(), entry.params.clone()));
    Ok((Program::new(elements)?, self.safety_limit))
  }

  /// The inverse of [`ProgramDocument::build`]
  pub fn from_program(program: &Program, safety_limit: u64) -> Result<Self> {
    let instructions = program
      .iter()
      .map(Entry::try_from)
      .collect::<Result<Vec<_>>>()?;
    Ok(Self {
      instructions,
      safety_limit,
    })
  }
}

impl TryFrom<&Instruction> for Entry {
  type Error = Error;

  fn try_from(instruction: &Instruction) -> Result<Self> {
    let params = instruction
      .params()
      .into_iter()
      .map(|p| {
        i64::try_from(p)
          .map_err(|_| Error::Construction(format!("parameter {p} of `{instruction}` is too large")))
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(Self {
      operator: instruction.opcode().mnemonic().to_string(),
      params,
    })
  }
}

impl TryFrom<&Entry> for Instruction {
  type Error = Error;

  fn try_from(entry: &Entry) -> Result<Self> {
    let opcode: Opcode = entry.operator.parse()?;
    Instruction::from_parts(opcode, &entry.params)
  }
}

/// Parses a program document straight from JSON
pub fn load(json: &str) -> Result<(Program, u64)> {
  ProgramDocument::from_json(json)?.build()
}

/// Builds a register bank from loosely typed JSON values, accepting only
/// non-negative integers
pub fn parse_registers(values: &[serde_json::Value]) -> Result<RegisterBank> {
  values
    .iter()
    .enumerate()
    .map(|(i, value)| {
      value
        .as_u64()
        .ok_or_else(|| Error::Validation(format!("register {i}: {value} is not a natural number")))
    })
    .collect::<Result<Vec<Natural>>>()
    .map(RegisterBank::new)
}

/// Everything a presentation layer needs to replay a run without executing
/// it again
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  pub program: ProgramDocument,
  pub steps: u64,
  /// `Initial` followed by one description per executed step
  pub operations: Vec<String>,
  /// Bank snapshots lined up with `operations`
  pub registers: Vec<RegisterBank>,
  pub last_registers: RegisterBank,
}

impl Report {
  /// Fails for a batch run, which records no trace to replay
  pub fn new(program: &Program, safety_limit: u64, execution: &Execution) -> Result<Self> {
    let trace = execution.trace.as_deref().ok_or_else(|| {
      Error::Validation("a report needs a stepwise execution with a trace".to_string())
    })?;
    Ok(Self {
      program: ProgramDocument::from_program(program, safety_limit)?,
      steps: execution.steps,
      operations: trace.iter().map(|s| s.label()).collect(),
      registers: trace.iter().map(|s| s.registers.clone()).collect(),
      last_registers: execution.registers.clone(),
    })
  }
}
