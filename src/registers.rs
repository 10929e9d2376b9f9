use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Fault, Result};
use crate::instruction::Address;
use crate::region::Region;

/// The type of a single register in our machine
pub type Natural = u64;

/// Explicit initial values for specific registers, applied on top of a bank
pub type Inputs = BTreeMap<Address, Natural>;

/// A fixed-size, zero-indexed bank of natural-number registers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterBank {
  registers: Vec<Natural>,
}

impl RegisterBank {
  pub fn new(registers: Vec<Natural>) -> Self {
    Self { registers }
  }

  /// `count` registers, all zero
  pub fn allocate(count: usize) -> Self {
    Self {
      registers: vec![0; count],
    }
  }

  /// Just enough zeroed registers to run `region`
  pub fn for_region<R>(region: &R) -> Result<Self>
  where
    R: Region + ?Sized,
  {
    let count = match region.haddr() {
      Some(highest) => highest.checked_add(1).ok_or_else(|| {
        Error::Validation(format!("register {highest} cannot be allocated"))
      })?,
      None => 0,
    };
    Ok(Self::allocate(count))
  }

  pub fn len(&self) -> usize {
    self.registers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registers.is_empty()
  }

  pub fn get(&self, index: Address) -> Option<Natural> {
    self.registers.get(index).copied()
  }

  pub fn as_slice(&self) -> &[Natural] {
    &self.registers
  }

  pub fn into_vec(self) -> Vec<Natural> {
    self.registers
  }

  /// Writes `value` into register `index`
  pub fn set(&mut self, index: Address, value: Natural) -> Result<()> {
    let len = self.len();
    let slot = self.registers.get_mut(index).ok_or_else(|| {
      Error::Validation(format!("register {index} is outside a bank of {len} registers"))
    })?;
    *slot = value;
    Ok(())
  }

  /// Applies every override in `inputs`, or none of them if any index is
  /// out of range
  pub fn apply(&mut self, inputs: &Inputs) -> Result<()> {
    if let Some((&index, _)) = inputs.range(self.len()..).next() {
      return Err(Error::Validation(format!(
        "input register {index} is outside a bank of {} registers",
        self.len()
      )));
    }
    for (&index, &value) in inputs {
      self.registers[index] = value;
    }
    Ok(())
  }

  pub(crate) fn read(&self, index: Address) -> std::result::Result<Natural, Fault> {
    self.get(index).ok_or(Fault::RegisterOutOfBounds {
      index,
      len: self.len(),
    })
  }

  pub(crate) fn write(&mut self, index: Address, value: Natural) -> std::result::Result<(), Fault> {
    let len = self.len();
    let slot = self
      .registers
      .get_mut(index)
      .ok_or(Fault::RegisterOutOfBounds { index, len })?;
    *slot = value;
    Ok(())
  }

  /// Renders the bank as an `R0 R1 ...` header over its values
  pub fn summary(&self) -> String {
    let headers: Vec<String> = (0..self.len()).map(|i| format!("R{i}")).collect();
    let values: Vec<String> = self.registers.iter().map(Natural::to_string).collect();
    let divider = "-".repeat((self.len() * 8).saturating_sub(1));
    format!("{}\n{divider}\n{}", headers.join("\t"), values.join("\t"))
  }
}

impl From<Vec<Natural>> for RegisterBank {
  fn from(registers: Vec<Natural>) -> Self {
    Self::new(registers)
  }
}

impl TryFrom<Vec<i64>> for RegisterBank {
  type Error = Error;

  fn try_from(values: Vec<i64>) -> Result<Self> {
    values
      .into_iter()
      .enumerate()
      .map(|(i, v)| {
        Natural::try_from(v)
          .map_err(|_| Error::Validation(format!("register {i} holds negative value {v}")))
      })
      .collect::<Result<Vec<_>>>()
      .map(Self::new)
  }
}

impl Index<Address> for RegisterBank {
  type Output = Natural;

  fn index(&self, index: Address) -> &Natural {
    &self.registers[index]
  }
}

impl fmt::Display for RegisterBank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.registers)
  }
}
