use crate::instruction::{Address, Instruction};

/// A region of instructions the machine can execute
pub trait Region {
  fn instructions(&self) -> &[Instruction];

  /// Highest register referenced by any instruction, `None` if the region
  /// references no registers at all
  fn haddr(&self) -> Option<Address> {
    self
      .instructions()
      .iter()
      .map(Instruction::highest_register)
      .max()
  }
}

impl Region for [Instruction] {
  fn instructions(&self) -> &[Instruction] {
    self
  }
}

impl Region for Vec<Instruction> {
  fn instructions(&self) -> &[Instruction] {
    self
  }
}

impl<R> Region for &R
where
  R: Region + ?Sized,
{
  fn instructions(&self) -> &[Instruction] {
    (**self).instructions()
  }
}
