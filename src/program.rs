//! Immutable URM programs and their construction.

use std::fmt::{self, Write as _};

use crate::error::Result;
use crate::instruction::{Address, Instruction};
use crate::opcode::Opcode;
use crate::region::Region;

/// An ordered sequence of instructions
///
/// Once built a `Program` is only ever read: the algebra in
/// [`crate::algebra`] returns new values instead of editing existing ones,
/// and the machine borrows it for the length of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Program {
  instructions: Vec<Instruction>,
}

/// One piece of a program under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
  Instruction(Instruction),
  Sequence(Vec<Instruction>),
  Program(Program),
  /// An operator tag plus positional parameters, checked when the program
  /// is built
  Tagged(String, Vec<i64>),
}

impl Program {
  /// Flattens `elements` in order into a single program
  ///
  /// Fails without producing anything if any element is malformed.
  pub fn new<I>(elements: I) -> Result<Self>
  where
    I: IntoIterator<Item = Element>,
  {
    let mut instructions = Vec::new();
    for element in elements {
      match element {
        Element::Instruction(i) => instructions.push(i),
        Element::Sequence(seq) => instructions.extend(seq),
        Element::Program(p) => instructions.extend(p.instructions),
        Element::Tagged(operator, params) => {
          let opcode: Opcode = operator.parse()?;
          instructions.push(Instruction::from_parts(opcode, &params)?);
        }
      }
    }
    Ok(Self { instructions })
  }

  /// A program with no instructions
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

  /// The instruction on a 1-based `line`
  pub fn line(&self, line: usize) -> Option<&Instruction> {
    line.checked_sub(1).and_then(|i| self.instructions.get(i))
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
    self.instructions.iter()
  }

  /// Highest register referenced by the program
  pub fn haddr(&self) -> Option<Address> {
    Region::haddr(self)
  }

  /// Appends a single instruction while the program is still being built
  pub fn push(&mut self, instruction: Instruction) {
    self.instructions.push(instruction);
  }

  pub fn into_instructions(self) -> Vec<Instruction> {
    self.instructions
  }

  /// Renders the program as a `Line / Op / Arg1 / Arg2 / Jump To` table
  pub fn summary(&self) -> String {
    let mut table = format!(
      "{:<5}\t{:<3}\t{:<4}\t{:<4}\t{:<7}\n",
      "Line", "Op", "Arg1", "Arg2", "Jump To"
    );
    table.push_str(&"-".repeat(40));
    table.push('\n');
    for (index, instruction) in self.instructions.iter().enumerate() {
      let mut args = [String::new(), String::new(), String::new()];
      for (slot, param) in args.iter_mut().zip(instruction.params()) {
        *slot = param.to_string();
      }
      table.push_str(&format!(
        "{:<5}\t{:<3}\t{:<4}\t{:<4}\t{:<7}\n",
        index + 1,
        instruction.opcode(),
        args[0],
        args[1],
        args[2]
      ));
    }
    table
  }
}

impl Region for Program {
  fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }
}

impl From<Vec<Instruction>> for Program {
  fn from(instructions: Vec<Instruction>) -> Self {
    Self { instructions }
  }
}

impl FromIterator<Instruction> for Program {
  fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
    Self {
      instructions: iter.into_iter().collect(),
    }
  }
}

impl Extend<Instruction> for Program {
  fn extend<T: IntoIterator<Item = Instruction>>(&mut self, iter: T) {
    self.instructions.extend(iter);
  }
}

impl<'a> IntoIterator for &'a Program {
  type Item = &'a Instruction;
  type IntoIter = std::slice::Iter<'a, Instruction>;

  fn into_iter(self) -> Self::IntoIter {
    self.instructions.iter()
  }
}

impl From<Instruction> for Element {
  fn from(instruction: Instruction) -> Self {
    Self::Instruction(instruction)
  }
}

impl From<Vec<Instruction>> for Element {
  fn from(sequence: Vec<Instruction>) -> Self {
    Self::Sequence(sequence)
  }
}

impl From<Program> for Element {
  fn from(program: Program) -> Self {
    Self::Program(program)
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('[')?;
    for (i, instruction) in self.instructions.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{instruction}")?;
    }
    f.write_char(']')
  }
}
