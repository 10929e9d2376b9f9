use std::fmt;

use serde::Serialize;

use crate::error::{Error, Fault, Result};
use crate::instruction::{Instruction, Line};
use crate::region::Region;
use crate::registers::{Inputs, RegisterBank};

/// Steps a run may take when the caller does not pick a limit
pub const DEFAULT_SAFETY_LIMIT: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  Active,
  Halted,
}

/// The register bank at one point of a run, and what got it there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
  /// 1-based line of the instruction just executed, `None` before the first
  /// step
  pub line: Option<Line>,
  pub instruction: Option<Instruction>,
  /// `Initial`, or the executed instruction such as `J(0, 1, 7)`
  pub description: String,
  pub registers: RegisterBank,
}

impl Snapshot {
  fn initial(registers: RegisterBank) -> Self {
    Self {
      line: None,
      instruction: None,
      description: "Initial".to_string(),
      registers,
    }
  }

  fn after(line: Line, instruction: Instruction, registers: RegisterBank) -> Self {
    Self {
      line: Some(line),
      instruction: Some(instruction),
      description: instruction.to_string(),
      registers,
    }
  }
}

impl Snapshot {
  /// The description prefixed with the executed line, e.g. `[3]S(0)`
  pub fn label(&self) -> String {
    match self.line {
      Some(line) => format!("[{line}]{}", self.description),
      None => self.description.clone(),
    }
  }
}

impl fmt::Display for Snapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.label(), self.registers)
  }
}

/// The outcome of a run
///
/// `trace` is only recorded by the stepwise mode; its first entry is the
/// bank before any instruction ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
  pub steps: u64,
  pub trace: Option<Vec<Snapshot>>,
  pub registers: RegisterBank,
}

/// An unlimited register machine bound to one program.
///
/// The machine owns a private copy of the register bank it was started with;
/// the caller's bank is never touched, and the program is only borrowed.
/// Runs are bounded by a safety limit, since whether a program halts cannot
/// be decided up front.
pub struct Vm<'r, R: ?Sized> {
  region: &'r R,
  // index of the next instruction, `len` once halted
  ip: usize,
  initial: RegisterBank,
  registers: RegisterBank,
  steps: u64,
  limit: u64,
  state: State,
}

impl<'r, R> Vm<'r, R>
where
  R: Region + ?Sized,
{
  /// Prepares a run of `region` on a copy of `bank`
  ///
  /// Fails if the bank is too small for the registers `region` references.
  pub fn new(region: &'r R, bank: &RegisterBank, limit: u64) -> Result<Self> {
    Self::with_inputs(region, bank, &Inputs::new(), limit)
  }

  /// Same as [`Vm::new`] with [`DEFAULT_SAFETY_LIMIT`]
  pub fn with_default_limit(region: &'r R, bank: &RegisterBank) -> Result<Self> {
    Self::new(region, bank, DEFAULT_SAFETY_LIMIT)
  }

  /// Prepares a run of `region` on a copy of `bank` with `inputs` written
  /// over it
  pub fn with_inputs(
    region: &'r R,
    bank: &RegisterBank,
    inputs: &Inputs,
    limit: u64,
  ) -> Result<Self> {
    let mut registers = bank.clone();
    registers.apply(inputs)?;
    if let Some(highest) = region.haddr() {
      if registers.len() <= highest {
        return Err(Error::Configuration {
          highest,
          available: registers.len(),
        });
      }
    }
    tracing::debug!(
      instructions = region.instructions().len(),
      registers = registers.len(),
      limit,
      "machine ready"
    );
    Ok(Self {
      region,
      ip: 0,
      initial: registers.clone(),
      registers,
      steps: 0,
      limit,
      state: State::Active,
    })
  }

  pub fn steps(&self) -> u64 {
    self.steps
  }

  pub fn registers(&self) -> &RegisterBank {
    &self.registers
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted || self.ip >= self.region.instructions().len()
  }

  /// Rewinds to the bank the machine was started with
  pub fn reset(&mut self) {
    self.ip = 0;
    self.registers = self.initial.clone();
    self.steps = 0;
    self.state = State::Active;
  }

  /// Executes a single instruction, returning its 1-based line, or `None`
  /// once the machine has halted
  pub fn step(&mut self) -> Result<Option<(Line, Instruction)>> {
    let region = self.region;
    let instructions = region.instructions();
    let Some(&instruction) = instructions.get(self.ip) else {
      self.state = State::Halted;
      return Ok(None);
    };
    if self.steps >= self.limit {
      tracing::warn!(limit = self.limit, line = self.ip + 1, "safety limit exceeded");
      return Err(Error::NonTermination {
        limit: self.limit,
        partial: Box::new(Execution {
          steps: self.steps,
          trace: None,
          registers: self.registers.clone(),
        }),
      });
    }
    let line = self.ip + 1;
    self.ip = self
      .apply(instruction, instructions.len())
      .map_err(|source| Error::Execution {
        line,
        instruction,
        source,
      })?;
    self.steps += 1;
    tracing::trace!(line, %instruction, next = self.ip + 1, "step");
    Ok(Some((line, instruction)))
  }

  // returns the index of the next instruction
  fn apply(&mut self, instruction: Instruction, len: usize) -> std::result::Result<usize, Fault> {
    let next = self.ip + 1;
    match instruction {
      // r[n] ← 0
      Instruction::Zero(n) => {
        self.registers.write(n, 0)?;
        Ok(next)
      }
      // r[n] ← r[n] + 1
      Instruction::Successor(n) => {
        let value = self.registers.read(n)?;
        let value = value.checked_add(1).ok_or(Fault::Overflow { index: n })?;
        self.registers.write(n, value)?;
        Ok(next)
      }
      // r[d] ← r[s]
      Instruction::Copy(s, d) => {
        let value = self.registers.read(s)?;
        self.registers.write(d, value)?;
        Ok(next)
      }
      // if r[a] = r[b] : pc ← q
      Instruction::Jump(a, b, q) => {
        if self.registers.read(a)? != self.registers.read(b)? {
          Ok(next)
        } else if q == 0 {
          Ok(len)
        } else {
          Ok(q - 1)
        }
      }
    }
  }

  /// Runs to completion keeping only the final bank and step count
  pub fn run(mut self) -> Result<Execution> {
    while self.step()?.is_some() {}
    tracing::debug!(steps = self.steps, "machine halted");
    Ok(Execution {
      steps: self.steps,
      trace: None,
      registers: self.registers,
    })
  }

  /// Runs to completion recording a snapshot after every step
  pub fn execute(self) -> Result<Execution> {
    let mut trace = self.trace();
    let mut snapshots = Vec::new();
    for snapshot in trace.by_ref() {
      match snapshot {
        Ok(snapshot) => snapshots.push(snapshot),
        Err(Error::NonTermination { limit, mut partial }) => {
          partial.trace = Some(snapshots);
          return Err(Error::NonTermination { limit, partial });
        }
        Err(err) => return Err(err),
      }
    }
    let steps = trace.vm.steps;
    tracing::debug!(steps, "machine halted");
    Ok(Execution {
      steps,
      trace: Some(snapshots),
      registers: trace.vm.registers,
    })
  }

  /// A lazy, stepwise view of the run
  pub fn trace(self) -> Trace<'r, R> {
    Trace {
      vm: self,
      started: false,
      done: false,
    }
  }
}

impl<R: ?Sized> Clone for Vm<'_, R> {
  fn clone(&self) -> Self {
    Self {
      region: self.region,
      ip: self.ip,
      initial: self.initial.clone(),
      registers: self.registers.clone(),
      steps: self.steps,
      limit: self.limit,
      state: self.state,
    }
  }
}

impl<R: ?Sized> fmt::Debug for Vm<'_, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Vm")
      .field("ip", &self.ip)
      .field("registers", &self.registers)
      .field("steps", &self.steps)
      .field("limit", &self.limit)
      .field("state", &self.state)
      .finish()
  }
}

/// Iterator over the snapshots of a run
///
/// Yields the initial bank first, then one snapshot per executed
/// instruction. An error is yielded at most once and ends the sequence.
#[derive(Debug, Clone)]
pub struct Trace<'r, R: ?Sized> {
  vm: Vm<'r, R>,
  started: bool,
  done: bool,
}

impl<R> Trace<'_, R>
where
  R: Region + ?Sized,
{
  /// Starts the sequence over from the initial bank
  pub fn restart(&mut self) {
    self.vm.reset();
    self.started = false;
    self.done = false;
  }

  pub fn steps(&self) -> u64 {
    self.vm.steps
  }
}

impl<R> Iterator for Trace<'_, R>
where
  R: Region + ?Sized,
{
  type Item = Result<Snapshot>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    if !self.started {
      self.started = true;
      return Some(Ok(Snapshot::initial(self.vm.registers.clone())));
    }
    match self.vm.step() {
      Ok(Some((line, instruction))) => Some(Ok(Snapshot::after(
        line,
        instruction,
        self.vm.registers.clone(),
      ))),
      Ok(None) => {
        self.done = true;
        None
      }
      Err(err) => {
        self.done = true;
        Some(Err(err))
      }
    }
  }
}

/// Runs `region` stepwise on a copy of `bank` with `inputs` applied
pub fn execute<R>(region: &R, bank: &RegisterBank, inputs: &Inputs, limit: u64) -> Result<Execution>
where
  R: Region + ?Sized,
{
  Vm::with_inputs(region, bank, inputs, limit)?.execute()
}

/// Runs `region` on a copy of `bank` with `inputs` applied, without a trace
pub fn execute_batch<R>(
  region: &R,
  bank: &RegisterBank,
  inputs: &Inputs,
  limit: u64,
) -> Result<Execution>
where
  R: Region + ?Sized,
{
  Vm::with_inputs(region, bank, inputs, limit)?.run()
}
