//! Fetch-decode-execute engine.
//!
//! A step runs in two phases. `plan` reads the machine, decodes the fetched
//! word and computes every side effect without mutating anything; `commit`
//! then applies the data effect followed by the program counter update. Any
//! fault is raised during planning, so a faulting step leaves the machine
//! exactly as it was.

mod alu;

pub use alu::{add, add_float, rotate_right};

use tracing::{debug, trace};

use crate::api::{MachineConfig, RunOutcome, StepOutcome, TraceEvent, TraceSink};
use crate::decoder::Decoder;
use crate::fault::ExecutionFault;
use crate::instruction::{Instruction, Register};
use crate::memory::{new_memory, read_u16_be};
use crate::state::{MachineState, RegisterFile, RunState};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const INSTRUCTION_STRIDE: i16 = crate::encoding::INSTRUCTION_BYTES as i16;

/// Moves `pc` by `delta`, faulting instead of wrapping.
///
/// # Errors
///
/// Returns [`ExecutionFault::CounterOverflow`] when the result is outside
/// `0..=255`.
pub fn offset_pc(pc: u8, delta: i16) -> Result<u8, ExecutionFault> {
    u8::try_from(i16::from(pc) + delta).map_err(|_| ExecutionFault::CounterOverflow { pc, delta })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Writeback {
    None,
    Register(Register, u8),
    Memory(usize, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plan {
    instruction: Instruction,
    writeback: Writeback,
    next_pc: u8,
}

struct Discard;

impl TraceSink for Discard {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl MachineState {
    /// Transitions to [`RunState::Running`]. Also resumes a halted program.
    pub fn start(&mut self) {
        debug!(pc = self.pc(), "machine started");
        self.run_state = RunState::Running;
    }

    /// Zeroes the program counter, registers and memory and stops the
    /// machine.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::default();
        self.memory = new_memory();
        self.run_state = RunState::Halted;
        debug!("machine reset");
    }

    /// Reads the instruction word at `pc` and advances `pc` past it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionFault::AddressOutOfRange`] when the word extends
    /// past the end of memory and [`ExecutionFault::CounterOverflow`] when
    /// advancing wraps; `pc` is unchanged in both cases.
    pub fn fetch_instruction(&mut self) -> Result<u16, ExecutionFault> {
        let (word, next_pc) = self.peek_instruction()?;
        self.registers.set_pc(next_pc);
        Ok(word)
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionFault::Halted`] when the machine is not running,
    /// otherwise any fetch, decode or arithmetic fault. The machine is
    /// unchanged after a fault.
    pub fn step(&mut self) -> Result<StepOutcome, ExecutionFault> {
        self.step_with(&mut Discard)
    }

    /// Executes one instruction, reporting trace events to `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`MachineState::step`].
    pub fn step_with(&mut self, sink: &mut impl TraceSink) -> Result<StepOutcome, ExecutionFault> {
        if !self.is_running() {
            return Err(ExecutionFault::Halted);
        }

        let pc = self.pc();
        let plan = self.plan(pc, sink).inspect_err(|fault| {
            sink.on_event(TraceEvent::FaultRaised {
                pc,
                class: fault.class(),
            });
        })?;
        Ok(self.commit(pc, plan, sink))
    }

    /// Starts the machine and steps until the program halts.
    ///
    /// Halting is the normal end of a run and is not reported as a fault. A
    /// halted machine resumes at its current `pc`.
    ///
    /// # Errors
    ///
    /// Returns the first fault other than [`ExecutionFault::Halted`]; the
    /// machine is left as produced by the last successful step.
    pub fn run(&mut self) -> Result<RunOutcome, ExecutionFault> {
        self.run_with(&MachineConfig::default(), &mut Discard)
    }

    /// Starts the machine and steps until the program halts, honouring
    /// `config` and reporting trace events to `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`MachineState::run`], plus
    /// [`ExecutionFault::StepLimitExceeded`] when the configured limit is
    /// reached while the program is still running.
    pub fn run_with(
        &mut self,
        config: &MachineConfig,
        sink: &mut impl TraceSink,
    ) -> Result<RunOutcome, ExecutionFault> {
        self.start();
        let mut outcome = RunOutcome::default();
        loop {
            if let Some(limit) = config.step_limit {
                if outcome.steps >= limit && self.is_running() {
                    let fault = ExecutionFault::StepLimitExceeded { limit };
                    sink.on_event(TraceEvent::FaultRaised {
                        pc: self.pc(),
                        class: fault.class(),
                    });
                    debug!(pc = self.pc(), steps = outcome.steps, %fault, "run aborted");
                    return Err(fault);
                }
            }

            match self.step_with(sink) {
                Ok(StepOutcome::Retired(_)) => outcome.steps += 1,
                Ok(StepOutcome::Halted) => {
                    outcome.steps += 1;
                    return Ok(outcome);
                }
                Err(fault) if fault.is_halted() => return Ok(outcome),
                Err(fault) => {
                    debug!(pc = self.pc(), steps = outcome.steps, %fault, "run aborted");
                    return Err(fault);
                }
            }
        }
    }

    fn peek_instruction(&self) -> Result<(u16, u8), ExecutionFault> {
        let pc = self.pc();
        let word = read_u16_be(&self.memory, pc).ok_or(ExecutionFault::AddressOutOfRange { pc })?;
        let next_pc = offset_pc(pc, INSTRUCTION_STRIDE)?;
        Ok((word, next_pc))
    }

    fn plan(&self, pc: u8, sink: &mut impl TraceSink) -> Result<Plan, ExecutionFault> {
        let (word, mut next_pc) = self.peek_instruction()?;
        sink.on_event(TraceEvent::InstructionStart { pc, word });

        let instruction = Decoder::decode(word)?;
        trace!(pc, word, %instruction, "execute");

        let regs = &self.registers;
        let writeback = match instruction {
            Instruction::Nop => Writeback::None,
            Instruction::LoadMem { dst, addr } => {
                Writeback::Register(dst, self.memory[usize::from(addr)])
            }
            Instruction::LoadVal { dst, value } => Writeback::Register(dst, value),
            Instruction::Store { src, addr } => {
                Writeback::Memory(usize::from(addr), regs.read(src))
            }
            Instruction::Move { dst, src } => Writeback::Register(dst, regs.read(src)),
            Instruction::Add { dst, lhs, rhs } => {
                Writeback::Register(dst, add(regs.read(lhs), regs.read(rhs)))
            }
            Instruction::AddFloat { dst, lhs, rhs } => {
                Writeback::Register(dst, add_float(regs.read(lhs), regs.read(rhs))?)
            }
            Instruction::Or { dst, lhs, rhs } => {
                Writeback::Register(dst, regs.read(lhs) | regs.read(rhs))
            }
            Instruction::And { dst, lhs, rhs } => {
                Writeback::Register(dst, regs.read(lhs) & regs.read(rhs))
            }
            Instruction::Xor { dst, lhs, rhs } => {
                Writeback::Register(dst, regs.read(lhs) ^ regs.read(rhs))
            }
            Instruction::Ror { reg, amount } => {
                Writeback::Register(reg, rotate_right(regs.read(reg), amount))
            }
            Instruction::CmpBranch { cmp, addr } => {
                if regs.read(cmp) == regs.read(Register::R0) {
                    next_pc = addr;
                }
                Writeback::None
            }
            Instruction::Halt => {
                next_pc = offset_pc(next_pc, -INSTRUCTION_STRIDE)?;
                Writeback::None
            }
        };

        Ok(Plan {
            instruction,
            writeback,
            next_pc,
        })
    }

    fn commit(&mut self, pc: u8, plan: Plan, sink: &mut impl TraceSink) -> StepOutcome {
        match plan.writeback {
            Writeback::None => {}
            Writeback::Register(reg, value) => self.registers.write(reg, value),
            Writeback::Memory(index, value) => self.memory[index] = value,
        }
        self.registers.set_pc(plan.next_pc);

        if plan.instruction == Instruction::Halt {
            self.run_state = RunState::Halted;
            sink.on_event(TraceEvent::Halted { pc: plan.next_pc });
            debug!(pc = plan.next_pc, "machine halted");
            StepOutcome::Halted
        } else {
            sink.on_event(TraceEvent::InstructionRetired {
                pc,
                instruction: plan.instruction,
            });
            StepOutcome::Retired(plan.instruction)
        }
    }
}
