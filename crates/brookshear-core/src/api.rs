//! Host-facing run configuration, outcomes and trace hooks.

use crate::fault::FaultClass;
use crate::instruction::Instruction;

/// Run-loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Maximum number of steps a run may retire before it is aborted.
    /// `None` runs until the program halts or faults.
    pub step_limit: Option<u64>,
}

impl MachineConfig {
    /// Returns a configuration that aborts after `limit` steps.
    #[must_use]
    pub const fn with_step_limit(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
        }
    }
}

/// Result of one successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The instruction executed and control moved on.
    Retired(Instruction),
    /// `HLT` executed; the machine stopped with `pc` on the `HLT` itself.
    Halted,
}

/// Result of a run that ended by halting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunOutcome {
    /// Steps executed during this run, including the final `HLT`.
    pub steps: u64,
}

/// Deterministic trace events emitted at step boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// An instruction word was fetched.
    InstructionStart {
        /// Address of the word.
        pc: u8,
        /// Raw instruction word.
        word: u16,
    },
    /// An instruction other than `HLT` completed.
    InstructionRetired {
        /// Address the instruction was fetched from.
        pc: u8,
        /// The decoded instruction.
        instruction: Instruction,
    },
    /// `HLT` executed.
    Halted {
        /// Address of the `HLT` instruction.
        pc: u8,
    },
    /// A step or run was aborted by a fault.
    FaultRaised {
        /// Program counter when the fault was observed.
        pc: u8,
        /// Class of the fault.
        class: FaultClass,
    },
}

/// Sink for trace events, in execution order.
pub trait TraceSink {
    /// Records one event.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
