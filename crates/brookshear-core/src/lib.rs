//! Emulator core for the Brookshear 8-bit machine.
//!
//! The machine has sixteen 8-bit registers, 256 bytes of memory and a
//! fixed-width 16-bit instruction set with thirteen opcodes, one of which adds
//! in an 8-bit floating-point notation implemented by the [`float8`] crate.

/// Memory image primitives.
pub mod memory;
pub use memory::{load_image, new_memory, read_u16_be, MEMORY_BYTES};

/// Host-facing run configuration, outcomes and trace hooks.
pub mod api;
pub use api::{MachineConfig, RunOutcome, StepOutcome, TraceEvent, TraceSink};

/// Machine state model.
pub mod state;
pub use state::{MachineState, RegisterFile, RunState};

/// Opcode table and instruction field layout.
pub mod encoding;
pub use encoding::{Opcode, INSTRUCTION_BYTES, MNEMONIC_TABLE, REGISTER_COUNT, ROR_AMOUNT_LIMIT};

/// Typed instructions and the encoder.
pub mod instruction;
pub use instruction::{Instruction, Register};

/// Instruction decoder with field validation.
pub mod decoder;
pub use decoder::Decoder;

/// Bulk program codec.
pub mod program;
pub use program::{decode_program, decode_stream, encode_program};

/// Fault taxonomy.
pub mod fault;
pub use fault::{DecodeFault, EncodeFault, ExecutionFault, FaultClass, LoadFault, ProgramFault};

/// Instruction execution engine.
pub mod execute;
pub use execute::offset_pc;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;
