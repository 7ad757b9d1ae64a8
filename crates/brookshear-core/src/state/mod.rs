//! Machine state: program counter, registers, memory and run flag.

/// Register file and program counter.
pub mod registers;
/// Running/halted state machine.
pub mod run_state;

use std::io::Read;

pub use registers::RegisterFile;
pub use run_state::RunState;

use crate::fault::LoadFault;
use crate::instruction::Register;
use crate::memory::{load_image, new_memory};

/// Complete machine state, exclusively owned by its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    pub(crate) registers: RegisterFile,
    pub(crate) memory: Box<[u8]>,
    pub(crate) run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            registers: RegisterFile::default(),
            memory: new_memory(),
            run_state: RunState::Halted,
        }
    }
}

impl MachineState {
    /// Creates a halted machine with `image` at address 0 and the rest of
    /// memory zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`LoadFault::ImageTooLarge`] for images over 256 bytes.
    pub fn load(image: &[u8]) -> Result<Self, LoadFault> {
        let mut state = Self::default();
        load_image(&mut state.memory, image)?;
        Ok(state)
    }

    /// Reads a whole memory image from `reader` and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadFault::Io`] when reading fails and
    /// [`LoadFault::ImageTooLarge`] for images over 256 bytes.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, LoadFault> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        Self::load(&image)
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u8 {
        self.registers.pc()
    }

    /// Reads a general-purpose register, or `None` for an index above 15.
    #[must_use]
    pub fn register(&self, reg: Register) -> Option<u8> {
        self.registers.get(reg)
    }

    /// Returns the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Returns the whole memory.
    #[must_use]
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Returns the current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns `true` while the machine is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.run_state.is_running()
    }
}
