use crate::encoding::REGISTER_COUNT;
use crate::instruction::Register;

/// Program counter and general-purpose register file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    gpr: [u8; REGISTER_COUNT],
    pc: u8,
}

impl RegisterFile {
    /// Reads a general-purpose register, or `None` for an index above 15.
    #[must_use]
    pub fn get(&self, reg: Register) -> Option<u8> {
        self.gpr.get(usize::from(reg.index())).copied()
    }

    /// Returns all general-purpose registers, `r0` first.
    #[must_use]
    pub const fn gpr(&self) -> &[u8; REGISTER_COUNT] {
        &self.gpr
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u8 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u8) {
        self.pc = value;
    }

    pub(crate) const fn read(&self, reg: Register) -> u8 {
        self.gpr[reg.slot()]
    }

    pub(crate) const fn write(&mut self, reg: Register, value: u8) {
        self.gpr[reg.slot()] = value;
    }
}
