//! Typed instruction model and encoder.

use std::fmt;

use crate::encoding::{Opcode, REGISTER_COUNT, ROR_AMOUNT_LIMIT};
use crate::fault::EncodeFault;

const NIBBLE_MASK: u8 = 0x0F;

/// General-purpose register index.
///
/// Decoded instructions always hold indices below [`REGISTER_COUNT`]. Any
/// `u8` can be wrapped by hand; out-of-range indices are rejected when the
/// instruction is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register(u8);

impl Register {
    /// Register `r0`, the implicit comparand of `CBE`.
    pub const R0: Self = Self(0);

    /// Wraps a raw register index without range checking.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns `true` when the index names an existing register.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < REGISTER_COUNT
    }

    // Register file slot. Decoded registers are 4-bit, so masking never aliases
    // on the execution path.
    pub(crate) const fn slot(self) -> usize {
        (self.0 & NIBBLE_MASK) as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// No operation.
    Nop,
    /// `dst = mem[addr]`.
    LoadMem {
        /// Destination register.
        dst: Register,
        /// Source memory address.
        addr: u8,
    },
    /// `dst = value`.
    LoadVal {
        /// Destination register.
        dst: Register,
        /// Immediate value.
        value: u8,
    },
    /// `mem[addr] = src`.
    Store {
        /// Source register.
        src: Register,
        /// Destination memory address.
        addr: u8,
    },
    /// `dst = src`.
    Move {
        /// Destination register.
        dst: Register,
        /// Source register.
        src: Register,
    },
    /// `dst = lhs + rhs`, two's complement wrapping.
    Add {
        /// Destination register.
        dst: Register,
        /// First operand.
        lhs: Register,
        /// Second operand.
        rhs: Register,
    },
    /// `dst = lhs + rhs` in 8-bit floating-point notation.
    AddFloat {
        /// Destination register.
        dst: Register,
        /// First operand.
        lhs: Register,
        /// Second operand.
        rhs: Register,
    },
    /// `dst = lhs | rhs`.
    Or {
        /// Destination register.
        dst: Register,
        /// First operand.
        lhs: Register,
        /// Second operand.
        rhs: Register,
    },
    /// `dst = lhs & rhs`.
    And {
        /// Destination register.
        dst: Register,
        /// First operand.
        lhs: Register,
        /// Second operand.
        rhs: Register,
    },
    /// `dst = lhs ^ rhs`.
    Xor {
        /// Destination register.
        dst: Register,
        /// First operand.
        lhs: Register,
        /// Second operand.
        rhs: Register,
    },
    /// Rotates `reg` right by `amount` bits.
    Ror {
        /// Rotated register.
        reg: Register,
        /// Rotate amount, below 8.
        amount: u8,
    },
    /// Jumps to `addr` when `cmp` equals `r0`.
    CmpBranch {
        /// Register compared against `r0`.
        cmp: Register,
        /// Branch target.
        addr: u8,
    },
    /// Stops the machine.
    Halt,
}

fn register(opcode: Opcode, reg: Register) -> Result<u16, EncodeFault> {
    if reg.is_valid() {
        Ok(u16::from(reg.index()))
    } else {
        Err(EncodeFault::RegisterOutOfRange {
            opcode,
            index: reg.index(),
        })
    }
}

fn three_registers(
    opcode: Opcode,
    dst: Register,
    lhs: Register,
    rhs: Register,
) -> Result<u16, EncodeFault> {
    Ok((register(opcode, dst)? << 8) | (register(opcode, lhs)? << 4) | register(opcode, rhs)?)
}

impl Instruction {
    /// Returns the opcode selecting this instruction's layout.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::LoadMem { .. } => Opcode::LoadMem,
            Self::LoadVal { .. } => Opcode::LoadVal,
            Self::Store { .. } => Opcode::Store,
            Self::Move { .. } => Opcode::Move,
            Self::Add { .. } => Opcode::Add,
            Self::AddFloat { .. } => Opcode::AddFloat,
            Self::Or { .. } => Opcode::Or,
            Self::And { .. } => Opcode::And,
            Self::Xor { .. } => Opcode::Xor,
            Self::Ror { .. } => Opcode::Ror,
            Self::CmpBranch { .. } => Opcode::CmpBranch,
            Self::Halt => Opcode::Halt,
        }
    }

    /// Packs this instruction into its 16-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeFault::RegisterOutOfRange`] for a register index above
    /// 15 and [`EncodeFault::OperandOutOfRange`] for a rotate amount of 8 or
    /// more.
    pub fn encode(self) -> Result<u16, EncodeFault> {
        let opcode = self.opcode();
        let operands = match self {
            Self::Nop | Self::Halt => 0,
            Self::LoadMem { dst: reg, addr: byte }
            | Self::LoadVal {
                dst: reg,
                value: byte,
            }
            | Self::Store {
                src: reg,
                addr: byte,
            }
            | Self::CmpBranch {
                cmp: reg,
                addr: byte,
            } => (register(opcode, reg)? << 8) | u16::from(byte),
            Self::Move { dst, src } => (register(opcode, src)? << 4) | register(opcode, dst)?,
            Self::Add { dst, lhs, rhs }
            | Self::AddFloat { dst, lhs, rhs }
            | Self::Or { dst, lhs, rhs }
            | Self::And { dst, lhs, rhs }
            | Self::Xor { dst, lhs, rhs } => three_registers(opcode, dst, lhs, rhs)?,
            Self::Ror { reg, amount } => {
                if amount >= ROR_AMOUNT_LIMIT {
                    return Err(EncodeFault::OperandOutOfRange {
                        opcode,
                        value: amount,
                    });
                }
                (register(opcode, reg)? << 8) | u16::from(amount)
            }
        };
        Ok(opcode.word_bits() | operands)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Self::Nop | Self::Halt => f.write_str(mnemonic),
            Self::LoadMem { dst, addr } => write!(f, "{mnemonic:<8}{dst}, {addr:#04X}"),
            Self::LoadVal { dst, value } => write!(f, "{mnemonic:<8}{dst}, ${value}"),
            Self::Store { src, addr } => write!(f, "{mnemonic:<8}{src}, {addr:#04X}"),
            Self::Move { dst, src } => write!(f, "{mnemonic:<8}{dst}, {src}"),
            Self::Add { dst, lhs, rhs }
            | Self::AddFloat { dst, lhs, rhs }
            | Self::Or { dst, lhs, rhs }
            | Self::And { dst, lhs, rhs }
            | Self::Xor { dst, lhs, rhs } => write!(f, "{mnemonic:<8}{dst}, {lhs}, {rhs}"),
            Self::Ror { reg, amount } => write!(f, "{mnemonic:<8}{reg}, ${amount}"),
            Self::CmpBranch { cmp, addr } => write!(f, "{mnemonic:<8}{cmp}, {addr:#04X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Instruction, Register};
    use crate::{EncodeFault, Opcode};

    const fn r(index: u8) -> Register {
        Register::new(index)
    }

    #[rstest]
    #[case(Instruction::Nop, 0x0000)]
    #[case(Instruction::LoadMem { dst: r(4), addr: 0xA3 }, 0x14A3)]
    #[case(Instruction::LoadVal { dst: r(0), value: 0xA3 }, 0x20A3)]
    #[case(Instruction::Store { src: r(5), addr: 0xB1 }, 0x35B1)]
    #[case(Instruction::Move { dst: r(4), src: r(0xA) }, 0x40A4)]
    #[case(Instruction::Add { dst: r(7), lhs: r(2), rhs: r(6) }, 0x5726)]
    #[case(Instruction::AddFloat { dst: r(3), lhs: r(4), rhs: r(0xE) }, 0x634E)]
    #[case(Instruction::Or { dst: r(0xC), lhs: r(0xB), rhs: r(4) }, 0x7CB4)]
    #[case(Instruction::And { dst: r(0), lhs: r(4), rhs: r(5) }, 0x8045)]
    #[case(Instruction::Xor { dst: r(5), lhs: r(0xF), rhs: r(3) }, 0x95F3)]
    #[case(Instruction::Ror { reg: r(4), amount: 3 }, 0xA403)]
    #[case(Instruction::CmpBranch { cmp: r(4), addr: 0x3C }, 0xB43C)]
    #[case(Instruction::Halt, 0xC000)]
    fn golden_instructions_encode_to_known_words(#[case] instruction: Instruction, #[case] word: u16) {
        assert_eq!(instruction.encode(), Ok(word));
        assert_eq!(instruction.opcode().word_bits(), word & 0xF000);
    }

    #[rstest]
    #[case(Instruction::LoadMem { dst: r(16), addr: 0 }, Opcode::LoadMem, 16)]
    #[case(Instruction::Move { dst: r(0), src: r(200) }, Opcode::Move, 200)]
    #[case(Instruction::Xor { dst: r(1), lhs: r(2), rhs: r(0xFF) }, Opcode::Xor, 0xFF)]
    #[case(Instruction::Ror { reg: r(17), amount: 1 }, Opcode::Ror, 17)]
    #[case(Instruction::CmpBranch { cmp: r(16), addr: 0x10 }, Opcode::CmpBranch, 16)]
    fn out_of_range_registers_are_rejected(
        #[case] instruction: Instruction,
        #[case] opcode: Opcode,
        #[case] index: u8,
    ) {
        assert_eq!(
            instruction.encode(),
            Err(EncodeFault::RegisterOutOfRange { opcode, index })
        );
    }

    #[test]
    fn rotate_amount_must_be_below_eight() {
        assert_eq!(Instruction::Ror { reg: r(1), amount: 7 }.encode(), Ok(0xA107));
        assert_eq!(
            Instruction::Ror { reg: r(1), amount: 8 }.encode(),
            Err(EncodeFault::OperandOutOfRange {
                opcode: Opcode::Ror,
                value: 8,
            })
        );
    }

    #[test]
    fn register_validity_follows_the_four_bit_range() {
        assert!(r(15).is_valid());
        assert!(!r(16).is_valid());
        assert_eq!(Register::R0.index(), 0);
    }

    #[rstest]
    #[case(Instruction::Nop, "NOP")]
    #[case(Instruction::LoadMem { dst: r(4), addr: 0xA3 }, "LDR     r4, 0xA3")]
    #[case(Instruction::LoadVal { dst: r(1), value: 95 }, "LDR     r1, $95")]
    #[case(Instruction::Store { src: r(5), addr: 0x0B }, "STR     r5, 0x0B")]
    #[case(Instruction::Add { dst: r(0), lhs: r(1), rhs: r(2) }, "ADD     r0, r1, r2")]
    #[case(Instruction::AddFloat { dst: r(3), lhs: r(4), rhs: r(14) }, "FADD    r3, r4, r14")]
    #[case(Instruction::Ror { reg: r(4), amount: 3 }, "ROR     r4, $3")]
    #[case(Instruction::CmpBranch { cmp: r(4), addr: 0x3C }, "CBE     r4, 0x3C")]
    #[case(Instruction::Halt, "HLT")]
    fn display_renders_mnemonic_and_operands(#[case] instruction: Instruction, #[case] text: &str) {
        assert_eq!(instruction.to_string(), text);
    }
}
