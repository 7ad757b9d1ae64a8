//! Instruction decoder.
//!
//! Validation happens entirely here: a word that decodes carries register
//! indices below 16 and a rotate amount below 8, so the execution engine never
//! re-checks operands.

use crate::encoding::{opcode_nibble, operand_byte, operand_nibbles, Opcode, ROR_AMOUNT_LIMIT};
use crate::fault::DecodeFault;
use crate::instruction::{Instruction, Register};

const LOW_TWELVE_BITS: u16 = 0x0FFF;

/// Stateless decoder for 16-bit instruction words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoder;

impl Decoder {
    /// Decodes a single instruction word.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFault::InvalidOpcode`] for opcodes `0xD..=0xF`,
    /// [`DecodeFault::InvalidPadding`] when bits that must be zero are set and
    /// [`DecodeFault::InvalidOperand`] for a `ROR` amount of 8 or more.
    /// Padding is checked before the rotate amount.
    pub fn decode(word: u16) -> Result<Instruction, DecodeFault> {
        let Some(opcode) = Opcode::from_u4(opcode_nibble(word)) else {
            return Err(DecodeFault::InvalidOpcode {
                word,
                opcode: opcode_nibble(word),
            });
        };

        let [high, mid, low] = operand_nibbles(word);
        let byte = operand_byte(word);
        let reg = Register::new;

        let instruction = match opcode {
            Opcode::Nop => {
                expect_zero_padding(opcode, word, word & LOW_TWELVE_BITS)?;
                Instruction::Nop
            }
            Opcode::LoadMem => Instruction::LoadMem {
                dst: reg(high),
                addr: byte,
            },
            Opcode::LoadVal => Instruction::LoadVal {
                dst: reg(high),
                value: byte,
            },
            Opcode::Store => Instruction::Store {
                src: reg(high),
                addr: byte,
            },
            Opcode::Move => {
                expect_zero_padding(opcode, word, u16::from(high))?;
                Instruction::Move {
                    dst: reg(low),
                    src: reg(mid),
                }
            }
            Opcode::Add => Instruction::Add {
                dst: reg(high),
                lhs: reg(mid),
                rhs: reg(low),
            },
            Opcode::AddFloat => Instruction::AddFloat {
                dst: reg(high),
                lhs: reg(mid),
                rhs: reg(low),
            },
            Opcode::Or => Instruction::Or {
                dst: reg(high),
                lhs: reg(mid),
                rhs: reg(low),
            },
            Opcode::And => Instruction::And {
                dst: reg(high),
                lhs: reg(mid),
                rhs: reg(low),
            },
            Opcode::Xor => Instruction::Xor {
                dst: reg(high),
                lhs: reg(mid),
                rhs: reg(low),
            },
            Opcode::Ror => {
                expect_zero_padding(opcode, word, u16::from(mid))?;
                if low >= ROR_AMOUNT_LIMIT {
                    return Err(DecodeFault::InvalidOperand {
                        opcode,
                        word,
                        operand: low,
                    });
                }
                Instruction::Ror {
                    reg: reg(high),
                    amount: low,
                }
            }
            Opcode::CmpBranch => Instruction::CmpBranch {
                cmp: reg(high),
                addr: byte,
            },
            Opcode::Halt => {
                expect_zero_padding(opcode, word, word & LOW_TWELVE_BITS)?;
                Instruction::Halt
            }
        };
        Ok(instruction)
    }
}

const fn expect_zero_padding(opcode: Opcode, word: u16, padding: u16) -> Result<(), DecodeFault> {
    if padding == 0 {
        Ok(())
    } else {
        Err(DecodeFault::InvalidPadding {
            opcode,
            word,
            padding,
        })
    }
}
