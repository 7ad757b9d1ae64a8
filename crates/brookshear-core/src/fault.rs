use float8::ArithmeticFault;
use thiserror::Error;

use crate::encoding::{Opcode, ROR_AMOUNT_LIMIT};
use crate::memory::MEMORY_BYTES;

/// Fault classes used for aggregation and driver policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder rejected an instruction word.
    Decode,
    /// Encoder rejected a hand-built instruction.
    Encode,
    /// Fetch/control-flow violation or halted machine.
    Execution,
    /// 8-bit floating-point result out of range.
    Arithmetic,
}

/// Faults raised while decoding a 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodeFault {
    /// The opcode nibble is not assigned.
    #[error("invalid opcode {opcode:#x} in {word:#06x}")]
    InvalidOpcode {
        /// Raw instruction word.
        word: u16,
        /// Unassigned opcode nibble.
        opcode: u8,
    },
    /// Bits that must be zero are set.
    #[error("invalid padding {padding:#x} in {word:#06x} ({opcode})")]
    InvalidPadding {
        /// Decoded opcode.
        opcode: Opcode,
        /// Raw instruction word.
        word: u16,
        /// Value found in the padding bits.
        padding: u16,
    },
    /// An operand field holds a value outside its legal range.
    #[error("invalid operand {operand} in {word:#06x} ({opcode}); above {max}", max = ROR_AMOUNT_LIMIT - 1)]
    InvalidOperand {
        /// Decoded opcode.
        opcode: Opcode,
        /// Raw instruction word.
        word: u16,
        /// Rejected operand value.
        operand: u8,
    },
}

impl DecodeFault {
    /// Returns the aggregation class.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        FaultClass::Decode
    }
}

/// Faults raised while encoding a hand-built instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EncodeFault {
    /// A register index does not fit in a 4-bit field.
    #[error("invalid register r{index} in {opcode}")]
    RegisterOutOfRange {
        /// Instruction opcode.
        opcode: Opcode,
        /// Offending register index.
        index: u8,
    },
    /// An operand is outside its legal range.
    #[error("invalid operand {value} in {opcode}; above {max}", max = ROR_AMOUNT_LIMIT - 1)]
    OperandOutOfRange {
        /// Instruction opcode.
        opcode: Opcode,
        /// Offending operand value.
        value: u8,
    },
}

impl EncodeFault {
    /// Returns the aggregation class.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        FaultClass::Encode
    }
}

/// Faults raised by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ExecutionFault {
    /// The machine is not running.
    #[error("machine is halted")]
    Halted,
    /// The instruction at `pc` touches bytes past the end of memory.
    #[error("instruction at pc {pc:#04x} reaches past the end of memory ({size} bytes)", size = MEMORY_BYTES)]
    AddressOutOfRange {
        /// Program counter of the attempted fetch.
        pc: u8,
    },
    /// Moving the program counter by `delta` wrapped around.
    #[error("program counter {pc:#04x} wrapped when moved by {delta}")]
    CounterOverflow {
        /// Program counter before the move.
        pc: u8,
        /// Requested signed displacement.
        delta: i16,
    },
    /// A configured step limit was reached before the machine halted.
    #[error("step limit of {limit} reached before halt")]
    StepLimitExceeded {
        /// Configured limit.
        limit: u64,
    },
    /// The fetched word does not decode.
    #[error(transparent)]
    Decode(#[from] DecodeFault),
    /// `FADD` produced an unrepresentable result or read an unnormalized operand.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticFault),
}

impl ExecutionFault {
    /// Returns the aggregation class.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::Halted
            | Self::AddressOutOfRange { .. }
            | Self::CounterOverflow { .. }
            | Self::StepLimitExceeded { .. } => FaultClass::Execution,
            Self::Decode(_) => FaultClass::Decode,
            Self::Arithmetic(_) => FaultClass::Arithmetic,
        }
    }

    /// Returns `true` for the normal end-of-program signal.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted)
    }
}

/// Faults raised while loading a memory image.
#[derive(Debug, Error)]
pub enum LoadFault {
    /// The image does not fit in memory.
    #[error("memory image of {len} bytes exceeds {size} bytes", size = MEMORY_BYTES)]
    ImageTooLarge {
        /// Length of the rejected image.
        len: usize,
    },
    /// Reading the image failed.
    #[error("failed to read memory image")]
    Io(#[from] std::io::Error),
}

/// Faults raised by the bulk program codec.
#[derive(Debug, Error)]
pub enum ProgramFault {
    /// The buffer does not hold a whole number of instructions.
    #[error("program length {len} is not a multiple of 2")]
    LengthMismatch {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// The word at `offset` does not decode.
    #[error("cannot decode instruction at offset {offset:#04x}")]
    Decode {
        /// Byte offset of the word.
        offset: usize,
        /// Underlying decode fault.
        source: DecodeFault,
    },
    /// The instruction at `index` does not encode.
    #[error("cannot encode instruction {index}")]
    Encode {
        /// Position in the instruction slice.
        index: usize,
        /// Underlying encode fault.
        source: EncodeFault,
    },
    /// Reading the program stream failed.
    #[error("failed to read program")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use float8::ArithmeticFault;

    use super::{DecodeFault, EncodeFault, ExecutionFault, FaultClass, LoadFault, ProgramFault};
    use crate::Opcode;

    #[test]
    fn class_mapping_matches_fault_taxonomy() {
        let decode = DecodeFault::InvalidOpcode {
            word: 0xD000,
            opcode: 0xD,
        };
        let encode = EncodeFault::RegisterOutOfRange {
            opcode: Opcode::Add,
            index: 16,
        };
        let arithmetic = ArithmeticFault::ExponentOverflow { exponent: 4 };

        assert_eq!(decode.class(), FaultClass::Decode);
        assert_eq!(encode.class(), FaultClass::Encode);
        assert_eq!(ExecutionFault::Halted.class(), FaultClass::Execution);
        assert_eq!(
            ExecutionFault::AddressOutOfRange { pc: 0xFF }.class(),
            FaultClass::Execution
        );
        assert_eq!(
            ExecutionFault::CounterOverflow { pc: 0xFE, delta: 2 }.class(),
            FaultClass::Execution
        );
        assert_eq!(ExecutionFault::from(decode).class(), FaultClass::Decode);
        assert_eq!(
            ExecutionFault::from(arithmetic).class(),
            FaultClass::Arithmetic
        );
    }

    #[test]
    fn only_halted_is_the_termination_signal() {
        assert!(ExecutionFault::Halted.is_halted());
        assert!(!ExecutionFault::AddressOutOfRange { pc: 0xFF }.is_halted());
        assert!(!ExecutionFault::StepLimitExceeded { limit: 1 }.is_halted());
    }

    #[test]
    fn messages_name_opcode_and_raw_word() {
        let padding = DecodeFault::InvalidPadding {
            opcode: Opcode::Halt,
            word: 0xC001,
            padding: 0x001,
        };
        assert_eq!(padding.to_string(), "invalid padding 0x1 in 0xc001 (HLT)");

        let operand = DecodeFault::InvalidOperand {
            opcode: Opcode::Ror,
            word: 0xA408,
            operand: 8,
        };
        assert_eq!(
            operand.to_string(),
            "invalid operand 8 in 0xa408 (ROR); above 7"
        );

        let wrapped = ExecutionFault::from(padding);
        assert_eq!(wrapped.to_string(), padding.to_string());
    }

    #[test]
    fn loader_and_program_faults_render_lengths() {
        let load = LoadFault::ImageTooLarge { len: 300 };
        assert_eq!(
            load.to_string(),
            "memory image of 300 bytes exceeds 256 bytes"
        );

        let program = ProgramFault::LengthMismatch { len: 3 };
        assert_eq!(program.to_string(), "program length 3 is not a multiple of 2");
    }
}
