use std::fmt;

/// Size in bytes of one encoded instruction.
pub const INSTRUCTION_BYTES: usize = 2;
/// Number of general-purpose registers (`r0..r15`).
pub const REGISTER_COUNT: usize = 16;
/// Exclusive upper bound of the `ROR` rotate amount.
pub const ROR_AMOUNT_LIMIT: u8 = 8;

const OPCODE_SHIFT: u32 = 12;

/// Primary opcodes (bits 15..12 of the instruction word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    Nop = 0x0,
    LoadMem = 0x1,
    LoadVal = 0x2,
    Store = 0x3,
    Move = 0x4,
    Add = 0x5,
    AddFloat = 0x6,
    Or = 0x7,
    And = 0x8,
    Xor = 0x9,
    Ror = 0xA,
    CmpBranch = 0xB,
    Halt = 0xC,
}

/// Assembler mnemonics indexed by opcode value.
pub const MNEMONIC_TABLE: [&str; 13] = [
    "NOP", "LDR", "LDR", "STR", "MOV", "ADD", "FADD", "OR", "AND", "XOR", "ROR", "CBE", "HLT",
];

impl Opcode {
    /// Every assigned opcode in encoding order.
    pub const ALL: [Self; 13] = [
        Self::Nop,
        Self::LoadMem,
        Self::LoadVal,
        Self::Store,
        Self::Move,
        Self::Add,
        Self::AddFloat,
        Self::Or,
        Self::And,
        Self::Xor,
        Self::Ror,
        Self::CmpBranch,
        Self::Halt,
    ];

    /// Converts a 4-bit opcode value into an assigned opcode.
    #[must_use]
    pub const fn from_u4(op: u8) -> Option<Self> {
        match op {
            0x0 => Some(Self::Nop),
            0x1 => Some(Self::LoadMem),
            0x2 => Some(Self::LoadVal),
            0x3 => Some(Self::Store),
            0x4 => Some(Self::Move),
            0x5 => Some(Self::Add),
            0x6 => Some(Self::AddFloat),
            0x7 => Some(Self::Or),
            0x8 => Some(Self::And),
            0x9 => Some(Self::Xor),
            0xA => Some(Self::Ror),
            0xB => Some(Self::CmpBranch),
            0xC => Some(Self::Halt),
            _ => None,
        }
    }

    /// Returns the 4-bit opcode value.
    #[must_use]
    pub const fn to_u4(self) -> u8 {
        self as u8
    }

    /// Returns the assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        MNEMONIC_TABLE[self as usize]
    }

    /// Returns the opcode bits already shifted into instruction position.
    #[must_use]
    pub const fn word_bits(self) -> u16 {
        (self as u16) << OPCODE_SHIFT
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Extracts the raw opcode nibble of an instruction word.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn opcode_nibble(word: u16) -> u8 {
    (word >> OPCODE_SHIFT) as u8
}

/// Splits the three operand nibbles below the opcode, high to low.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn operand_nibbles(word: u16) -> [u8; 3] {
    [
        ((word >> 8) & 0xF) as u8,
        ((word >> 4) & 0xF) as u8,
        (word & 0xF) as u8,
    ]
}

/// Returns the low byte, used by address and immediate operands.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn operand_byte(word: u16) -> u8 {
    word as u8
}
