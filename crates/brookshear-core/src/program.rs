//! Bulk codec over flat instruction buffers.
//!
//! A program is a concatenation of 2-byte big-endian instruction words.

use std::io::Read;

use crate::decoder::Decoder;
use crate::encoding::INSTRUCTION_BYTES;
use crate::fault::ProgramFault;
use crate::instruction::Instruction;

/// Decodes every instruction in `bytes`.
///
/// # Errors
///
/// Returns [`ProgramFault::LengthMismatch`] for an odd-length buffer before
/// decoding anything, and [`ProgramFault::Decode`] for the first word that
/// does not decode.
pub fn decode_program(bytes: &[u8]) -> Result<Vec<Instruction>, ProgramFault> {
    let words = bytes.chunks_exact(INSTRUCTION_BYTES);
    if !words.remainder().is_empty() {
        return Err(ProgramFault::LengthMismatch { len: bytes.len() });
    }

    words
        .enumerate()
        .map(|(index, pair)| {
            let word = u16::from_be_bytes([pair[0], pair[1]]);
            Decoder::decode(word).map_err(|source| ProgramFault::Decode {
                offset: index * INSTRUCTION_BYTES,
                source,
            })
        })
        .collect()
}

/// Reads `reader` to the end and decodes the result.
///
/// # Errors
///
/// Returns [`ProgramFault::Io`] when reading fails, otherwise the faults of
/// [`decode_program`].
pub fn decode_stream(mut reader: impl Read) -> Result<Vec<Instruction>, ProgramFault> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_program(&bytes)
}

/// Encodes `instructions` into a flat big-endian buffer.
///
/// # Errors
///
/// Returns [`ProgramFault::Encode`] for the first instruction that does not
/// encode.
pub fn encode_program(instructions: &[Instruction]) -> Result<Vec<u8>, ProgramFault> {
    let mut bytes = Vec::with_capacity(instructions.len() * INSTRUCTION_BYTES);
    for (index, instruction) in instructions.iter().enumerate() {
        let word = instruction
            .encode()
            .map_err(|source| ProgramFault::Encode { index, source })?;
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    Ok(bytes)
}
