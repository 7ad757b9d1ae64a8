//! Flat 256-byte memory primitives.

use crate::encoding::INSTRUCTION_BYTES;
use crate::fault::LoadFault;

/// Size in bytes of the architectural memory.
pub const MEMORY_BYTES: usize = u8::MAX as usize + 1;

/// Allocates a zeroed memory backing store.
#[must_use]
pub fn new_memory() -> Box<[u8]> {
    vec![0; MEMORY_BYTES].into_boxed_slice()
}

/// Reads a big-endian instruction word at `addr`, or `None` when the word
/// would extend past the end of `memory`.
#[must_use]
pub fn read_u16_be(memory: &[u8], addr: u8) -> Option<u16> {
    let start = usize::from(addr);
    let bytes = memory.get(start..start + INSTRUCTION_BYTES)?;
    Some(u16::from_be_bytes(bytes.try_into().ok()?))
}

/// Copies `image` to the start of `memory` and zero-fills the remainder.
///
/// # Errors
///
/// Returns [`LoadFault::ImageTooLarge`] when `image` is longer than
/// `memory`; `memory` is left untouched in that case.
pub fn load_image(memory: &mut [u8], image: &[u8]) -> Result<(), LoadFault> {
    if image.len() > memory.len() {
        return Err(LoadFault::ImageTooLarge { len: image.len() });
    }
    let (head, tail) = memory.split_at_mut(image.len());
    head.copy_from_slice(image);
    tail.fill(0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_image, new_memory, read_u16_be, MEMORY_BYTES};
    use crate::LoadFault;

    #[test]
    fn backing_store_is_256_zero_bytes() {
        let memory = new_memory();
        assert_eq!(memory.len(), MEMORY_BYTES);
        assert!(memory.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn words_are_big_endian() {
        let mut memory = new_memory();
        memory[0x10] = 0x14;
        memory[0x11] = 0xA3;
        assert_eq!(read_u16_be(&memory, 0x10), Some(0x14A3));
        assert_eq!(read_u16_be(&memory, 0x11), Some(0xA300));
    }

    #[test]
    fn last_whole_word_starts_at_0xfe() {
        let mut memory = new_memory();
        memory[0xFE] = 0xC0;
        assert_eq!(read_u16_be(&memory, 0xFE), Some(0xC000));
        assert_eq!(read_u16_be(&memory, 0xFF), None);
    }

    #[test]
    fn load_zero_fills_after_the_image() {
        let mut memory = new_memory();
        memory.fill(0xEE);
        load_image(&mut memory, &[0x21, 0x5F]).expect("small image");
        assert_eq!(&memory[..3], &[0x21, 0x5F, 0x00]);
        assert!(memory[2..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn full_size_image_loads_and_oversize_is_rejected() {
        let mut memory = new_memory();
        load_image(&mut memory, &[0xAB; MEMORY_BYTES]).expect("exact fit");
        assert!(memory.iter().all(|byte| *byte == 0xAB));

        let fault = load_image(&mut memory, &[0; MEMORY_BYTES + 1]).expect_err("too large");
        assert!(matches!(fault, LoadFault::ImageTooLarge { len } if len == MEMORY_BYTES + 1));
        assert!(memory.iter().all(|byte| *byte == 0xAB));
    }
}
