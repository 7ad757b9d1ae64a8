//! Pure data-path operations.

use float8::{ArithmeticFault, Float8};

/// Two's complement addition modulo 256.
#[must_use]
pub const fn add(lhs: u8, rhs: u8) -> u8 {
    lhs.wrapping_add(rhs)
}

/// Adds two register bytes in 8-bit floating-point notation.
///
/// # Errors
///
/// Returns [`ArithmeticFault::Unnormalized`] when either byte is not a
/// normalized value, and the overflow/underflow faults of [`float8::add`].
pub fn add_float(lhs: u8, rhs: u8) -> Result<u8, ArithmeticFault> {
    let sum = float8::add(Float8::try_from_bits(lhs)?, Float8::try_from_bits(rhs)?)?;
    Ok(sum.to_bits())
}

/// Rotates right by `amount` bits; decoded amounts are below 8.
#[must_use]
pub const fn rotate_right(value: u8, amount: u8) -> u8 {
    value.rotate_right(amount as u32)
}
