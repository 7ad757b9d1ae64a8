#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::{ArithmeticFault, Float8, MANTISSA_BITS};

// The accumulator is 8.8 fixed point. A mantissa `.mmmm` with exponent 0
// occupies bits 7..=4; the exponent then moves it at most 4 positions right
// and 3 positions left:
//
//    00000111.10000000  largest magnitude (7.5)
//    00000000.00001111  smallest normalized pattern
//
// A sum of two values needs at most 12 bits, so i16 never overflows.
const RADIX_ALIGN: u32 = 8 - MANTISSA_BITS;
// Bit position whose value is 2^-1, i.e. exponent 0 for the mantissa MSB.
const RADIX_POINT: i32 = 7;

fn widen(value: Float8) -> i16 {
    let mut aligned = u16::from(value.mantissa()) << RADIX_ALIGN;
    let exp = value.exp();
    if exp < 0 {
        aligned >>= exp.unsigned_abs();
    } else {
        aligned <<= exp.unsigned_abs();
    }

    let magnitude = aligned as i16;
    if value.sign() {
        -magnitude
    } else {
        magnitude
    }
}

/// Returns `x + y`, computed on a fixed-point accumulator.
///
/// The result is truncated to four significant bits; there is no rounding,
/// no denormal range and no flush-to-zero.
///
/// # Errors
///
/// Returns [`ArithmeticFault::ExponentOverflow`] when the sum reaches 8 or
/// more in magnitude and [`ArithmeticFault::ExponentUnderflow`] when it is
/// non-zero but below the smallest normalized magnitude.
pub fn add(x: Float8, y: Float8) -> Result<Float8, ArithmeticFault> {
    let sum = widen(x) + widen(y);
    if sum == 0 {
        return Ok(Float8::ZERO);
    }

    let magnitude = sum.unsigned_abs();
    let position = u16::BITS - 1 - magnitude.leading_zeros();
    let exponent = position as i32 - RADIX_POINT;
    if let Some(fault) = ArithmeticFault::check_exponent(exponent) {
        return Err(fault);
    }

    let mantissa = (magnitude >> (position + 1 - MANTISSA_BITS)) as u8;
    Ok(Float8::from_parts(sum < 0, exponent, mantissa))
}

/// Returns `x + y`, computed by converting both operands to `f32`.
///
/// # Errors
///
/// Same conditions as [`Float8::from_f32`] applied to the exact sum.
pub fn add_native(x: Float8, y: Float8) -> Result<Float8, ArithmeticFault> {
    Float8::from_f32(x.to_f32() + y.to_f32())
}
