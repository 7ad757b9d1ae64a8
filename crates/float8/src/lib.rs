//! 8-bit floating-point notation.
//!
//! A [`Float8`] packs a sign bit, a 3-bit exponent in excess-4 notation and a
//! 4-bit normalized mantissa into a single byte. The crate converts between
//! this notation and IEEE-754 single precision and implements addition on a
//! fixed-point accumulator.

/// Arithmetic fault taxonomy.
pub mod fault;
pub use fault::ArithmeticFault;

/// Packed value type and IEEE-754 conversion.
pub mod value;
pub use value::{Float8, EXPONENT_BIAS, EXPONENT_MAX, EXPONENT_MIN, MANTISSA_BITS};

/// Fixed-point and native addition.
pub mod add;
pub use add::{add, add_native};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
