#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use std::fmt;

use crate::ArithmeticFault;

/// Number of stored mantissa bits.
pub const MANTISSA_BITS: u32 = 4;
/// Bias of the excess-4 exponent field.
pub const EXPONENT_BIAS: i32 = 4;
/// Smallest representable real exponent.
pub const EXPONENT_MIN: i32 = -4;
/// Largest representable real exponent.
pub const EXPONENT_MAX: i32 = 3;

const SIGN_MASK: u8 = 0x80;
const EXPONENT_MASK: u8 = 0x70;
const EXPONENT_SHIFT: u32 = 4;
const MANTISSA_MASK: u8 = 0x0F;
const MANTISSA_LEADING_BIT: u8 = 0x08;

const F32_SIGN_MASK: u32 = 0x8000_0000;
const F32_EXPONENT_MASK: u32 = 0x7F80_0000;
const F32_MANTISSA_MASK: u32 = 0x007F_FFFF;
const F32_IMPLICIT_ONE: u32 = 0x0080_0000;
const F32_MANTISSA_BITS: u32 = 23;
const F32_EXPONENT_BIAS: i32 = 127;

// Distance between the 24-bit IEEE significand (implicit one included) and
// the 4-bit stored mantissa.
const F32_MANTISSA_SHIFT: u32 = F32_MANTISSA_BITS + 1 - MANTISSA_BITS;

/// An 8-bit value stored in floating-point notation.
///
/// ```text
///   1 0 1 0 1 0 0 1
///   | \___/ \_____/
///   |   |      mantissa: .1001 (radix point on the left)
///   |   exponent: 010 = 2 - 4 = -2 (excess-4)
///   sign: negative
///
///   -0.001001 (base 2) = -9/64 = -0.140625
/// ```
///
/// The leftmost mantissa bit of every value is 1 (normalized form), with the
/// single exception of zero, whose bits are all 0. Every constructor keeps
/// this invariant, so no two bytes held by a `Float8` denote the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Float8(u8);

const fn is_normalized(bits: u8) -> bool {
    bits == 0 || bits & MANTISSA_LEADING_BIT != 0
}

impl Float8 {
    /// The value zero.
    pub const ZERO: Self = Self(0);

    /// Reinterprets a raw byte as an 8-bit floating-point value.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticFault::Unnormalized`] when `bits` is non-zero and
    /// its mantissa does not start with a 1.
    pub const fn try_from_bits(bits: u8) -> Result<Self, ArithmeticFault> {
        if is_normalized(bits) {
            Ok(Self(bits))
        } else {
            Err(ArithmeticFault::Unnormalized { bits })
        }
    }

    /// Packs already-validated fields. `exponent` must be in range and
    /// `mantissa` must be normalized.
    pub(crate) const fn from_parts(sign: bool, exponent: i32, mantissa: u8) -> Self {
        let mut bits = if sign { SIGN_MASK } else { 0 };
        bits |= ((exponent + EXPONENT_BIAS) as u8) << EXPONENT_SHIFT;
        bits |= mantissa & MANTISSA_MASK;
        debug_assert!(is_normalized(bits));
        Self(bits)
    }

    /// Returns the raw byte.
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        self.0
    }

    /// Returns `true` for the value zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when the value is negative.
    #[must_use]
    pub const fn sign(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    /// Returns the real exponent, in `EXPONENT_MIN..=EXPONENT_MAX`.
    #[must_use]
    pub const fn exp(self) -> i32 {
        ((self.0 & EXPONENT_MASK) >> EXPONENT_SHIFT) as i32 - EXPONENT_BIAS
    }

    /// Returns the 4-bit mantissa.
    #[must_use]
    pub const fn mantissa(self) -> u8 {
        debug_assert!(is_normalized(self.0), "mantissa is not normalized");
        self.0 & MANTISSA_MASK
    }

    /// Converts a single-precision value.
    ///
    /// The IEEE significand carries an implicit leading 1 left of the radix
    /// point whereas the 8-bit mantissa keeps it explicitly right of it, so
    /// the exponent is adjusted by one. Low significand bits are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticFault::ExponentOverflow`] or
    /// [`ArithmeticFault::ExponentUnderflow`] when the adjusted exponent is
    /// outside `EXPONENT_MIN..=EXPONENT_MAX`.
    pub fn from_f32(value: f32) -> Result<Self, ArithmeticFault> {
        if value == 0.0 {
            return Ok(Self::ZERO);
        }

        let bits = value.to_bits();
        let sign = bits & F32_SIGN_MASK != 0;

        let biased = ((bits & F32_EXPONENT_MASK) >> F32_MANTISSA_BITS) as i32;
        let exponent = biased - F32_EXPONENT_BIAS + 1;
        if let Some(fault) = ArithmeticFault::check_exponent(exponent) {
            return Err(fault);
        }

        let significand = (bits & F32_MANTISSA_MASK) | F32_IMPLICIT_ONE;
        let mantissa = (significand >> F32_MANTISSA_SHIFT) as u8;

        Ok(Self::from_parts(sign, exponent, mantissa))
    }

    /// Converts to single precision. Every 8-bit value is exactly
    /// representable.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        if self.is_zero() {
            return 0.0;
        }

        let mut bits = 0u32;
        if self.sign() {
            bits |= F32_SIGN_MASK;
        }

        let biased = (self.exp() - 1 + F32_EXPONENT_BIAS) as u32;
        bits |= biased << F32_MANTISSA_BITS;

        // IEEE keeps the leading 1 implicit.
        let fraction = u32::from(self.mantissa() & !MANTISSA_LEADING_BIT);
        bits |= fraction << F32_MANTISSA_SHIFT;

        f32::from_bits(bits)
    }
}

impl TryFrom<u8> for Float8 {
    type Error = ArithmeticFault;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::try_from_bits(bits)
    }
}

impl From<Float8> for u8 {
    fn from(value: Float8) -> Self {
        value.to_bits()
    }
}

impl TryFrom<f32> for Float8 {
    type Error = ArithmeticFault;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::from_f32(value)
    }
}

impl From<Float8> for f32 {
    fn from(value: Float8) -> Self {
        value.to_f32()
    }
}

impl fmt::Display for Float8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Float8;
    use crate::ArithmeticFault;

    fn f8(bits: u8) -> Float8 {
        Float8::try_from_bits(bits).expect("normalized test vector")
    }

    #[rstest]
    #[case(0xA9, -0.140_625)]
    #[case(0x2A, 0.156_25)]
    #[case(0x7F, 7.5)]
    #[case(0xFF, -7.5)]
    #[case(0x48, 0.5)]
    #[case(0x00, 0.0)]
    #[case(0xB9, -0.281_25)]
    #[case(0x3A, 0.3125)]
    #[case(0xFE, -7.0)]
    #[case(0x58, 1.0)]
    #[case(0x6A, 2.5)]
    #[case(0xCC, -0.75)]
    #[case(0x5E, 1.75)]
    #[case(0xAC, -0.1875)]
    fn golden_values_convert_both_ways(#[case] bits: u8, #[case] value: f32) {
        assert_eq!(Float8::from_f32(value), Ok(f8(bits)));
        assert_eq!(f8(bits).to_f32().to_bits(), value.to_bits());
    }

    #[test]
    fn field_accessors_split_the_packed_byte() {
        let value = f8(0xA9);
        assert!(value.sign());
        assert_eq!(value.exp(), -2);
        assert_eq!(value.mantissa(), 0b1001);
        assert_eq!(value.to_string(), "-0.140625");
    }

    #[test]
    fn every_normalized_byte_survives_f32_roundtrip() {
        let mut normalized = 0;
        for bits in 0u8..=u8::MAX {
            let Ok(value) = Float8::try_from_bits(bits) else {
                continue;
            };
            normalized += 1;
            assert_eq!(Float8::from_f32(value.to_f32()), Ok(value), "{bits:#04x}");
        }
        // zero plus sign x exponent x three free mantissa bits
        assert_eq!(normalized, 1 + 2 * 8 * 8);
    }

    #[rstest]
    #[case(0x01)]
    #[case(0x07)]
    #[case(0x10)]
    #[case(0x80)]
    #[case(0xF7)]
    fn unnormalized_bytes_are_rejected(#[case] bits: u8) {
        assert_eq!(
            Float8::try_from_bits(bits),
            Err(ArithmeticFault::Unnormalized { bits })
        );
        assert_eq!(
            Float8::try_from(bits),
            Err(ArithmeticFault::Unnormalized { bits })
        );
    }

    #[test]
    fn negative_zero_maps_to_canonical_zero() {
        assert_eq!(Float8::from_f32(-0.0), Ok(Float8::ZERO));
        assert!(Float8::ZERO.is_zero());
        assert_eq!(Float8::ZERO.to_f32().to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn low_significand_bits_are_truncated() {
        assert_eq!(Float8::from_f32(7.9), Ok(f8(0x7F)));
        assert_eq!(Float8::from_f32(-0.99), Ok(f8(0xCF)));
    }

    #[test]
    fn smallest_magnitude_is_one_thirty_second() {
        assert_eq!(Float8::from_f32(0.031_25), Ok(f8(0x08)));
        assert_eq!(
            Float8::from_f32(0.015_625),
            Err(ArithmeticFault::ExponentUnderflow { exponent: -5 })
        );
    }

    #[rstest]
    #[case(8.0, 4)]
    #[case(-15.0, 4)]
    #[case(f32::INFINITY, 129)]
    #[case(f32::NAN, 129)]
    fn large_magnitudes_overflow(#[case] value: f32, #[case] exponent: i32) {
        assert_eq!(
            Float8::from_f32(value),
            Err(ArithmeticFault::ExponentOverflow { exponent })
        );
    }

    #[test]
    fn conversions_through_std_traits_match_inherent_methods() {
        let value = Float8::try_from(2.5f32).expect("representable");
        assert_eq!(u8::from(value), 0x6A);
        assert_eq!(f32::from(value).to_bits(), 2.5f32.to_bits());
    }
}
