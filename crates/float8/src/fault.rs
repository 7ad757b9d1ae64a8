use thiserror::Error;

/// Faults raised while constructing or combining [`crate::Float8`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ArithmeticFault {
    /// The normalized exponent is above the representable maximum.
    #[error("exponent overflow: {exponent} is above {max}", max = crate::EXPONENT_MAX)]
    ExponentOverflow {
        /// Exponent the result would have needed.
        exponent: i32,
    },
    /// The normalized exponent is below the representable minimum.
    #[error("exponent underflow: {exponent} is below {min}", min = crate::EXPONENT_MIN)]
    ExponentUnderflow {
        /// Exponent the result would have needed.
        exponent: i32,
    },
    /// A raw byte does not hold a normalized 8-bit floating-point value.
    #[error("byte {bits:#04x} is not in normalized 8-bit floating-point form")]
    Unnormalized {
        /// Offending raw byte.
        bits: u8,
    },
}

impl ArithmeticFault {
    /// Classifies an out-of-range exponent, or returns `None` when it fits.
    #[must_use]
    pub const fn check_exponent(exponent: i32) -> Option<Self> {
        if exponent > crate::EXPONENT_MAX {
            Some(Self::ExponentOverflow { exponent })
        } else if exponent < crate::EXPONENT_MIN {
            Some(Self::ExponentUnderflow { exponent })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArithmeticFault;

    #[test]
    fn exponent_range_is_minus_four_to_three() {
        for exponent in -4..=3 {
            assert_eq!(ArithmeticFault::check_exponent(exponent), None);
        }
        assert_eq!(
            ArithmeticFault::check_exponent(4),
            Some(ArithmeticFault::ExponentOverflow { exponent: 4 })
        );
        assert_eq!(
            ArithmeticFault::check_exponent(-5),
            Some(ArithmeticFault::ExponentUnderflow { exponent: -5 })
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let overflow = ArithmeticFault::ExponentOverflow { exponent: 4 };
        assert_eq!(overflow.to_string(), "exponent overflow: 4 is above 3");

        let unnormalized = ArithmeticFault::Unnormalized { bits: 0x01 };
        assert_eq!(
            unnormalized.to_string(),
            "byte 0x01 is not in normalized 8-bit floating-point form"
        );
    }
}
