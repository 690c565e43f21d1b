//! Shared helpers for tax calculations.
//!
//! Internal arithmetic runs at full `Decimal` precision; rounding to two
//! decimal places happens only when a result is assembled for presentation.

use rust_decimal::Decimal;

/// Rounds a value to two decimal places using half-up (away from zero)
/// rounding, the standard financial convention.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use oztax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a negative value to zero. Money components of a result are never
/// negative; only the explicit refund position may be.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(45.674)), dec!(45.67));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(45.675)), dec!(45.68));
    }

    #[test]
    fn round_half_up_rounds_away_from_zero_for_negatives() {
        assert_eq!(round_half_up(dec!(-45.675)), dec!(-45.68));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100), dec!(200)), dec!(200));
        assert_eq!(max(dec!(200), dec!(100)), dec!(200));
    }

    #[test]
    fn floor_at_zero_clamps_negatives() {
        assert_eq!(floor_at_zero(dec!(-12.34)), dec!(0));
        assert_eq!(floor_at_zero(dec!(12.34)), dec!(12.34));
    }
}
