//! Franking credit gross-up and offset.
//!
//! Credits attached to a franked distribution are taxable themselves: they
//! are added to assessable income before tax, levy, surcharge and repayment
//! are computed, then subtracted as an offset afterwards. The offset can only
//! reduce net payable to zero here; whether the excess is refunded is a
//! downstream decision, so the gross offset is always reported alongside the
//! clamped net figure.

use rust_decimal::Decimal;

use crate::calculations::common::floor_at_zero;
use crate::models::FrankingRule;

/// The statutory credit attached to a fully franked distribution:
/// `distribution * credit_ratio` where the ratio is company rate over one
/// minus company rate (30/70 at a 30% company rate).
pub fn gross_up(
    distribution: Decimal,
    rule: &FrankingRule,
) -> Decimal {
    distribution * rule.credit_ratio
}

/// Net tax payable after the franking offset: `max(0, total - credits)`.
pub fn apply_offset(
    total_before_offsets: Decimal,
    franking_credits: Decimal,
) -> Decimal {
    floor_at_zero(total_before_offsets - franking_credits)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;

    #[test]
    fn gross_up_uses_thirty_over_seventy_at_company_rate() {
        let rule = FrankingRule::from_company_rate(dec!(0.30));

        let credit = gross_up(dec!(700), &rule);

        assert_eq!(round_half_up(credit), dec!(300.00));
    }

    #[test]
    fn offset_reduces_tax() {
        assert_eq!(apply_offset(dec!(5000), dec!(1200)), dec!(3800));
    }

    #[test]
    fn offset_never_drives_net_payable_negative() {
        assert_eq!(apply_offset(dec!(800), dec!(1200)), dec!(0));
    }
}
