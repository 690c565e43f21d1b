//! HELP/study-loan repayment.
//!
//! Repayment tiers are the same shape as tax brackets but the formula is
//! different on purpose: the tier rate applies to the whole repayment income,
//! not the amount inside the tier. Keep this separate from the marginal
//! bracket resolver; the two must never be unified.

use rust_decimal::Decimal;

use crate::models::RepaymentTier;

/// Compulsory loan repayment on `repayment_income`.
///
/// Returns zero immediately when the person has no loan debt. Otherwise the
/// matching tier's rate times the whole income; an income below the first
/// repayment threshold owes nothing.
pub fn loan_repayment(
    repayment_income: Decimal,
    has_loan_debt: bool,
    tiers: &[RepaymentTier],
) -> Decimal {
    if !has_loan_debt {
        return Decimal::ZERO;
    }

    tiers
        .iter()
        .find(|t| {
            repayment_income >= t.min_income
                && t.max_income.map_or(true, |max| repayment_income <= max)
        })
        .map(|t| repayment_income * t.rate)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    /// Abbreviated 2024-25 HELP table: enough tiers to cross boundaries.
    fn tiers() -> Vec<RepaymentTier> {
        vec![
            RepaymentTier {
                min_income: dec!(0),
                max_income: Some(dec!(54434)),
                rate: dec!(0),
            },
            RepaymentTier {
                min_income: dec!(54435),
                max_income: Some(dec!(62850)),
                rate: dec!(0.01),
            },
            RepaymentTier {
                min_income: dec!(62851),
                max_income: Some(dec!(66620)),
                rate: dec!(0.02),
            },
            RepaymentTier {
                min_income: dec!(66621),
                max_income: None,
                rate: dec!(0.025),
            },
        ]
    }

    #[test]
    fn no_debt_means_no_repayment_regardless_of_income() {
        assert_eq!(loan_repayment(dec!(250000), false, &tiers()), dec!(0));
    }

    #[test]
    fn below_first_threshold_owes_nothing() {
        assert_eq!(loan_repayment(dec!(54434), true, &tiers()), dec!(0));
    }

    #[test]
    fn rate_applies_to_whole_income_not_the_excess() {
        // 1% of 60,000 = 600, not 1% of (60,000 - 54,435).
        assert_eq!(loan_repayment(dec!(60000), true, &tiers()), dec!(600.00));
    }

    #[test]
    fn tier_boundary_steps_the_whole_income_up() {
        let at_max = loan_repayment(dec!(62850), true, &tiers());
        let over = loan_repayment(dec!(62851), true, &tiers());

        assert_eq!(at_max, dec!(628.50));
        // The jump is discontinuous by design: 2% of the whole income.
        assert_eq!(over, dec!(1257.02));
    }

    #[test]
    fn open_ended_top_tier() {
        assert_eq!(loan_repayment(dec!(100000), true, &tiers()), dec!(2500.00));
    }
}
