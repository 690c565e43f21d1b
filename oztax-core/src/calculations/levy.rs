//! Medicare levy and Medicare levy surcharge.
//!
//! Both are computed against assessable income (taxable income plus grossed-up
//! franking credits). The levy shades in between two thresholds; the
//! surcharge is a flat tiered percentage of the whole income, zeroed by
//! private hospital cover. The two share nothing beyond the income base.

use rust_decimal::Decimal;

use crate::models::{LevyRule, SurchargeTier};

/// Medicare levy on `assessable_income`.
///
/// Zero at or below the full exemption threshold; `shade_in_rate` of the
/// excess over that threshold while strictly inside the shade-in band;
/// `full_rate` of the whole income once the shade-in threshold is reached.
pub fn medicare_levy(
    assessable_income: Decimal,
    rule: &LevyRule,
) -> Decimal {
    if assessable_income <= rule.full_exemption_threshold {
        Decimal::ZERO
    } else if assessable_income < rule.shade_in_threshold {
        (assessable_income - rule.full_exemption_threshold) * rule.shade_in_rate
    } else {
        assessable_income * rule.full_rate
    }
}

/// Medicare levy surcharge on `assessable_income`.
///
/// Private hospital cover exempts entirely. Otherwise the matching tier's
/// rate applies to the whole income — flat, not marginal. An income matching
/// no tier owes nothing.
pub fn levy_surcharge(
    assessable_income: Decimal,
    has_private_cover: bool,
    tiers: &[SurchargeTier],
) -> Decimal {
    if has_private_cover {
        return Decimal::ZERO;
    }

    tiers
        .iter()
        .find(|t| {
            assessable_income >= t.min_income
                && t.max_income.map_or(true, |max| assessable_income <= max)
        })
        .map(|t| assessable_income * t.rate)
        .unwrap_or(Decimal::ZERO)
}
