//! Concessional carry-forward across the rolling five-year window.
//!
//! The engine only reads the append-only ledger of year-end
//! [`CarryForwardRecord`]s; it never recomputes or corrects a past year.
//! Eligibility is gated on the total super balance recorded at the previous
//! year-end. A member with no previous-year record is treated as not
//! eligible — absence of data must not grant the benefit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::{CarryForwardRecord, FinancialYear};

/// How many prior financial years an unused concessional amount survives.
/// A sixth-year-old amount has expired even if still unused.
pub const CARRY_FORWARD_WINDOW_YEARS: i32 = 5;

/// One prior year's contribution to the available total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForwardPortion {
    pub financial_year: FinancialYear,
    pub unused_amount: Decimal,
}

/// Carry-forward position for a target year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForwardAvailability {
    pub available: Decimal,
    pub eligible: bool,
    /// Qualifying prior years, oldest first.
    pub breakdown: Vec<CarryForwardPortion>,
}

impl CarryForwardAvailability {
    pub fn ineligible() -> Self {
        Self {
            available: Decimal::ZERO,
            eligible: false,
            breakdown: Vec::new(),
        }
    }
}

/// Computes carry-forward availability for `target_year` from the member's
/// prior-year ledger.
///
/// `history` may contain any number of records; only the five years strictly
/// before the target year are considered, and only records flagged eligible
/// with a positive unused amount contribute. The balance gate uses the
/// record for the year immediately before the target year; if that record is
/// missing the member is conservatively not eligible.
pub fn carry_forward(
    target_year: &FinancialYear,
    history: &[CarryForwardRecord],
    balance_threshold: Decimal,
) -> CarryForwardAvailability {
    let previous_year = target_year.prev();
    let Some(previous) = history
        .iter()
        .find(|r| r.financial_year == previous_year)
    else {
        debug!(
            target = %target_year,
            "no balance record for previous year end, treating as not eligible"
        );
        return CarryForwardAvailability::ineligible();
    };

    if previous.total_super_balance_at_year_end >= balance_threshold {
        return CarryForwardAvailability::ineligible();
    }

    let mut qualifying: Vec<&CarryForwardRecord> = history
        .iter()
        .filter(|r| {
            let age = target_year.years_after(&r.financial_year);
            age >= 1
                && age <= CARRY_FORWARD_WINDOW_YEARS
                && r.eligible_for_carry_forward
                && r.unused_amount > Decimal::ZERO
        })
        .collect();
    qualifying.sort_by_key(|r| r.financial_year);

    let available: Decimal = qualifying.iter().map(|r| r.unused_amount).sum();
    let breakdown = qualifying
        .into_iter()
        .map(|r| CarryForwardPortion {
            financial_year: r.financial_year,
            unused_amount: round_half_up(r.unused_amount),
        })
        .collect();

    CarryForwardAvailability {
        available: round_half_up(available),
        eligible: true,
        breakdown,
    }
}
