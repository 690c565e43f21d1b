//! Superannuation contribution cap tracking.
//!
//! The tracker reports usage against each annual cap; it never enforces the
//! cap. Contributions past the cap are recorded as-is and surface as
//! `remaining: 0` / `percentage: 100` — a compliance signal for the caller,
//! not an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::carry_forward::CarryForwardAvailability;
use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::models::{ContributionCaps, ContributionRecord, ContributionType, FinancialYear, PersonId};

/// Usage of a single annual cap. `remaining` floors at zero and `percentage`
/// is clamped to `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapUsage {
    pub used: Decimal,
    pub cap: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
}

impl CapUsage {
    pub fn of(
        used: Decimal,
        cap: Decimal,
    ) -> Self {
        let percentage = if cap.is_zero() {
            if used > Decimal::ZERO {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            }
        } else {
            (used / cap * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
        };

        Self {
            used: round_half_up(used),
            cap,
            remaining: round_half_up(floor_at_zero(cap - used)),
            percentage: round_half_up(percentage),
        }
    }
}

/// Contribution-cap position for one member and financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
    pub member: PersonId,
    pub financial_year: FinancialYear,
    pub concessional: CapUsage,
    pub non_concessional: CapUsage,
    pub carry_forward: CarryForwardAvailability,
}

/// Total contributed for one contribution type.
pub fn total_by_type(
    records: &[ContributionRecord],
    contribution_type: ContributionType,
) -> Decimal {
    records
        .iter()
        .filter(|r| r.contribution_type == contribution_type)
        .map(|r| r.amount)
        .sum()
}

/// Builds the full summary from a member's contribution records, the year's
/// caps and a precomputed carry-forward position.
///
/// `records` are expected to already be scoped to the member and year.
pub fn summarise(
    member: &PersonId,
    financial_year: &FinancialYear,
    records: &[ContributionRecord],
    caps: &ContributionCaps,
    carry_forward: CarryForwardAvailability,
) -> ContributionSummary {
    let concessional_used = total_by_type(records, ContributionType::Concessional);
    let non_concessional_used = total_by_type(records, ContributionType::NonConcessional);

    ContributionSummary {
        member: member.clone(),
        financial_year: *financial_year,
        concessional: CapUsage::of(concessional_used, caps.concessional_cap),
        non_concessional: CapUsage::of(non_concessional_used, caps.non_concessional_cap),
        carry_forward,
    }
}
