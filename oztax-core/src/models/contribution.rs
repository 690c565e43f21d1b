use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FinancialYear, PersonId};

/// Statutory superannuation contribution categories, each with its own annual
/// cap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    Concessional,
    NonConcessional,
}

impl ContributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concessional => "concessional",
            Self::NonConcessional => "non_concessional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub member: PersonId,
    pub financial_year: FinancialYear,
    pub contribution_type: ContributionType,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Concessional cap usage for one member and year, written once when the year
/// is closed and never mutated afterward. The carry-forward engine reads up
/// to five of these per lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForwardRecord {
    pub member: PersonId,
    pub financial_year: FinancialYear,
    pub concessional_cap: Decimal,
    pub concessional_used: Decimal,
    /// `max(0, cap - used)` at close time.
    pub unused_amount: Decimal,
    pub total_super_balance_at_year_end: Decimal,
    pub eligible_for_carry_forward: bool,
}
