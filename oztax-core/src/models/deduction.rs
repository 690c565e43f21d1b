use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FinancialYear, PersonId};

/// The closed set of deduction categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    WorkRelated,
    Investment,
    Donations,
    TaxAffairs,
    Other,
}

impl DeductionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkRelated => "work_related",
            Self::Investment => "investment",
            Self::Donations => "donations",
            Self::TaxAffairs => "tax_affairs",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRecord {
    pub person: PersonId,
    pub financial_year: FinancialYear,
    pub category: DeductionCategory,
    pub amount: Decimal,
}
