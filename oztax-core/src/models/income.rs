use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FinancialYear, PersonId};

/// The closed set of income categories tracked by the household.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Salary,
    Dividend,
    TrustDistribution,
    Rental,
    CapitalGain,
    Other,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Dividend => "dividend",
            Self::TrustDistribution => "trust_distribution",
            Self::Rental => "rental",
            Self::CapitalGain => "capital_gain",
            Self::Other => "other",
        }
    }
}

/// A single income record, received as a read-only snapshot from the
/// record-keeping collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub person: PersonId,
    pub financial_year: FinancialYear,
    pub income_type: IncomeType,
    pub amount: Decimal,
    /// Franking credits attached to the distribution, already grossed up.
    pub franking_credits: Decimal,
    /// PAYG tax already withheld at source.
    pub tax_withheld: Decimal,
    /// Non-taxable records are excluded from gross income but any withheld
    /// amount is still counted toward the refund position.
    pub is_taxable: bool,
}
