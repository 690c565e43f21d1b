use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FinancialYear;

/// One marginal income tax bracket.
///
/// `min_income` is the first dollar taxed at `rate` (ATO schedule convention),
/// and `base_tax` is the accumulated tax on all lower brackets. Brackets are
/// ascending and contiguous: each bracket's `max_income + 1` is the next
/// bracket's `min_income`, and the last bracket has no maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

/// Medicare levy thresholds for one year.
///
/// Below `full_exemption_threshold` no levy applies. Between the two
/// thresholds the levy shades in at `shade_in_rate` of the excess over the
/// exemption threshold; at or above `shade_in_threshold` the levy is
/// `full_rate` of the whole income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyRule {
    pub full_exemption_threshold: Decimal,
    pub shade_in_threshold: Decimal,
    pub shade_in_rate: Decimal,
    pub full_rate: Decimal,
}

/// One Medicare levy surcharge tier. Flat rate on the whole income, not
/// marginal; the base tier carries a zero rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeTier {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// One HELP/study-loan repayment tier. Flat rate on the whole repayment
/// income, not marginal. Rates are non-decreasing across tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentTier {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// Superannuation contribution caps and the total-super-balance threshold
/// gating carry-forward eligibility, for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCaps {
    pub concessional_cap: Decimal,
    pub non_concessional_cap: Decimal,
    pub carry_forward_balance_threshold: Decimal,
}

/// Franking credit gross-up ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrankingRule {
    /// Statutory ratio: company tax rate / (1 - company tax rate).
    pub credit_ratio: Decimal,
}

impl FrankingRule {
    /// Derives the gross-up ratio from the company tax rate, e.g. 30% gives
    /// 30/70.
    pub fn from_company_rate(company_tax_rate: Decimal) -> Self {
        Self {
            credit_ratio: company_tax_rate / (Decimal::ONE - company_tax_rate),
        }
    }
}

/// The complete rate table for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub financial_year: FinancialYear,
    pub brackets: Vec<TaxBracket>,
    pub levy: LevyRule,
    pub surcharge_tiers: Vec<SurchargeTier>,
    pub repayment_tiers: Vec<RepaymentTier>,
    pub caps: ContributionCaps,
    pub franking: FrankingRule,
}
