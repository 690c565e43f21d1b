mod contribution;
mod deduction;
mod financial_year;
mod income;
mod person;
mod rate_table;

pub use contribution::{CarryForwardRecord, ContributionRecord, ContributionType};
pub use deduction::{DeductionCategory, DeductionRecord};
pub use financial_year::{FinancialYear, FinancialYearError};
pub use income::{IncomeRecord, IncomeType};
pub use person::PersonId;
pub use rate_table::{
    ContributionCaps, FrankingRule, LevyRule, RateTable, RepaymentTier, SurchargeTier, TaxBracket,
};
