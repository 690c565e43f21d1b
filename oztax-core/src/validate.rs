//! Boundary validation for record snapshots.
//!
//! Records come from an external record-keeping collaborator. A record that
//! violates a basic invariant indicates an upstream data-integrity problem,
//! so it is rejected here before it can reach the aggregator or tracker
//! rather than silently zeroed.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    ContributionRecord, DeductionRecord, FinancialYearError, IncomeRecord, PersonId,
};

/// A record that failed a basic invariant at the ingestion boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("income record for {person} has negative amount {amount}")]
    NegativeIncome { person: PersonId, amount: Decimal },

    #[error("income record for {person} has negative franking credits {amount}")]
    NegativeFrankingCredits { person: PersonId, amount: Decimal },

    #[error("income record for {person} has negative tax withheld {amount}")]
    NegativeWithholding { person: PersonId, amount: Decimal },

    #[error("deduction record for {person} has negative amount {amount}")]
    NegativeDeduction { person: PersonId, amount: Decimal },

    #[error("contribution record for {member} has negative amount {amount}")]
    NegativeContribution { member: PersonId, amount: Decimal },

    #[error(transparent)]
    Year(#[from] FinancialYearError),
}

pub fn validate_incomes(records: &[IncomeRecord]) -> Result<(), RecordError> {
    for record in records {
        if record.amount < Decimal::ZERO {
            return Err(RecordError::NegativeIncome {
                person: record.person.clone(),
                amount: record.amount,
            });
        }
        if record.franking_credits < Decimal::ZERO {
            return Err(RecordError::NegativeFrankingCredits {
                person: record.person.clone(),
                amount: record.franking_credits,
            });
        }
        if record.tax_withheld < Decimal::ZERO {
            return Err(RecordError::NegativeWithholding {
                person: record.person.clone(),
                amount: record.tax_withheld,
            });
        }
    }
    Ok(())
}

pub fn validate_deductions(records: &[DeductionRecord]) -> Result<(), RecordError> {
    for record in records {
        if record.amount < Decimal::ZERO {
            return Err(RecordError::NegativeDeduction {
                person: record.person.clone(),
                amount: record.amount,
            });
        }
    }
    Ok(())
}

pub fn validate_contributions(records: &[ContributionRecord]) -> Result<(), RecordError> {
    for record in records {
        if record.amount < Decimal::ZERO {
            return Err(RecordError::NegativeContribution {
                member: record.member.clone(),
                amount: record.amount,
            });
        }
    }
    Ok(())
}
