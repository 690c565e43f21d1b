//! The seam between the pure calculation core and the external
//! record-keeping collaborator.
//!
//! The application that owns persistence implements [`HouseholdStore`]; the
//! core ships [`MemoryStore`] for tests and in-process use. The one write
//! operation, [`HouseholdStore::close_year`], appends a carry-forward record
//! for a member/year at most once — closing an already-closed year is an
//! error, never an upsert.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CarryForwardRecord, ContributionRecord, DeductionRecord, FinancialYear, IncomeRecord, PersonId,
};

pub use memory::MemoryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no records for {person} in {financial_year}")]
    NotFound {
        person: PersonId,
        financial_year: FinancialYear,
    },

    /// A carry-forward record for this member/year already exists. The old
    /// record must be explicitly superseded before the year can be closed
    /// again.
    #[error("{member} already has a closed record for {financial_year}")]
    AlreadyClosed {
        member: PersonId,
        financial_year: FinancialYear,
    },

    #[error("store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait HouseholdStore: Send + Sync {
    /// Income records for one person and year.
    async fn income_records(
        &self,
        person: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<IncomeRecord>, StoreError>;

    /// Deduction records for one person and year.
    async fn deduction_records(
        &self,
        person: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<DeductionRecord>, StoreError>;

    /// Contribution records for one member and year.
    async fn contribution_records(
        &self,
        member: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<ContributionRecord>, StoreError>;

    /// Carry-forward records for the `window_years` financial years strictly
    /// before `before`, most recent last.
    async fn carry_forward_history(
        &self,
        member: &PersonId,
        before: &FinancialYear,
        window_years: i32,
    ) -> Result<Vec<CarryForwardRecord>, StoreError>;

    /// Appends a year-end carry-forward record.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyClosed`] when a record for the member/year
    /// already exists.
    async fn close_year(
        &self,
        record: CarryForwardRecord,
    ) -> Result<(), StoreError>;
}
