//! In-memory [`HouseholdStore`] used by tests and in-process callers.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::models::{
    CarryForwardRecord, ContributionRecord, DeductionRecord, FinancialYear, IncomeRecord, PersonId,
};
use crate::store::{HouseholdStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    incomes: Vec<IncomeRecord>,
    deductions: Vec<DeductionRecord>,
    contributions: Vec<ContributionRecord>,
    carry_forward: Vec<CarryForwardRecord>,
}

/// Lock-based store; the locks are held only for the duration of a copy, so
/// the async methods never block on anything slow.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_income(&self, record: IncomeRecord) {
        self.inner.write().expect("store lock").incomes.push(record);
    }

    pub fn add_deduction(&self, record: DeductionRecord) {
        self.inner
            .write()
            .expect("store lock")
            .deductions
            .push(record);
    }

    pub fn add_contribution(&self, record: ContributionRecord) {
        self.inner
            .write()
            .expect("store lock")
            .contributions
            .push(record);
    }
}

#[async_trait]
impl HouseholdStore for MemoryStore {
    async fn income_records(
        &self,
        person: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<IncomeRecord>, StoreError> {
        let inner = self.inner.read().expect("store lock");
        Ok(inner
            .incomes
            .iter()
            .filter(|r| &r.person == person && &r.financial_year == financial_year)
            .cloned()
            .collect())
    }

    async fn deduction_records(
        &self,
        person: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<DeductionRecord>, StoreError> {
        let inner = self.inner.read().expect("store lock");
        Ok(inner
            .deductions
            .iter()
            .filter(|r| &r.person == person && &r.financial_year == financial_year)
            .cloned()
            .collect())
    }

    async fn contribution_records(
        &self,
        member: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<Vec<ContributionRecord>, StoreError> {
        let inner = self.inner.read().expect("store lock");
        Ok(inner
            .contributions
            .iter()
            .filter(|r| &r.member == member && &r.financial_year == financial_year)
            .cloned()
            .collect())
    }

    async fn carry_forward_history(
        &self,
        member: &PersonId,
        before: &FinancialYear,
        window_years: i32,
    ) -> Result<Vec<CarryForwardRecord>, StoreError> {
        let inner = self.inner.read().expect("store lock");
        let mut history: Vec<CarryForwardRecord> = inner
            .carry_forward
            .iter()
            .filter(|r| {
                let age = before.years_after(&r.financial_year);
                &r.member == member && age >= 1 && age <= window_years
            })
            .cloned()
            .collect();
        history.sort_by_key(|r| r.financial_year);
        Ok(history)
    }

    async fn close_year(
        &self,
        record: CarryForwardRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock");
        let exists = inner.carry_forward.iter().any(|r| {
            r.member == record.member && r.financial_year == record.financial_year
        });
        if exists {
            return Err(StoreError::AlreadyClosed {
                member: record.member,
                financial_year: record.financial_year,
            });
        }
        inner.carry_forward.push(record);
        Ok(())
    }
}
