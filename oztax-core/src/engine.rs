//! Orchestration layer tying the store, rate tables and pure calculations
//! together into the three external queries: tax assessment, contribution
//! summary and the year-close write.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::calculations::carry_forward::{CARRY_FORWARD_WINDOW_YEARS, carry_forward};
use crate::calculations::common::floor_at_zero;
use crate::calculations::contributions::{ContributionSummary, summarise, total_by_type};
use crate::calculations::income_tax::BracketError;
use crate::calculations::{AssessmentFlags, TaxAssessment, assess};
use crate::models::{CarryForwardRecord, ContributionType, FinancialYear, PersonId};
use crate::rates::{RateStoreError, RateTableStore, RatesLookup};
use crate::store::{HouseholdStore, StoreError};
use crate::validate::{
    RecordError, validate_contributions, validate_deductions, validate_incomes,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rates(#[from] RateStoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Brackets(#[from] BracketError),
}

/// The household tax engine: pure calculations behind a fetching facade.
///
/// All methods are stateless between calls; running the same query twice
/// against unchanged records gives identical results.
pub struct TaxEngine<S> {
    store: S,
    rates: RateTableStore,
}

impl<S: HouseholdStore> TaxEngine<S> {
    pub fn new(
        store: S,
        rates: RateTableStore,
    ) -> Self {
        Self { store, rates }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read-only rate table lookup, with nearest-earlier fallback.
    pub fn rates_for(
        &self,
        financial_year: &FinancialYear,
    ) -> Result<RatesLookup<'_>, RateStoreError> {
        self.rates.rates_for(financial_year)
    }

    /// Complete tax position for one person and financial year.
    pub async fn assess(
        &self,
        person: &PersonId,
        financial_year: &FinancialYear,
        flags: AssessmentFlags,
    ) -> Result<TaxAssessment, EngineError> {
        let incomes = self.store.income_records(person, financial_year).await?;
        validate_incomes(&incomes)?;
        let deductions = self.store.deduction_records(person, financial_year).await?;
        validate_deductions(&deductions)?;

        let lookup = self.rates.rates_for(financial_year)?;
        let result = assess(
            person,
            financial_year,
            &incomes,
            &deductions,
            lookup.table,
            flags,
        )?;
        Ok(result)
    }

    /// Contribution-cap position including carry-forward availability.
    pub async fn contribution_summary(
        &self,
        member: &PersonId,
        financial_year: &FinancialYear,
    ) -> Result<ContributionSummary, EngineError> {
        let contributions = self
            .store
            .contribution_records(member, financial_year)
            .await?;
        validate_contributions(&contributions)?;

        let lookup = self.rates.rates_for(financial_year)?;
        let history = self
            .store
            .carry_forward_history(member, financial_year, CARRY_FORWARD_WINDOW_YEARS)
            .await?;
        let carry = carry_forward(
            financial_year,
            &history,
            lookup.table.caps.carry_forward_balance_threshold,
        );

        Ok(summarise(
            member,
            financial_year,
            &contributions,
            &lookup.table.caps,
            carry,
        ))
    }

    /// Closes a member's financial year: computes concessional cap usage,
    /// derives carry-forward eligibility from the supplied year-end total
    /// super balance, and appends the record to the ledger.
    ///
    /// Recomputation requires the old record to be explicitly superseded
    /// first; calling this twice for the same member/year fails with
    /// [`StoreError::AlreadyClosed`].
    pub async fn close_year(
        &self,
        member: &PersonId,
        financial_year: &FinancialYear,
        total_super_balance_at_year_end: Decimal,
    ) -> Result<CarryForwardRecord, EngineError> {
        let contributions = self
            .store
            .contribution_records(member, financial_year)
            .await?;
        validate_contributions(&contributions)?;

        let lookup = self.rates.rates_for(financial_year)?;
        let cap = lookup.table.caps.concessional_cap;
        let used = total_by_type(&contributions, ContributionType::Concessional);

        let record = CarryForwardRecord {
            member: member.clone(),
            financial_year: *financial_year,
            concessional_cap: cap,
            concessional_used: used,
            unused_amount: floor_at_zero(cap - used),
            total_super_balance_at_year_end,
            eligible_for_carry_forward: total_super_balance_at_year_end
                < lookup.table.caps.carry_forward_balance_threshold,
        };

        self.store.close_year(record.clone()).await?;
        info!(member = %member, year = %financial_year, "financial year closed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        ContributionCaps, ContributionRecord, FrankingRule, IncomeRecord, IncomeType, LevyRule,
        RateTable, RepaymentTier, SurchargeTier, TaxBracket,
    };
    use crate::store::MemoryStore;

    fn rates() -> RateTableStore {
        RateTableStore::from_tables([table_for(2023), table_for(2024)])
    }

    fn table_for(start_year: i32) -> RateTable {
        RateTable {
            financial_year: FinancialYear::starting(start_year),
            brackets: vec![
                TaxBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(18200)),
                    rate: dec!(0),
                    base_tax: dec!(0),
                },
                TaxBracket {
                    min_income: dec!(18201),
                    max_income: Some(dec!(45000)),
                    rate: dec!(0.16),
                    base_tax: dec!(0),
                },
                TaxBracket {
                    min_income: dec!(45001),
                    max_income: None,
                    rate: dec!(0.30),
                    base_tax: dec!(4288),
                },
            ],
            levy: LevyRule {
                full_exemption_threshold: dec!(27222),
                shade_in_threshold: dec!(34027),
                shade_in_rate: dec!(0.10),
                full_rate: dec!(0.02),
            },
            surcharge_tiers: vec![SurchargeTier {
                min_income: dec!(0),
                max_income: None,
                rate: dec!(0),
            }],
            repayment_tiers: vec![RepaymentTier {
                min_income: dec!(0),
                max_income: None,
                rate: dec!(0),
            }],
            caps: ContributionCaps {
                concessional_cap: dec!(30000),
                non_concessional_cap: dec!(120000),
                carry_forward_balance_threshold: dec!(500000),
            },
            franking: FrankingRule::from_company_rate(dec!(0.30)),
        }
    }

    fn member() -> PersonId {
        PersonId::new("sam")
    }

    fn year() -> FinancialYear {
        FinancialYear::starting(2024)
    }

    fn concessional(amount: Decimal) -> ContributionRecord {
        ContributionRecord {
            member: member(),
            financial_year: year(),
            contribution_type: ContributionType::Concessional,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
        }
    }

    #[tokio::test]
    async fn assess_fetches_and_computes() {
        let store = MemoryStore::new();
        store.add_income(IncomeRecord {
            person: member(),
            financial_year: year(),
            income_type: IncomeType::Salary,
            amount: dec!(60000),
            franking_credits: dec!(0),
            tax_withheld: dec!(11000),
            is_taxable: true,
        });
        let engine = TaxEngine::new(store, rates());

        let result = engine
            .assess(&member(), &year(), AssessmentFlags::default())
            .await
            .unwrap();

        // 4,288 + 30% of 15,000 income tax, plus 2% levy.
        assert_eq!(result.income_tax, dec!(8788.00));
        assert_eq!(result.medicare_levy, dec!(1200.00));
        assert_eq!(result.refund_or_owing, dec!(-1012.00));
    }

    #[tokio::test]
    async fn assess_rejects_invalid_records() {
        let store = MemoryStore::new();
        store.add_income(IncomeRecord {
            person: member(),
            financial_year: year(),
            income_type: IncomeType::Other,
            amount: dec!(-500),
            franking_credits: dec!(0),
            tax_withheld: dec!(0),
            is_taxable: true,
        });
        let engine = TaxEngine::new(store, rates());

        let result = engine
            .assess(&member(), &year(), AssessmentFlags::default())
            .await;

        assert!(matches!(result, Err(EngineError::Record(_))));
    }

    #[tokio::test]
    async fn close_year_records_unused_cap_and_eligibility() {
        let store = MemoryStore::new();
        store.add_contribution(concessional(dec!(21000)));
        let engine = TaxEngine::new(store, rates());

        let record = engine
            .close_year(&member(), &year(), dec!(240000))
            .await
            .unwrap();

        assert_eq!(record.concessional_used, dec!(21000));
        assert_eq!(record.unused_amount, dec!(9000));
        assert!(record.eligible_for_carry_forward);
    }

    #[tokio::test]
    async fn close_year_twice_is_rejected() {
        let store = MemoryStore::new();
        let engine = TaxEngine::new(store, rates());

        engine
            .close_year(&member(), &year(), dec!(240000))
            .await
            .unwrap();
        let second = engine.close_year(&member(), &year(), dec!(240000)).await;

        assert!(matches!(
            second,
            Err(EngineError::Store(StoreError::AlreadyClosed { .. }))
        ));
    }

    #[tokio::test]
    async fn contribution_summary_includes_carry_forward() {
        let store = MemoryStore::new();
        store.add_contribution(concessional(dec!(10000)));
        let engine = TaxEngine::new(store, rates());

        // Close the prior year with unused cap and an eligible balance.
        let prior = year().prev();
        engine.store().add_contribution(ContributionRecord {
            member: member(),
            financial_year: prior,
            contribution_type: ContributionType::Concessional,
            amount: dec!(24000),
            date: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
        });
        engine
            .close_year(&member(), &prior, dec!(180000))
            .await
            .unwrap();

        let summary = engine
            .contribution_summary(&member(), &year())
            .await
            .unwrap();

        assert_eq!(summary.concessional.used, dec!(10000.00));
        assert_eq!(summary.concessional.remaining, dec!(20000.00));
        assert!(summary.carry_forward.eligible);
        // Prior year: 30,000 cap minus 24,000 used.
        assert_eq!(summary.carry_forward.available, dec!(6000.00));
    }

    #[tokio::test]
    async fn summary_for_member_with_no_history_is_not_eligible() {
        let store = MemoryStore::new();
        store.add_contribution(concessional(dec!(35000)));
        let engine = TaxEngine::new(store, rates());

        let summary = engine
            .contribution_summary(&member(), &year())
            .await
            .unwrap();

        // Over-cap is a signal, not an error.
        assert_eq!(summary.concessional.remaining, dec!(0.00));
        assert_eq!(summary.concessional.percentage, dec!(100.00));
        assert!(!summary.carry_forward.eligible);
        assert_eq!(summary.carry_forward.available, dec!(0));
    }
}
