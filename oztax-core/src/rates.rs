//! Versioned rate table lookup.
//!
//! Tables are keyed by financial year. A lookup for a year with no exact
//! table falls back to the nearest earlier table — a recoverable condition
//! the caller is told about, not an error — so a new financial year can be
//! computed against last year's rates before the new tables are published.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::models::{FinancialYear, RateTable};

/// Hard lookup failures. Fallback to an earlier year is not one of these;
/// see [`RatesLookup::fallback_from`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateStoreError {
    /// The store holds no tables at all.
    #[error("no rate tables loaded")]
    Empty,

    /// The requested year predates every known table.
    #[error("no rate table for {requested} or any earlier year")]
    NoEarlierTable { requested: FinancialYear },
}

/// The outcome of a rate table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesLookup<'a> {
    pub table: &'a RateTable,
    /// Set when no exact table existed and the nearest earlier year was used
    /// instead; holds the year that was originally requested.
    pub fallback_from: Option<FinancialYear>,
}

impl RatesLookup<'_> {
    pub fn is_fallback(&self) -> bool {
        self.fallback_from.is_some()
    }
}

/// Holds one [`RateTable`] per financial year.
#[derive(Debug, Clone, Default)]
pub struct RateTableStore {
    tables: BTreeMap<FinancialYear, RateTable>,
}

impl RateTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: impl IntoIterator<Item = RateTable>) -> Self {
        let mut store = Self::new();
        for table in tables {
            store.insert(table);
        }
        store
    }

    /// Adds or replaces the table for its financial year.
    pub fn insert(&mut self, table: RateTable) {
        self.tables.insert(table.financial_year, table);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Financial years with an exact table, ascending.
    pub fn years(&self) -> impl Iterator<Item = &FinancialYear> {
        self.tables.keys()
    }

    /// The most recent table, if any are loaded.
    pub fn latest(&self) -> Option<&RateTable> {
        self.tables.values().next_back()
    }

    /// Looks up the table for `year`, falling back to the nearest earlier
    /// year when there is no exact match.
    ///
    /// # Errors
    ///
    /// [`RateStoreError::Empty`] when no tables are loaded, and
    /// [`RateStoreError::NoEarlierTable`] when `year` predates every table.
    pub fn rates_for(&self, year: &FinancialYear) -> Result<RatesLookup<'_>, RateStoreError> {
        if self.tables.is_empty() {
            return Err(RateStoreError::Empty);
        }

        if let Some(table) = self.tables.get(year) {
            return Ok(RatesLookup {
                table,
                fallback_from: None,
            });
        }

        let table = self
            .tables
            .range(..=year)
            .next_back()
            .map(|(_, table)| table)
            .ok_or(RateStoreError::NoEarlierTable { requested: *year })?;

        warn!(
            requested = %year,
            using = %table.financial_year,
            "no rate table for requested year, using nearest earlier table"
        );

        Ok(RatesLookup {
            table,
            fallback_from: Some(*year),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ContributionCaps, FrankingRule, LevyRule, RateTable};

    fn table_for(year: FinancialYear) -> RateTable {
        RateTable {
            financial_year: year,
            brackets: vec![],
            levy: LevyRule {
                full_exemption_threshold: dec!(26000),
                shade_in_threshold: dec!(32500),
                shade_in_rate: dec!(0.10),
                full_rate: dec!(0.02),
            },
            surcharge_tiers: vec![],
            repayment_tiers: vec![],
            caps: ContributionCaps {
                concessional_cap: dec!(27500),
                non_concessional_cap: dec!(110000),
                carry_forward_balance_threshold: dec!(500000),
            },
            franking: FrankingRule::from_company_rate(dec!(0.30)),
        }
    }

    fn store_with_years(years: &[i32]) -> RateTableStore {
        RateTableStore::from_tables(
            years
                .iter()
                .map(|y| table_for(FinancialYear::starting(*y))),
        )
    }

    #[test]
    fn exact_year_is_not_a_fallback() {
        let store = store_with_years(&[2023, 2024]);

        let lookup = store.rates_for(&FinancialYear::starting(2024)).unwrap();

        assert_eq!(lookup.table.financial_year, FinancialYear::starting(2024));
        assert!(!lookup.is_fallback());
    }

    #[test]
    fn future_year_falls_back_to_latest() {
        let store = store_with_years(&[2023, 2024]);
        let requested = FinancialYear::starting(2026);

        let lookup = store.rates_for(&requested).unwrap();

        assert_eq!(lookup.table.financial_year, FinancialYear::starting(2024));
        assert_eq!(lookup.fallback_from, Some(requested));
    }

    #[test]
    fn gap_year_falls_back_to_nearest_earlier() {
        let store = store_with_years(&[2022, 2024]);

        let lookup = store.rates_for(&FinancialYear::starting(2023)).unwrap();

        assert_eq!(lookup.table.financial_year, FinancialYear::starting(2022));
        assert!(lookup.is_fallback());
    }

    #[test]
    fn year_before_all_tables_is_an_error() {
        let store = store_with_years(&[2023, 2024]);
        let requested = FinancialYear::starting(2019);

        let result = store.rates_for(&requested);

        assert_eq!(result, Err(RateStoreError::NoEarlierTable { requested }));
    }

    #[test]
    fn empty_store_is_an_error() {
        let store = RateTableStore::new();

        let result = store.rates_for(&FinancialYear::starting(2024));

        assert_eq!(result, Err(RateStoreError::Empty));
    }

    #[test]
    fn latest_returns_most_recent_table() {
        let store = store_with_years(&[2022, 2024, 2023]);

        let latest = store.latest().unwrap();

        assert_eq!(latest.financial_year, FinancialYear::starting(2024));
    }
}
