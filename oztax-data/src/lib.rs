//! CSV loading for versioned tax and superannuation rate tables.

pub mod loader;

pub use loader::{RateTableLoader, RateTableLoaderError, TaxBracketRow, TierRow, YearRulesRow};
