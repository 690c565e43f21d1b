//! Household tax and superannuation calculation core.
//!
//! Pure, deterministic computation of Australian personal income tax,
//! Medicare levy and surcharge, HELP loan repayment, franking offsets and
//! superannuation contribution-cap tracking with five-year concessional
//! carry-forward. Record persistence is the caller's concern, behind the
//! [`HouseholdStore`] seam.

pub mod calculations;
pub mod engine;
pub mod models;
pub mod rates;
pub mod store;
pub mod validate;

pub use calculations::{
    AssessmentFlags, CapUsage, CarryForwardAvailability, ContributionSummary, TaxAssessment,
};
pub use engine::{EngineError, TaxEngine};
pub use models::*;
pub use rates::{RateStoreError, RateTableStore, RatesLookup};
pub use store::{HouseholdStore, MemoryStore, StoreError};
pub use validate::RecordError;
