//! Pure tax and superannuation calculations.
//!
//! Every function here is deterministic over immutable inputs: no clocks, no
//! shared state, no I/O. The marginal bracket resolver and the flat repayment
//! tier calculator use the same table shape with deliberately different
//! formulas; see the module docs of each.

pub mod assessment;
pub mod carry_forward;
pub mod common;
pub mod contributions;
pub mod franking;
pub mod income_tax;
pub mod levy;
pub mod repayment;

pub use assessment::{AssessmentFlags, TaxAssessment, assess};
pub use carry_forward::{
    CARRY_FORWARD_WINDOW_YEARS, CarryForwardAvailability, CarryForwardPortion, carry_forward,
};
pub use contributions::{CapUsage, ContributionSummary, summarise, total_by_type};
pub use franking::{apply_offset, gross_up};
pub use income_tax::{BracketError, bracket_for, bracket_label, income_tax};
pub use levy::{levy_surcharge, medicare_levy};
pub use repayment::loan_repayment;
