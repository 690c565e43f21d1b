//! Per-person, per-year tax assessment.
//!
//! Composes the bracket resolver, levy calculator, repayment calculator and
//! franking offset into one result. All components after income tax are
//! computed against assessable income — taxable income plus grossed-up
//! franking credits — matching how credits are grossed into assessable
//! income before the offset is applied. Repayment income really includes
//! further reportable items (e.g. reportable super contributions); the
//! single-base simplification is deliberate and documented.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::calculations::franking::apply_offset;
use crate::calculations::income_tax::{BracketError, bracket_for, bracket_label, income_tax};
use crate::calculations::levy::{levy_surcharge, medicare_levy};
use crate::calculations::repayment::loan_repayment;
use crate::models::{
    DeductionCategory, DeductionRecord, FinancialYear, IncomeRecord, IncomeType, PersonId,
    RateTable,
};

/// Per-person circumstances that change which components apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentFlags {
    pub has_loan_debt: bool,
    pub has_private_cover: bool,
}

/// A complete tax position for one person and financial year.
///
/// Money fields are rounded to two decimal places and non-negative, except
/// `refund_or_owing` which is negative when a refund is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub person: PersonId,
    pub financial_year: FinancialYear,

    pub gross_income: Decimal,
    pub income_by_type: BTreeMap<IncomeType, Decimal>,
    pub total_deductions: Decimal,
    pub deductions_by_category: BTreeMap<DeductionCategory, Decimal>,
    pub taxable_income: Decimal,
    pub franking_credits: Decimal,
    pub assessable_income: Decimal,

    pub income_tax: Decimal,
    pub medicare_levy: Decimal,
    pub levy_surcharge: Decimal,
    pub loan_repayment: Decimal,
    pub total_before_offsets: Decimal,

    /// Gross franking offset. The portion above `total_before_offsets` is
    /// refundable downstream; it is not clamped here.
    pub franking_offset: Decimal,
    pub net_tax_payable: Decimal,
    pub tax_withheld: Decimal,
    /// `net_tax_payable - tax_withheld`; negative means a refund.
    pub refund_or_owing: Decimal,

    /// `net_tax_payable / gross_income`, zero for zero gross income.
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    pub bracket_label: String,
}

/// Assesses one person's tax for one financial year.
///
/// `incomes` and `deductions` are expected to already be scoped to the person
/// and year; the engine layer fetches and validates them. Empty records give
/// an all-zero assessment, not an error.
///
/// # Errors
///
/// [`BracketError`] when the rate table carries no brackets.
pub fn assess(
    person: &PersonId,
    financial_year: &FinancialYear,
    incomes: &[IncomeRecord],
    deductions: &[DeductionRecord],
    rates: &RateTable,
    flags: AssessmentFlags,
) -> Result<TaxAssessment, BracketError> {
    let mut income_by_type: BTreeMap<IncomeType, Decimal> = BTreeMap::new();
    let mut gross_income = Decimal::ZERO;
    let mut franking_credits = Decimal::ZERO;
    let mut tax_withheld = Decimal::ZERO;

    for record in incomes {
        // Withheld amounts count toward the refund position even on
        // non-taxable records; everything else only when taxable.
        tax_withheld += record.tax_withheld;
        if !record.is_taxable {
            continue;
        }
        gross_income += record.amount;
        franking_credits += record.franking_credits;
        *income_by_type.entry(record.income_type).or_default() += record.amount;
    }

    let mut deductions_by_category: BTreeMap<DeductionCategory, Decimal> = BTreeMap::new();
    let mut total_deductions = Decimal::ZERO;
    for record in deductions {
        total_deductions += record.amount;
        *deductions_by_category.entry(record.category).or_default() += record.amount;
    }

    let taxable_income = floor_at_zero(gross_income - total_deductions);
    let assessable_income = taxable_income + franking_credits;

    let income_tax = income_tax(assessable_income, &rates.brackets)?;
    let medicare_levy = medicare_levy(assessable_income, &rates.levy);
    let levy_surcharge = levy_surcharge(
        assessable_income,
        flags.has_private_cover,
        &rates.surcharge_tiers,
    );
    let loan_repayment = loan_repayment(
        assessable_income,
        flags.has_loan_debt,
        &rates.repayment_tiers,
    );

    let total_before_offsets = income_tax + medicare_levy + levy_surcharge + loan_repayment;
    let net_tax_payable = apply_offset(total_before_offsets, franking_credits);
    let refund_or_owing = net_tax_payable - tax_withheld;

    let effective_rate = if gross_income.is_zero() {
        Decimal::ZERO
    } else {
        net_tax_payable / gross_income
    };
    let marginal_bracket = bracket_for(assessable_income, &rates.brackets)?;

    Ok(TaxAssessment {
        person: person.clone(),
        financial_year: *financial_year,
        gross_income: round_half_up(gross_income),
        income_by_type: rounded_map(income_by_type),
        total_deductions: round_half_up(total_deductions),
        deductions_by_category: rounded_map(deductions_by_category),
        taxable_income: round_half_up(taxable_income),
        franking_credits: round_half_up(franking_credits),
        assessable_income: round_half_up(assessable_income),
        income_tax: round_half_up(income_tax),
        medicare_levy: round_half_up(medicare_levy),
        levy_surcharge: round_half_up(levy_surcharge),
        loan_repayment: round_half_up(loan_repayment),
        total_before_offsets: round_half_up(total_before_offsets),
        franking_offset: round_half_up(franking_credits),
        net_tax_payable: round_half_up(net_tax_payable),
        tax_withheld: round_half_up(tax_withheld),
        refund_or_owing: round_half_up(refund_or_owing),
        effective_rate: effective_rate.round_dp(4),
        marginal_rate: marginal_bracket.rate,
        bracket_label: bracket_label(marginal_bracket),
    })
}

fn rounded_map<K: Ord>(map: BTreeMap<K, Decimal>) -> BTreeMap<K, Decimal> {
    map.into_iter()
        .map(|(k, v)| (k, round_half_up(v)))
        .collect()
}
