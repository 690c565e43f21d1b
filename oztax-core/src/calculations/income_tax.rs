//! Marginal income tax from a bracket schedule.
//!
//! ATO schedules publish each bracket as "tax on income over `min - 1`", so
//! `min_income` is the first dollar taxed at the bracket's marginal rate and
//! the marginal amount is `income - min + 1`. Getting this offset wrong is
//! the classic bracket bug, so every boundary is tested on both sides.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TaxBracket;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("no tax brackets provided")]
    Empty,

    #[error("no tax bracket covers income {0}")]
    NoMatchingBracket(Decimal),
}

/// The unique bracket containing `income`.
///
/// Incomes at or below zero resolve to the first bracket, which is where a
/// zero marginal rate lives in every published schedule.
pub fn bracket_for<'a>(
    income: Decimal,
    brackets: &'a [TaxBracket],
) -> Result<&'a TaxBracket, BracketError> {
    if brackets.is_empty() {
        return Err(BracketError::Empty);
    }
    if income <= Decimal::ZERO {
        return Ok(&brackets[0]);
    }

    brackets
        .iter()
        .find(|b| {
            income >= b.min_income
                && b.max_income.map_or(true, |max| income <= max)
        })
        .ok_or(BracketError::NoMatchingBracket(income))
}

/// Marginal income tax on `taxable_income`.
///
/// Result is `base_tax + rate * (income - min_income + 1)` for the matching
/// bracket, zero for incomes at or below zero. Always non-negative and
/// monotonically non-decreasing in income for a well-formed schedule.
///
/// # Example
///
/// 2024-25 resident rates: income of exactly 45,000 sits in the 16% bracket
/// (18,201 – 45,000) and owes 4,288; the next dollar is taxed at 30%.
pub fn income_tax(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> Result<Decimal, BracketError> {
    if brackets.is_empty() {
        return Err(BracketError::Empty);
    }
    if taxable_income <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let bracket = bracket_for(taxable_income, brackets)?;
    let marginal = taxable_income - bracket.min_income + Decimal::ONE;
    Ok(bracket.base_tax + bracket.rate * marginal)
}

/// Human-readable range label for a bracket, e.g. `"$18,201 - $45,000"` or
/// `"$190,001+"` for the open-ended top bracket.
pub fn bracket_label(bracket: &TaxBracket) -> String {
    match bracket.max_income {
        Some(max) => format!(
            "${} - ${}",
            group_thousands(bracket.min_income),
            group_thousands(max)
        ),
        None => format!("${}+", group_thousands(bracket.min_income)),
    }
}

fn group_thousands(value: Decimal) -> String {
    let raw = value.normalize().to_string();
    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = whole.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 && *c != '-' {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    /// 2024-25 resident schedule.
    fn brackets_2024_25() -> Vec<TaxBracket> {
        vec![
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
                max_income: Some(dec!(135000)),
                rate: dec!(0.30),
                base_tax: dec!(4288),
            },
            TaxBracket {
                min_income: dec!(135001),
                max_income: Some(dec!(190000)),
                rate: dec!(0.37),
                base_tax: dec!(31288),
            },
            TaxBracket {
                min_income: dec!(190001),
                max_income: None,
                rate: dec!(0.45),
                base_tax: dec!(51638),
            },
        ]
    }

    #[test]
    fn zero_income_owes_nothing() {
        let brackets = brackets_2024_25();

        assert_eq!(income_tax(dec!(0), &brackets), Ok(dec!(0)));
    }

    #[test]
    fn tax_free_threshold_owes_nothing() {
        let brackets = brackets_2024_25();

        assert_eq!(income_tax(dec!(18200), &brackets), Ok(dec!(0)));
    }

    #[test]
    fn first_dollar_over_threshold_is_taxed() {
        let brackets = brackets_2024_25();

        // 18,201 is the first dollar at 16%.
        assert_eq!(income_tax(dec!(18201), &brackets), Ok(dec!(0.16)));
    }

    #[test]
    fn income_at_bracket_max_stays_in_bracket() {
        let brackets = brackets_2024_25();

        // 45,000 is still in the 16% bracket: 16% of 26,800 = 4,288.
        assert_eq!(income_tax(dec!(45000), &brackets), Ok(dec!(4288.00)));
    }

    #[test]
    fn income_one_over_bracket_max_moves_up() {
        let brackets = brackets_2024_25();

        // 45,001 is the first dollar at 30%.
        assert_eq!(income_tax(dec!(45001), &brackets), Ok(dec!(4288.30)));
    }

    #[test]
    fn middle_bracket_matches_published_schedule() {
        let brackets = brackets_2024_25();

        // 4,288 + 30% of 90,000
        assert_eq!(income_tax(dec!(135000), &brackets), Ok(dec!(31288.00)));
    }

    #[test]
    fn top_bracket_is_unbounded() {
        let brackets = brackets_2024_25();

        // 51,638 + 45% of 110,000
        assert_eq!(income_tax(dec!(300000), &brackets), Ok(dec!(101138.00)));
    }

    #[test]
    fn tax_is_monotonic_across_every_boundary() {
        let brackets = brackets_2024_25();
        let boundaries = [dec!(18200), dec!(45000), dec!(135000), dec!(190000)];

        for max in boundaries {
            let at = income_tax(max, &brackets).unwrap();
            let over = income_tax(max + Decimal::ONE, &brackets).unwrap();

            assert!(over > at, "tax must increase crossing {max}");
        }
    }

    #[test]
    fn empty_brackets_is_an_error() {
        assert_eq!(income_tax(dec!(50000), &[]), Err(BracketError::Empty));
    }

    #[test]
    fn bracket_for_zero_income_is_first_bracket() {
        let brackets = brackets_2024_25();

        let bracket = bracket_for(dec!(0), &brackets).unwrap();

        assert_eq!(bracket.rate, dec!(0));
    }

    #[test]
    fn labels_render_ranges() {
        let brackets = brackets_2024_25();

        assert_eq!(bracket_label(&brackets[1]), "$18,201 - $45,000");
        assert_eq!(bracket_label(&brackets[4]), "$190,001+");
    }
}
