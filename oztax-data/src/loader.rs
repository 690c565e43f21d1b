use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use oztax_core::models::{
    ContributionCaps, FinancialYear, FinancialYearError, FrankingRule, LevyRule, RateTable,
    RepaymentTier, SurchargeTier, TaxBracket,
};
use oztax_core::rates::RateTableStore;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading rate table data.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error(transparent)]
    Year(#[from] FinancialYearError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no year rules row for {0}, but other tables reference it")]
    MissingYearRules(FinancialYear),

    #[error("no tax brackets for {0}")]
    NoBrackets(FinancialYear),

    #[error("{table} for {financial_year}: first range must start at 0, got {min}")]
    FirstRangeNotZero {
        table: &'static str,
        financial_year: FinancialYear,
        min: Decimal,
    },

    #[error(
        "{table} for {financial_year}: range starting at {min} does not follow \
         previous maximum {prev_max}"
    )]
    NonContiguous {
        table: &'static str,
        financial_year: FinancialYear,
        prev_max: Decimal,
        min: Decimal,
    },

    #[error("{table} for {financial_year}: only the last range may be unbounded")]
    UnboundedInnerRange {
        table: &'static str,
        financial_year: FinancialYear,
    },

    #[error("{table} for {financial_year}: last range must be unbounded")]
    BoundedLastRange {
        table: &'static str,
        financial_year: FinancialYear,
    },

    #[error(
        "year rules for {financial_year}: full exemption threshold {exemption} \
         must be below shade-in threshold {shade_in}"
    )]
    InvalidLevyThresholds {
        financial_year: FinancialYear,
        exemption: Decimal,
        shade_in: Decimal,
    },

    #[error("repayment tiers for {financial_year}: rate decreases at {min}")]
    DecreasingRepaymentRate {
        financial_year: FinancialYear,
        min: Decimal,
    },
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// A row of `tax_brackets.csv`: one marginal bracket for one year.
/// `max_income` is empty for the open-ended top bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRow {
    pub financial_year: FinancialYear,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

/// A row of `repayment_tiers.csv` or `surcharge_tiers.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TierRow {
    pub financial_year: FinancialYear,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `year_rules.csv`: levy thresholds, company tax rate and
/// contribution caps for one year.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct YearRulesRow {
    pub financial_year: FinancialYear,
    pub full_exemption_threshold: Decimal,
    pub shade_in_threshold: Decimal,
    pub shade_in_rate: Decimal,
    pub full_rate: Decimal,
    pub company_tax_rate: Decimal,
    pub concessional_cap: Decimal,
    pub non_concessional_cap: Decimal,
    pub carry_forward_balance_threshold: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loads versioned rate tables from CSV files and assembles a validated
/// [`RateTableStore`].
///
/// A data directory holds four files: `tax_brackets.csv`,
/// `repayment_tiers.csv`, `surcharge_tiers.csv` and `year_rules.csv`. Every
/// year referenced by any table must have a year rules row. Ranges are
/// checked for contiguity (`max + 1 == next.min`) so an off-by-one in the
/// published figures is caught at load time, not at assessment time.
pub struct RateTableLoader;

impl RateTableLoader {
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracketRow>, RateTableLoaderError> {
        parse_rows(reader)
    }

    pub fn parse_repayment_tiers<R: Read>(
        reader: R
    ) -> Result<Vec<TierRow>, RateTableLoaderError> {
        parse_rows(reader)
    }

    pub fn parse_surcharge_tiers<R: Read>(
        reader: R
    ) -> Result<Vec<TierRow>, RateTableLoaderError> {
        parse_rows(reader)
    }

    pub fn parse_year_rules<R: Read>(reader: R) -> Result<Vec<YearRulesRow>, RateTableLoaderError> {
        parse_rows(reader)
    }

    /// Reads the four conventional CSV files from `dir`.
    pub fn load_dir(dir: &Path) -> Result<RateTableStore, RateTableLoaderError> {
        let brackets = Self::parse_brackets(open(dir, "tax_brackets.csv")?)?;
        let repayment = Self::parse_repayment_tiers(open(dir, "repayment_tiers.csv")?)?;
        let surcharge = Self::parse_surcharge_tiers(open(dir, "surcharge_tiers.csv")?)?;
        let rules = Self::parse_year_rules(open(dir, "year_rules.csv")?)?;
        Self::build(brackets, repayment, surcharge, rules)
    }

    /// Groups rows by financial year, validates each year's tables and
    /// builds the store.
    pub fn build(
        brackets: Vec<TaxBracketRow>,
        repayment: Vec<TierRow>,
        surcharge: Vec<TierRow>,
        rules: Vec<YearRulesRow>,
    ) -> Result<RateTableStore, RateTableLoaderError> {
        let mut brackets_by_year: BTreeMap<FinancialYear, Vec<TaxBracketRow>> = BTreeMap::new();
        for row in brackets {
            brackets_by_year.entry(row.financial_year).or_default().push(row);
        }
        let mut repayment_by_year: BTreeMap<FinancialYear, Vec<TierRow>> = BTreeMap::new();
        for row in repayment {
            repayment_by_year.entry(row.financial_year).or_default().push(row);
        }
        let mut surcharge_by_year: BTreeMap<FinancialYear, Vec<TierRow>> = BTreeMap::new();
        for row in surcharge {
            surcharge_by_year.entry(row.financial_year).or_default().push(row);
        }

        let rules_by_year: BTreeMap<FinancialYear, YearRulesRow> = rules
            .into_iter()
            .map(|row| (row.financial_year, row))
            .collect();

        // Any year referenced anywhere needs a rules row.
        for year in brackets_by_year
            .keys()
            .chain(repayment_by_year.keys())
            .chain(surcharge_by_year.keys())
        {
            if !rules_by_year.contains_key(year) {
                return Err(RateTableLoaderError::MissingYearRules(*year));
            }
        }

        let mut store = RateTableStore::new();
        for (year, rules) in rules_by_year {
            let mut year_brackets = brackets_by_year
                .remove(&year)
                .ok_or(RateTableLoaderError::NoBrackets(year))?;
            year_brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_ranges(
                "tax brackets",
                year,
                year_brackets.iter().map(|b| (b.min_income, b.max_income)),
            )?;

            let mut year_repayment = repayment_by_year.remove(&year).unwrap_or_default();
            year_repayment.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_ranges(
                "repayment tiers",
                year,
                year_repayment.iter().map(|t| (t.min_income, t.max_income)),
            )?;
            for pair in year_repayment.windows(2) {
                if pair[1].rate < pair[0].rate {
                    return Err(RateTableLoaderError::DecreasingRepaymentRate {
                        financial_year: year,
                        min: pair[1].min_income,
                    });
                }
            }

            let mut year_surcharge = surcharge_by_year.remove(&year).unwrap_or_default();
            year_surcharge.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_ranges(
                "surcharge tiers",
                year,
                year_surcharge.iter().map(|t| (t.min_income, t.max_income)),
            )?;

            if rules.full_exemption_threshold >= rules.shade_in_threshold {
                return Err(RateTableLoaderError::InvalidLevyThresholds {
                    financial_year: year,
                    exemption: rules.full_exemption_threshold,
                    shade_in: rules.shade_in_threshold,
                });
            }

            store.insert(RateTable {
                financial_year: year,
                brackets: year_brackets
                    .into_iter()
                    .map(|b| TaxBracket {
                        min_income: b.min_income,
                        max_income: b.max_income,
                        rate: b.rate,
                        base_tax: b.base_tax,
                    })
                    .collect(),
                levy: LevyRule {
                    full_exemption_threshold: rules.full_exemption_threshold,
                    shade_in_threshold: rules.shade_in_threshold,
                    shade_in_rate: rules.shade_in_rate,
                    full_rate: rules.full_rate,
                },
                surcharge_tiers: year_surcharge
                    .into_iter()
                    .map(|t| SurchargeTier {
                        min_income: t.min_income,
                        max_income: t.max_income,
                        rate: t.rate,
                    })
                    .collect(),
                repayment_tiers: year_repayment
                    .into_iter()
                    .map(|t| RepaymentTier {
                        min_income: t.min_income,
                        max_income: t.max_income,
                        rate: t.rate,
                    })
                    .collect(),
                caps: ContributionCaps {
                    concessional_cap: rules.concessional_cap,
                    non_concessional_cap: rules.non_concessional_cap,
                    carry_forward_balance_threshold: rules.carry_forward_balance_threshold,
                },
                franking: FrankingRule::from_company_rate(rules.company_tax_rate),
            });
        }

        Ok(store)
    }
}

fn parse_rows<R: Read, T: serde::de::DeserializeOwned>(
    reader: R
) -> Result<Vec<T>, RateTableLoaderError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

fn open(
    dir: &Path,
    name: &str,
) -> Result<File, RateTableLoaderError> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| RateTableLoaderError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Checks that sorted ranges start at 0, are contiguous, and that exactly the
/// last range is unbounded. An empty table is allowed; some years may not
/// tabulate every component.
fn validate_ranges(
    table: &'static str,
    financial_year: FinancialYear,
    ranges: impl Iterator<Item = (Decimal, Option<Decimal>)>,
) -> Result<(), RateTableLoaderError> {
    let ranges: Vec<(Decimal, Option<Decimal>)> = ranges.collect();
    let Some((first_min, _)) = ranges.first() else {
        return Ok(());
    };

    if !first_min.is_zero() {
        return Err(RateTableLoaderError::FirstRangeNotZero {
            table,
            financial_year,
            min: *first_min,
        });
    }

    for pair in ranges.windows(2) {
        let (_, prev_max) = pair[0];
        let (min, _) = pair[1];
        let Some(prev_max) = prev_max else {
            return Err(RateTableLoaderError::UnboundedInnerRange {
                table,
                financial_year,
            });
        };
        if prev_max + Decimal::ONE != min {
            return Err(RateTableLoaderError::NonContiguous {
                table,
                financial_year,
                prev_max,
                min,
            });
        }
    }

    if let Some((_, Some(_))) = ranges.last() {
        return Err(RateTableLoaderError::BoundedLastRange {
            table,
            financial_year,
        });
    }

    Ok(())
}
