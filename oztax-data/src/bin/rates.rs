use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use oztax_core::models::FinancialYear;
use oztax_data::RateTableLoader;
use tracing_subscriber::EnvFilter;

/// Load rate table CSV data and print one financial year's tables.
///
/// The data directory must contain `tax_brackets.csv`, `repayment_tiers.csv`,
/// `surcharge_tiers.csv` and `year_rules.csv`.
#[derive(Parser, Debug)]
#[command(name = "oztax-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the rate table CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Financial year to print, e.g. 2024-25. Defaults to the latest loaded.
    #[arg(short, long)]
    year: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let store = RateTableLoader::load_dir(&args.data_dir)
        .with_context(|| format!("failed to load rate tables from {}", args.data_dir.display()))?;

    let table = match &args.year {
        Some(year) => {
            let year: FinancialYear = year
                .parse()
                .with_context(|| format!("invalid financial year '{year}'"))?;
            let lookup = store.rates_for(&year)?;
            if let Some(requested) = lookup.fallback_from {
                println!(
                    "note: no table for {requested}, showing {} instead",
                    lookup.table.financial_year
                );
            }
            lookup.table.clone()
        }
        None => store.latest().context("no rate tables loaded")?.clone(),
    };

    println!("Rate tables for {}", table.financial_year);
    println!();
    println!("Income tax brackets:");
    for bracket in &table.brackets {
        match bracket.max_income {
            Some(max) => println!(
                "  {:>10} - {:>10}  rate {:>6}  base {:>10}",
                bracket.min_income, max, bracket.rate, bracket.base_tax
            ),
            None => println!(
                "  {:>10} +             rate {:>6}  base {:>10}",
                bracket.min_income, bracket.rate, bracket.base_tax
            ),
        }
    }
    println!();
    println!(
        "Medicare levy: {} full rate over {}, shade-in {} from {}",
        table.levy.full_rate,
        table.levy.shade_in_threshold,
        table.levy.shade_in_rate,
        table.levy.full_exemption_threshold
    );
    println!(
        "Surcharge tiers: {}, repayment tiers: {}",
        table.surcharge_tiers.len(),
        table.repayment_tiers.len()
    );
    println!(
        "Contribution caps: concessional {}, non-concessional {}, TSB threshold {}",
        table.caps.concessional_cap,
        table.caps.non_concessional_cap,
        table.caps.carry_forward_balance_threshold
    );
    println!(
        "Franking credit ratio: {}",
        table.franking.credit_ratio.round_dp(6)
    );

    Ok(())
}
