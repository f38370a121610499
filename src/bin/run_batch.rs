//! Run estimates for a whole CSV of individuals
//!
//! Outputs one row per person for downstream comparison

use anyhow::{Context, Result};
use clap::Parser;
use pension_estimator::individual::{load_individuals, DEFAULT_INDIVIDUALS_PATH};
use pension_estimator::rules::load_rules;
use pension_estimator::{IndividualInput, PensionCalculator, RuleParameters};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Pension estimates for a CSV of individuals")]
struct Cli {
    /// Individuals CSV
    #[arg(long, default_value = DEFAULT_INDIVIDUALS_PATH)]
    input: PathBuf,

    /// Output CSV
    #[arg(long, default_value = "batch_estimates.csv")]
    output: PathBuf,

    /// Rule parameters JSON file (defaults to the built-in 2025 regulation)
    #[arg(long)]
    rules: Option<PathBuf>,
}

/// One output row
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "PersonID")]
    person_id: &'a str,
    #[serde(rename = "EffectiveLegalAge")]
    effective_legal_age: f64,
    #[serde(rename = "ReferenceQuarters")]
    reference_quarters: u32,
    #[serde(rename = "EffectiveQuarters")]
    effective_quarters: u32,
    #[serde(rename = "Rate")]
    rate: f64,
    #[serde(rename = "RateBasis")]
    rate_basis: String,
    #[serde(rename = "Prorata")]
    prorata: f64,
    #[serde(rename = "BaseAnnual")]
    base_annual: f64,
    #[serde(rename = "ComplementaryAnnual")]
    complementary_annual: f64,
    #[serde(rename = "GrossAnnual")]
    gross_annual: f64,
    #[serde(rename = "NetAnnual")]
    net_annual: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let records = load_individuals(&cli.input)
        .with_context(|| format!("loading individuals from {}", cli.input.display()))?;
    log::info!("Loaded {} individuals in {:?}", records.len(), start.elapsed());

    let rules = match &cli.rules {
        Some(path) => load_rules(path).with_context(|| format!("loading rules {}", path.display()))?,
        None => RuleParameters::regulation_2025(),
    };
    let calculator = PensionCalculator::new(rules);

    // Run estimates in parallel
    let inputs: Vec<IndividualInput> = records.iter().map(|r| r.input.clone()).collect();
    let results = calculator.calculate_batch(&inputs);
    log::info!("Estimates complete in {:?}", start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    for (record, result) in records.iter().zip(&results) {
        writer.serialize(OutputRow {
            person_id: &record.person_id,
            effective_legal_age: result.effective_legal_age,
            reference_quarters: result.reference_quarters,
            effective_quarters: result.effective_quarters,
            rate: result.rate,
            rate_basis: format!("{:?}", result.rate_basis),
            prorata: result.prorata,
            base_annual: result.base_annual,
            complementary_annual: result.complementary_annual,
            gross_annual: result.gross_annual,
            net_annual: result.net_annual,
        })?;
    }
    writer.flush()?;

    let total_net: f64 = results.iter().map(|r| r.net_annual).sum();
    println!("Output written to {}", cli.output.display());
    println!("\nBatch Summary:");
    println!("  Individuals:     {}", results.len());
    if !results.is_empty() {
        println!("  Mean net annual: {:.2}", total_net / results.len() as f64);
    }
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
