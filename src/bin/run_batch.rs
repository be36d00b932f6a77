//! Run projections for every scenario in a CSV sheet
//!
//! Usage: run_batch [SCENARIOS_CSV] [OUTPUT_CSV]
//! Defaults to data/sample_scenarios.csv and batch_projection_output.csv.
//! Outputs one summary row per scenario; invalid scenarios are reported and skipped.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use franchise_projection::{
    params::{load_scenarios, loader::DEFAULT_SCENARIOS_PATH},
    ScenarioRunner,
};
use log::warn;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "run_batch", version, about = "Project every scenario in a CSV sheet")]
struct Args {
    /// Scenario sheet, one scenario per row
    #[arg(default_value = DEFAULT_SCENARIOS_PATH)]
    input: PathBuf,
    /// Summary CSV to write
    #[arg(default_value = "batch_projection_output.csv")]
    output: PathBuf,
}

/// Summary row written per scenario
#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    scenario: &'a str,
    years: u32,
    final_year_units: u64,
    total_gross_revenue: f64,
    total_costs: f64,
    total_net_profit: f64,
    avg_annual_growth_pct: f64,
    avg_revenue_per_unit: f64,
    year1_gross_revenue: f64,
    final_year_gross_revenue: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { input, output } = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", input.display());
    let scenarios = load_scenarios(&input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    println!("Running projections...");
    let proj_start = Instant::now();
    let outcomes = ScenarioRunner::default().run_batch(&scenarios);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut failed = 0usize;

    for outcome in &outcomes {
        let result = match &outcome.result {
            Ok(result) => result,
            Err(err) => {
                warn!("scenario `{}` skipped: {}", outcome.name, err);
                failed += 1;
                continue;
            }
        };
        let summary = result.summary();
        writer.serialize(BatchRow {
            scenario: &outcome.name,
            years: summary.total_years,
            final_year_units: summary.final_year_units,
            total_gross_revenue: summary.total_gross_revenue,
            total_costs: summary.total_costs,
            total_net_profit: summary.total_net_profit,
            avg_annual_growth_pct: summary.avg_annual_growth_pct,
            avg_revenue_per_unit: summary.avg_revenue_per_unit,
            year1_gross_revenue: result.years.first().map(|y| y.gross_revenue).unwrap_or(0.0),
            final_year_gross_revenue: result.years.last().map(|y| y.gross_revenue).unwrap_or(0.0),
        })?;
    }
    writer.flush()?;

    println!("Output written to {}", output.display());
    println!("\nBatch Summary:");
    println!("  Scenarios: {}", outcomes.len());
    println!("  Projected: {}", outcomes.len() - failed);
    println!("  Skipped (invalid inputs): {}", failed);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_paths() {
        let args = Args::try_parse_from(["run_batch"]).unwrap();
        assert_eq!(args.input, PathBuf::from(DEFAULT_SCENARIOS_PATH));
        assert_eq!(args.output, PathBuf::from("batch_projection_output.csv"));
    }

    #[test]
    fn test_args_positional_paths() {
        let args = Args::try_parse_from(["run_batch", "sheet.csv", "out.csv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("sheet.csv"));
        assert_eq!(args.output, PathBuf::from("out.csv"));

        assert!(Args::try_parse_from(["run_batch", "a.csv", "b.csv", "c.csv"]).is_err());
    }
}
