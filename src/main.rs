//! Franchise Projection CLI
//!
//! Runs projections from a scenario file and manages saved scenarios.
//! The store directory defaults to $FRANCHISE_STORE_DIR, then data/scenarios.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use franchise_projection::{
    export::write_csv,
    params::load_scenario_json,
    projection::ProjectionResult,
    store::{JsonFileStore, NewScenario, ScenarioStore, DEFAULT_STORE_DIR},
    BusinessParameters, CalculatorSession, FeatureToggles, Scenario,
};

#[derive(Parser)]
#[command(name = "franchise_projection", version, about = "Franchise revenue and profit projections")]
struct Cli {
    /// Directory holding saved scenarios
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project a scenario file (or the default inputs) and print the results
    Project {
        /// JSON scenario file: { "name", "params", "toggles" }
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the projection horizon
        #[arg(long)]
        years: Option<u32>,
        /// Write the export table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the full projection as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Save a scenario file to the store
    Save {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List saved scenarios, newest first
    List,
    /// Load a saved scenario, recompute it and print the results
    Show {
        id: u64,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Delete a saved scenario
    Delete { id: u64 },
}

fn store_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir
        .or_else(|| env::var_os("FRANCHISE_STORE_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
}

fn read_scenario(input: Option<&Path>) -> Result<Scenario> {
    match input {
        Some(path) => load_scenario_json(path)
            .with_context(|| format!("failed to load scenario from {}", path.display())),
        None => Ok(Scenario::new(
            "Default inputs",
            BusinessParameters::default(),
            FeatureToggles::default(),
        )),
    }
}

fn print_table(title: &str, result: &ProjectionResult, toggles: &FeatureToggles) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len().max(20)));

    print!("{:>4} {:>7} {:>16}", "Year", "Units", "Gross Revenue");
    if toggles.include_operating_costs {
        print!(" {:>14} {:>16} {:>8}", "Costs", "Net Profit", "Margin");
    }
    println!(" {:>14}", "Rev/Unit");
    println!("{}", "-".repeat(if toggles.include_operating_costs { 106 } else { 64 }));

    for y in &result.years {
        print!("{:>4} {:>7} {:>16.2}", y.year_index, y.units, y.gross_revenue);
        if toggles.include_operating_costs {
            print!(" {:>14.2} {:>16.2} {:>7.1}%", y.total_costs, y.net_profit, y.profit_margin_pct());
        }
        println!(" {:>14.2}", y.revenue_per_unit);
    }

    if let Some(first) = result.years.first() {
        println!("\nYear 1 revenue mix:");
        for (label, amount) in first.revenue_breakdown() {
            println!("  {:<24} ${:>14.2}", label, amount);
        }
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Years: {}", summary.total_years);
    println!("  Total Gross Revenue: ${:.2}", summary.total_gross_revenue);
    if toggles.include_operating_costs {
        println!("  Total Costs: ${:.2}", summary.total_costs);
        println!("  Total Net Profit: ${:.2}", summary.total_net_profit);
    }
    println!("  Avg Annual Growth: {:.1}%", summary.avg_annual_growth_pct);
    println!("  Final Year Units: {}", summary.final_year_units);
    println!("  Avg Revenue per Unit: ${:.2}", summary.avg_revenue_per_unit);
}

fn export_csv(
    path: &Path,
    params: &BusinessParameters,
    toggles: &FeatureToggles,
    result: &ProjectionResult,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
    write_csv(BufWriter::new(file), params, toggles, &result.years)
        .with_context(|| format!("unable to write {}", path.display()))?;
    println!("\nExport written to: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let dir = store_dir(cli.store_dir);

    match cli.command {
        Command::Project { input, years, csv, json } => {
            let mut scenario = read_scenario(input.as_deref())?;
            if let Some(years) = years {
                scenario.params.projection_years = years;
            }
            info!("projecting scenario `{}`", scenario.name);

            let result = scenario
                .project()
                .with_context(|| format!("scenario `{}` has invalid inputs", scenario.name))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.years)?);
            } else {
                print_table(&scenario.name, &result, &scenario.toggles);
            }
            if let Some(path) = csv {
                export_csv(&path, &scenario.params, &scenario.toggles, &result)?;
            }
        }
        Command::Save { input, title, description } => {
            let scenario = read_scenario(Some(input.as_path()))?;
            let projections = scenario.project()?.into_years();
            let mut store = JsonFileStore::open(&dir)
                .with_context(|| format!("unable to open store at {}", dir.display()))?;
            let saved = store.save(
                NewScenario::new(scenario.params, scenario.toggles)
                    .with_title(title.unwrap_or(scenario.name))
                    .with_description(description)
                    .with_projections(projections),
            )?;
            println!("Saved scenario {} ({})", saved.id, saved.title);
        }
        Command::List => {
            let store = JsonFileStore::open(&dir)?;
            let records = store.list()?;
            if records.is_empty() {
                println!("No saved scenarios in {}", dir.display());
            }
            for r in records {
                println!(
                    "{:>5}  {}  {:<32} {}",
                    r.id,
                    r.created_at.format("%Y-%m-%d %H:%M"),
                    r.title,
                    r.description
                );
            }
        }
        Command::Show { id, csv } => {
            let store = JsonFileStore::open(&dir)?;
            let saved = store.load(id)?;
            let mut session = CalculatorSession::default();
            let result = session.load_saved(&saved)?.clone();
            print_table(&saved.title, &result, &saved.toggles);
            if let Some(path) = csv {
                export_csv(&path, &saved.params, &saved.toggles, &result)?;
            }
        }
        Command::Delete { id } => {
            let mut store = JsonFileStore::open(&dir)?;
            store.delete(id)?;
            println!("Deleted scenario {}", id);
        }
    }

    Ok(())
}
