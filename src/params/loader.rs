//! Load scenarios from CSV (one scenario per row) or JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use thiserror::Error;

use super::{
    BusinessParameters, CostSchedule, FeatureToggles, MasterFranchiseParams, MspParams,
    SupplyChainParams, TechCost, DEFAULT_MASTER_OVERRIDE_PCT, DEFAULT_RESALE_FREQUENCY_YEARS,
};
use crate::scenario::Scenario;

/// Default location of the sample scenario sheet
pub const DEFAULT_SCENARIOS_PATH: &str = "data/sample_scenarios.csv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row}: unknown {column} value `{value}`")]
    UnknownValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Raw CSV row, one column per input
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    starting_units: u32,
    new_units_per_year: u32,
    growth_rate_pct: f64,
    churn_rate_pct: f64,
    franchise_term_years: f64,
    projection_years: u32,
    avg_annual_sales_per_unit: f64,
    royalty_rate_pct: f64,
    marketing_levy_pct: f64,
    initial_franchise_fee: f64,
    renewal_fee: f64,
    transfer_fee: f64,
    #[serde(default)]
    resale_frequency_years: Option<f64>,
    initial_training_fee: f64,
    #[serde(default)]
    recurring_training_fee: Option<f64>,
    monthly_tech_fee: f64,
    monthly_support_fee: f64,
    #[serde(default)]
    annual_supply_spend_per_unit: Option<f64>,
    #[serde(default)]
    supply_margin_pct: Option<f64>,
    #[serde(default)]
    monthly_msp_fee: Option<f64>,
    #[serde(default)]
    annual_msp_services_per_unit: Option<f64>,
    #[serde(default)]
    territory_count: Option<u32>,
    #[serde(default)]
    franchisor_royalty_share_pct: Option<f64>,
    #[serde(default)]
    franchisor_initial_fee_share_pct: Option<f64>,
    #[serde(default)]
    master_franchise_fee_per_territory: Option<f64>,
    #[serde(default)]
    master_ongoing_override_pct: Option<f64>,
    #[serde(default)]
    annual_staff_cost: Option<f64>,
    #[serde(default)]
    per_new_unit_recruitment_cost: Option<f64>,
    #[serde(default)]
    per_new_unit_training_cost: Option<f64>,
    #[serde(default)]
    tech_cost_basis: String,
    #[serde(default)]
    tech_cost: Option<f64>,
    #[serde(default)]
    annual_legal_cost: Option<f64>,
    #[serde(default)]
    annual_marketing_admin_cost: Option<f64>,
    #[serde(default)]
    include_supply_chain: String,
    #[serde(default)]
    include_msp: String,
    #[serde(default)]
    include_master_franchise: String,
    #[serde(default)]
    include_marketing_levy_as_income: String,
    #[serde(default)]
    include_operating_costs: String,
}

fn parse_flag(row: usize, column: &'static str, value: &str) -> Result<bool, LoadError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Ok(false),
        "1" | "true" | "yes" | "y" => Ok(true),
        _ => Err(LoadError::UnknownValue {
            row,
            column,
            value: value.to_string(),
        }),
    }
}

impl CsvRow {
    fn into_scenario(self, row: usize) -> Result<Scenario, LoadError> {
        let tech_cost = match self.tech_cost_basis.trim() {
            "" | "flat_annual" => TechCost::FlatAnnual(self.tech_cost.unwrap_or(0.0)),
            "per_unit_monthly" => TechCost::PerUnitMonthly(self.tech_cost.unwrap_or(0.0)),
            other => {
                return Err(LoadError::UnknownValue {
                    row,
                    column: "tech_cost_basis",
                    value: other.to_string(),
                })
            }
        };

        let toggles = FeatureToggles {
            include_supply_chain: parse_flag(row, "include_supply_chain", &self.include_supply_chain)?,
            include_msp: parse_flag(row, "include_msp", &self.include_msp)?,
            include_master_franchise: parse_flag(
                row,
                "include_master_franchise",
                &self.include_master_franchise,
            )?,
            include_marketing_levy_as_income: parse_flag(
                row,
                "include_marketing_levy_as_income",
                &self.include_marketing_levy_as_income,
            )?,
            include_operating_costs: parse_flag(
                row,
                "include_operating_costs",
                &self.include_operating_costs,
            )?,
        };

        let params = BusinessParameters {
            starting_units: self.starting_units,
            new_units_per_year: self.new_units_per_year,
            growth_rate_pct: self.growth_rate_pct,
            churn_rate_pct: self.churn_rate_pct,
            franchise_term_years: self.franchise_term_years,
            projection_years: self.projection_years,
            avg_annual_sales_per_unit: self.avg_annual_sales_per_unit,
            royalty_rate_pct: self.royalty_rate_pct,
            marketing_levy_pct: self.marketing_levy_pct,
            initial_franchise_fee: self.initial_franchise_fee,
            renewal_fee: self.renewal_fee,
            transfer_fee: self.transfer_fee,
            resale_frequency_years: self
                .resale_frequency_years
                .unwrap_or(DEFAULT_RESALE_FREQUENCY_YEARS),
            initial_training_fee: self.initial_training_fee,
            recurring_training_fee: self.recurring_training_fee.unwrap_or(0.0),
            monthly_tech_fee: self.monthly_tech_fee,
            monthly_support_fee: self.monthly_support_fee,
            supply_chain: SupplyChainParams {
                annual_supply_spend_per_unit: self.annual_supply_spend_per_unit.unwrap_or(0.0),
                supply_margin_pct: self.supply_margin_pct.unwrap_or(0.0),
            },
            msp: MspParams {
                monthly_msp_fee: self.monthly_msp_fee.unwrap_or(0.0),
                annual_msp_services_per_unit: self.annual_msp_services_per_unit.unwrap_or(0.0),
            },
            master_franchise: MasterFranchiseParams {
                territory_count: self.territory_count.unwrap_or(0),
                franchisor_royalty_share_pct: self.franchisor_royalty_share_pct.unwrap_or(100.0),
                franchisor_initial_fee_share_pct: self
                    .franchisor_initial_fee_share_pct
                    .unwrap_or(100.0),
                master_franchise_fee_per_territory: self.master_franchise_fee_per_territory.unwrap_or(0.0),
                master_ongoing_override_pct: self
                    .master_ongoing_override_pct
                    .unwrap_or(DEFAULT_MASTER_OVERRIDE_PCT),
            },
            costs: CostSchedule {
                annual_staff_cost: self.annual_staff_cost.unwrap_or(0.0),
                per_new_unit_recruitment_cost: self.per_new_unit_recruitment_cost.unwrap_or(0.0),
                per_new_unit_training_cost: self.per_new_unit_training_cost.unwrap_or(0.0),
                tech_cost,
                annual_legal_cost: self.annual_legal_cost.unwrap_or(0.0),
                annual_marketing_admin_cost: self.annual_marketing_admin_cost.unwrap_or(0.0),
            },
        };

        Ok(Scenario::new(self.name, params, toggles))
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, LoadError> {
    load_scenarios_from_reader(File::open(path)?)
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario(index + 1)?);
    }

    Ok(scenarios)
}

/// Load a single `{ name, params, toggles }` scenario from a JSON file
pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> Result<Scenario, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
name,starting_units,new_units_per_year,growth_rate_pct,churn_rate_pct,franchise_term_years,projection_years,avg_annual_sales_per_unit,royalty_rate_pct,marketing_levy_pct,initial_franchise_fee,renewal_fee,transfer_fee,resale_frequency_years,initial_training_fee,recurring_training_fee,monthly_tech_fee,monthly_support_fee,annual_supply_spend_per_unit,supply_margin_pct,territory_count,franchisor_royalty_share_pct,master_franchise_fee_per_territory,tech_cost_basis,tech_cost,annual_staff_cost,include_supply_chain,include_master_franchise,include_operating_costs
base,25,10,15,8,10,5,500000,6,2,45000,15000,25000,,8000,,299,199,50000,12,,,,,50000,250000,yes,no,yes
master,40,5,10,5,10,3,400000,5,2,40000,10000,20000,8,5000,500,250,150,,,3,40,150000,per_unit_monthly,20,0,,true,false
";

    #[test]
    fn test_load_scenarios_from_reader() {
        let scenarios = load_scenarios_from_reader(SHEET.as_bytes()).expect("sheet should parse");
        assert_eq!(scenarios.len(), 2);

        let base = &scenarios[0];
        assert_eq!(base.name, "base");
        assert_eq!(base.params.starting_units, 25);
        assert_eq!(base.params.resale_frequency_years, DEFAULT_RESALE_FREQUENCY_YEARS);
        assert_eq!(base.params.costs.tech_cost, TechCost::FlatAnnual(50_000.0));
        assert!(base.toggles.include_supply_chain);
        assert!(!base.toggles.include_master_franchise);
        assert!(base.toggles.include_operating_costs);
        assert!(!base.toggles.include_msp);

        let master = &scenarios[1];
        assert_eq!(master.params.resale_frequency_years, 8.0);
        assert_eq!(master.params.recurring_training_fee, 500.0);
        assert_eq!(master.params.master_franchise.territory_count, 3);
        assert_eq!(master.params.master_franchise.franchisor_initial_fee_share_pct, 100.0);
        assert_eq!(master.params.costs.tech_cost, TechCost::PerUnitMonthly(20.0));
        assert!(master.toggles.include_master_franchise);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let sheet = SHEET.replace("yes,no,yes", "yes,maybe,yes");
        match load_scenarios_from_reader(sheet.as_bytes()) {
            Err(LoadError::UnknownValue { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "include_master_franchise");
            }
            other => panic!("expected UnknownValue, got {:?}", other),
        }
    }

    #[test]
    fn test_bundled_samples_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));

        let scenarios = load_scenarios(root.join(DEFAULT_SCENARIOS_PATH)).unwrap();
        assert_eq!(scenarios.len(), 4);
        assert!(scenarios.iter().all(|s| s.project().is_ok()));
        assert!(scenarios[2].toggles.include_master_franchise);
        assert_eq!(scenarios[3].params.starting_units, 0);

        let demo = load_scenario_json(root.join("demos/base_case.json")).unwrap();
        assert_eq!(demo.params.projection_years, 5);
        assert_eq!(demo.params.costs.tech_cost, TechCost::FlatAnnual(50_000.0));
        assert!(demo.toggles.include_operating_costs);
        assert!(!demo.toggles.include_msp);
    }

    #[test]
    fn test_unknown_tech_basis_rejected() {
        let sheet = SHEET.replace("per_unit_monthly", "per_seat");
        assert!(matches!(
            load_scenarios_from_reader(sheet.as_bytes()),
            Err(LoadError::UnknownValue { column: "tech_cost_basis", .. })
        ));
    }
}
