//! Projection inputs: business parameters, feature toggles, and scenario loading

mod business;
mod toggles;
pub mod loader;

pub use business::{
    BusinessParameters, CostSchedule, MasterFranchiseParams, MspParams, SupplyChainParams,
    TechCost, DEFAULT_MASTER_OVERRIDE_PCT, DEFAULT_RESALE_FREQUENCY_YEARS,
};
pub use toggles::FeatureToggles;
pub use loader::{load_scenario_json, load_scenarios, load_scenarios_from_reader, LoadError};
