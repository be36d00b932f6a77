//! Feature flags gating the optional revenue streams and cost modeling

use serde::{Deserialize, Serialize};

/// Independent switches for the optional parts of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureToggles {
    pub include_supply_chain: bool,
    pub include_msp: bool,
    pub include_master_franchise: bool,
    /// Count the marketing levy as franchisor income instead of a pass-through
    pub include_marketing_levy_as_income: bool,
    pub include_operating_costs: bool,
}

impl FeatureToggles {
    /// Every optional stream and cost modeling switched on
    pub fn all() -> Self {
        Self {
            include_supply_chain: true,
            include_msp: true,
            include_master_franchise: true,
            include_marketing_levy_as_income: true,
            include_operating_costs: true,
        }
    }
}
