//! Business parameter records fed to the projection engine

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Default resale divisor: one unit in ten changes hands each year
pub const DEFAULT_RESALE_FREQUENCY_YEARS: f64 = 10.0;

/// Default master-franchise override on system sales (percent)
pub const DEFAULT_MASTER_OVERRIDE_PCT: f64 = 0.5;

/// Supply-chain stream inputs (used when `include_supply_chain` is on)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplyChainParams {
    /// Annual goods/services bought through the franchisor, per unit
    pub annual_supply_spend_per_unit: f64,
    /// Franchisor margin on that spend (percent)
    pub supply_margin_pct: f64,
}

/// Management-service-provider stream inputs (used when `include_msp` is on)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MspParams {
    pub monthly_msp_fee: f64,
    pub annual_msp_services_per_unit: f64,
}

/// Master-franchise inputs (used when `include_master_franchise` is on)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterFranchiseParams {
    pub territory_count: u32,
    /// Share of royalty income the franchisor keeps (percent)
    pub franchisor_royalty_share_pct: f64,
    /// Share of initial franchise fees the franchisor keeps (percent)
    pub franchisor_initial_fee_share_pct: f64,
    /// One-off fee per territory, collected in year 1
    pub master_franchise_fee_per_territory: f64,
    /// Ongoing override on system sales (percent)
    pub master_ongoing_override_pct: f64,
}

impl Default for MasterFranchiseParams {
    fn default() -> Self {
        Self {
            territory_count: 0,
            franchisor_royalty_share_pct: 100.0,
            franchisor_initial_fee_share_pct: 100.0,
            master_franchise_fee_per_territory: 0.0,
            master_ongoing_override_pct: DEFAULT_MASTER_OVERRIDE_PCT,
        }
    }
}

/// Basis for the franchisor's technology cost line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", content = "amount", rename_all = "camelCase")]
pub enum TechCost {
    /// Fixed annual spend regardless of network size
    FlatAnnual(f64),
    /// Monthly spend per operating unit
    PerUnitMonthly(f64),
}

impl TechCost {
    /// Annual cost for a network of `units`
    pub fn annual(&self, units: f64) -> f64 {
        match *self {
            TechCost::FlatAnnual(amount) => amount,
            TechCost::PerUnitMonthly(amount) => units * amount * 12.0,
        }
    }

    pub fn amount(&self) -> f64 {
        match *self {
            TechCost::FlatAnnual(amount) | TechCost::PerUnitMonthly(amount) => amount,
        }
    }
}

impl Default for TechCost {
    fn default() -> Self {
        TechCost::FlatAnnual(0.0)
    }
}

/// Franchisor operating cost schedule (used when `include_operating_costs` is on)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostSchedule {
    pub annual_staff_cost: f64,
    pub per_new_unit_recruitment_cost: f64,
    pub per_new_unit_training_cost: f64,
    pub tech_cost: TechCost,
    pub annual_legal_cost: f64,
    pub annual_marketing_admin_cost: f64,
}

/// Complete parameter set for one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessParameters {
    // Network profile
    pub starting_units: u32,
    pub new_units_per_year: u32,
    pub growth_rate_pct: f64,
    pub churn_rate_pct: f64,
    pub franchise_term_years: f64,
    pub projection_years: u32,

    // Per-unit economics
    pub avg_annual_sales_per_unit: f64,
    pub royalty_rate_pct: f64,
    pub marketing_levy_pct: f64,

    // Fee schedule
    pub initial_franchise_fee: f64,
    pub renewal_fee: f64,
    pub transfer_fee: f64,
    /// Average years between resales of a unit (transfer-fee divisor)
    #[serde(default = "default_resale_frequency")]
    pub resale_frequency_years: f64,
    pub initial_training_fee: f64,
    #[serde(default)]
    pub recurring_training_fee: f64,
    pub monthly_tech_fee: f64,
    pub monthly_support_fee: f64,

    // Optional streams
    #[serde(default)]
    pub supply_chain: SupplyChainParams,
    #[serde(default)]
    pub msp: MspParams,
    #[serde(default)]
    pub master_franchise: MasterFranchiseParams,

    #[serde(default)]
    pub costs: CostSchedule,
}

fn default_resale_frequency() -> f64 {
    DEFAULT_RESALE_FREQUENCY_YEARS
}

impl Default for BusinessParameters {
    /// The calculator's stock inputs for a mid-sized system
    fn default() -> Self {
        Self {
            starting_units: 25,
            new_units_per_year: 10,
            growth_rate_pct: 15.0,
            churn_rate_pct: 8.0,
            franchise_term_years: 10.0,
            projection_years: 5,
            avg_annual_sales_per_unit: 500_000.0,
            royalty_rate_pct: 6.5,
            marketing_levy_pct: 2.0,
            initial_franchise_fee: 45_000.0,
            renewal_fee: 15_000.0,
            transfer_fee: 25_000.0,
            resale_frequency_years: DEFAULT_RESALE_FREQUENCY_YEARS,
            initial_training_fee: 8_000.0,
            recurring_training_fee: 0.0,
            monthly_tech_fee: 299.0,
            monthly_support_fee: 199.0,
            supply_chain: SupplyChainParams {
                annual_supply_spend_per_unit: 50_000.0,
                supply_margin_pct: 12.0,
            },
            msp: MspParams {
                monthly_msp_fee: 150.0,
                annual_msp_services_per_unit: 3_000.0,
            },
            master_franchise: MasterFranchiseParams {
                territory_count: 3,
                franchisor_royalty_share_pct: 40.0,
                franchisor_initial_fee_share_pct: 40.0,
                master_franchise_fee_per_territory: 150_000.0,
                master_ongoing_override_pct: DEFAULT_MASTER_OVERRIDE_PCT,
            },
            costs: CostSchedule {
                annual_staff_cost: 250_000.0,
                per_new_unit_recruitment_cost: 5_000.0,
                per_new_unit_training_cost: 2_000.0,
                tech_cost: TechCost::FlatAnnual(50_000.0),
                annual_legal_cost: 75_000.0,
                annual_marketing_admin_cost: 25_000.0,
            },
        }
    }
}

impl BusinessParameters {
    /// Every real-valued input, by field name
    fn real_fields(&self) -> [(&'static str, f64); 25] {
        let supply = &self.supply_chain;
        let msp = &self.msp;
        let master = &self.master_franchise;
        let costs = &self.costs;
        [
            ("growthRatePct", self.growth_rate_pct),
            ("churnRatePct", self.churn_rate_pct),
            ("franchiseTermYears", self.franchise_term_years),
            ("avgAnnualSalesPerUnit", self.avg_annual_sales_per_unit),
            ("royaltyRatePct", self.royalty_rate_pct),
            ("marketingLevyPct", self.marketing_levy_pct),
            ("initialFranchiseFee", self.initial_franchise_fee),
            ("renewalFee", self.renewal_fee),
            ("transferFee", self.transfer_fee),
            ("resaleFrequencyYears", self.resale_frequency_years),
            ("initialTrainingFee", self.initial_training_fee),
            ("recurringTrainingFee", self.recurring_training_fee),
            ("monthlyTechFee", self.monthly_tech_fee),
            ("monthlySupportFee", self.monthly_support_fee),
            ("annualSupplySpendPerUnit", supply.annual_supply_spend_per_unit),
            ("supplyMarginPct", supply.supply_margin_pct),
            ("monthlyMspFee", msp.monthly_msp_fee),
            ("annualMspServicesPerUnit", msp.annual_msp_services_per_unit),
            ("franchisorRoyaltySharePct", master.franchisor_royalty_share_pct),
            ("franchisorInitialFeeSharePct", master.franchisor_initial_fee_share_pct),
            ("masterFranchiseFeePerTerritory", master.master_franchise_fee_per_territory),
            ("masterOngoingOverridePct", master.master_ongoing_override_pct),
            ("annualStaffCost", costs.annual_staff_cost),
            ("perNewUnitRecruitmentCost", costs.per_new_unit_recruitment_cost),
            ("perNewUnitTrainingCost", costs.per_new_unit_training_cost),
        ]
    }

    /// Check the structural validity of the parameter set.
    ///
    /// Rates are not range-checked: negative growth or fees propagate
    /// arithmetically. Only inputs that would make the output malformed are
    /// rejected.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.projection_years == 0 {
            return Err(ProjectionError::invalid(
                "projectionYears",
                "projection horizon must be at least one year",
            ));
        }

        let cost_tail = [
            ("techCost", self.costs.tech_cost.amount()),
            ("annualLegalCost", self.costs.annual_legal_cost),
            ("annualMarketingAdminCost", self.costs.annual_marketing_admin_cost),
        ];
        for (field, value) in self.real_fields().into_iter().chain(cost_tail) {
            if !value.is_finite() {
                return Err(ProjectionError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        for (field, value) in [
            ("franchiseTermYears", self.franchise_term_years),
            ("resaleFrequencyYears", self.resale_frequency_years),
        ] {
            if value <= 0.0 {
                return Err(ProjectionError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        Ok(())
    }
}
