//! Franchisor revenue streams for a single projection year

use serde::{Deserialize, Serialize};

use crate::params::{BusinessParameters, FeatureToggles};

/// Itemized franchisor income for one year.
///
/// Optional streams are always present and hold `0.0` when their toggle is off.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStreams {
    /// Royalty income after the master-franchise split
    pub royalty_income: f64,
    /// Initial franchise fees after the master-franchise split
    pub initial_fees: f64,
    pub renewal_fees: f64,
    pub transfer_fees: f64,
    /// Initial plus recurring training income
    pub training_income: f64,
    pub tech_income: f64,
    pub support_income: f64,
    pub supply_chain_income: f64,
    pub msp_income: f64,
    pub marketing_income: f64,
    pub master_franchise_fees: f64,
    pub master_override_income: f64,
}

impl RevenueStreams {
    /// Compute every stream for `year` given that year's unit count
    pub fn compute(
        params: &BusinessParameters,
        toggles: &FeatureToggles,
        year: u32,
        units: f64,
    ) -> Self {
        let new_units = params.new_units_per_year as f64;
        let system_sales = units * params.avg_annual_sales_per_unit;

        // Core per-unit streams
        let royalty_income = system_sales * (params.royalty_rate_pct / 100.0);
        let initial_fees = new_units * params.initial_franchise_fee;
        let renewal_fees = (units / params.franchise_term_years) * params.renewal_fee;
        let transfer_fees = (units / params.resale_frequency_years) * params.transfer_fee;
        let training_income =
            new_units * params.initial_training_fee + units * params.recurring_training_fee;
        let tech_income = units * params.monthly_tech_fee * 12.0;
        let support_income = units * params.monthly_support_fee * 12.0;

        // Optional streams
        let supply_chain_income = if toggles.include_supply_chain {
            let supply = &params.supply_chain;
            units * supply.annual_supply_spend_per_unit * (supply.supply_margin_pct / 100.0)
        } else {
            0.0
        };

        let msp_income = if toggles.include_msp {
            units * params.msp.monthly_msp_fee * 12.0 + units * params.msp.annual_msp_services_per_unit
        } else {
            0.0
        };

        let marketing_income = if toggles.include_marketing_levy_as_income {
            marketing_levy(params, units)
        } else {
            0.0
        };

        let mut streams = Self {
            royalty_income,
            initial_fees,
            renewal_fees,
            transfer_fees,
            training_income,
            tech_income,
            support_income,
            supply_chain_income,
            msp_income,
            marketing_income,
            master_franchise_fees: 0.0,
            master_override_income: 0.0,
        };

        if toggles.include_master_franchise {
            streams.apply_master_franchise(params, year, system_sales);
        }

        streams
    }

    /// Split royalty and initial fees with the master territories and add the
    /// master fees. The split replaces the unscaled figures.
    fn apply_master_franchise(&mut self, params: &BusinessParameters, year: u32, system_sales: f64) {
        let master = &params.master_franchise;

        if year == 1 {
            self.master_franchise_fees =
                master.territory_count as f64 * master.master_franchise_fee_per_territory;
        }
        self.master_override_income = system_sales * (master.master_ongoing_override_pct / 100.0);

        self.royalty_income *= master.franchisor_royalty_share_pct / 100.0;
        self.initial_fees *= master.franchisor_initial_fee_share_pct / 100.0;
    }

    /// Sum of all streams. Disabled streams are zero so they contribute nothing.
    pub fn total(&self) -> f64 {
        self.labelled().iter().map(|(_, amount)| amount).sum()
    }

    /// Streams with display labels, in a fixed order
    pub fn labelled(&self) -> [(&'static str, f64); 12] {
        [
            ("Royalty Income", self.royalty_income),
            ("Initial Franchise Fees", self.initial_fees),
            ("Renewal Fees", self.renewal_fees),
            ("Transfer Fees", self.transfer_fees),
            ("Training Fees", self.training_income),
            ("Technology Fees", self.tech_income),
            ("Admin/Support Fees", self.support_income),
            ("Supply Chain Income", self.supply_chain_income),
            ("MSP Income", self.msp_income),
            ("Marketing Levy Income", self.marketing_income),
            ("Master Franchise Fees", self.master_franchise_fees),
            ("Master Override Income", self.master_override_income),
        ]
    }
}

/// Marketing levy collected from the network, whether or not it is counted as income
pub fn marketing_levy(params: &BusinessParameters, units: f64) -> f64 {
    units * params.avg_annual_sales_per_unit * (params.marketing_levy_pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_params() -> BusinessParameters {
        BusinessParameters {
            starting_units: 25,
            new_units_per_year: 10,
            avg_annual_sales_per_unit: 500_000.0,
            royalty_rate_pct: 6.0,
            marketing_levy_pct: 2.0,
            initial_franchise_fee: 45_000.0,
            renewal_fee: 15_000.0,
            transfer_fee: 25_000.0,
            franchise_term_years: 10.0,
            resale_frequency_years: 10.0,
            initial_training_fee: 8_000.0,
            recurring_training_fee: 1_000.0,
            monthly_tech_fee: 300.0,
            monthly_support_fee: 200.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_core_streams() {
        let params = flat_params();
        let streams = RevenueStreams::compute(&params, &FeatureToggles::default(), 1, 35.0);

        assert_relative_eq!(streams.royalty_income, 1_050_000.0);
        assert_relative_eq!(streams.initial_fees, 450_000.0);
        assert_relative_eq!(streams.renewal_fees, 3.5 * 15_000.0);
        assert_relative_eq!(streams.transfer_fees, 3.5 * 25_000.0);
        assert_relative_eq!(streams.training_income, 80_000.0 + 35_000.0);
        assert_relative_eq!(streams.tech_income, 35.0 * 300.0 * 12.0);
        assert_relative_eq!(streams.support_income, 35.0 * 200.0 * 12.0);
        assert_eq!(streams.supply_chain_income, 0.0);
        assert_eq!(streams.msp_income, 0.0);
        assert_eq!(streams.marketing_income, 0.0);
        assert_eq!(streams.master_franchise_fees, 0.0);
        assert_eq!(streams.master_override_income, 0.0);
    }

    #[test]
    fn test_optional_streams_gated() {
        let params = BusinessParameters::default();
        let toggles = FeatureToggles {
            include_supply_chain: true,
            include_msp: true,
            include_marketing_levy_as_income: true,
            ..Default::default()
        };
        let streams = RevenueStreams::compute(&params, &toggles, 2, 40.0);

        assert_relative_eq!(streams.supply_chain_income, 40.0 * 50_000.0 * 0.12);
        assert_relative_eq!(streams.msp_income, 40.0 * 150.0 * 12.0 + 40.0 * 3_000.0);
        assert_relative_eq!(streams.marketing_income, 40.0 * 500_000.0 * 0.02);
        assert_relative_eq!(streams.marketing_income, marketing_levy(&params, 40.0));
    }

    #[test]
    fn test_master_split_replaces_unscaled() {
        let params = BusinessParameters::default();
        let plain = RevenueStreams::compute(&params, &FeatureToggles::default(), 1, 35.0);
        let toggles = FeatureToggles {
            include_master_franchise: true,
            ..Default::default()
        };
        let split = RevenueStreams::compute(&params, &toggles, 1, 35.0);

        assert_relative_eq!(split.royalty_income, plain.royalty_income * 0.4);
        assert_relative_eq!(split.initial_fees, plain.initial_fees * 0.4);
        assert_relative_eq!(split.master_franchise_fees, 3.0 * 150_000.0);
        assert_relative_eq!(split.master_override_income, 35.0 * 500_000.0 * 0.005);
    }

    #[test]
    fn test_master_fee_only_in_year_one() {
        let params = BusinessParameters::default();
        let toggles = FeatureToggles {
            include_master_franchise: true,
            ..Default::default()
        };
        let year_two = RevenueStreams::compute(&params, &toggles, 2, 47.0);
        assert_eq!(year_two.master_franchise_fees, 0.0);
        assert!(year_two.master_override_income > 0.0);
    }

    #[test]
    fn test_total_matches_labelled_sum() {
        let params = BusinessParameters::default();
        let streams = RevenueStreams::compute(&params, &FeatureToggles::all(), 1, 35.0);
        let manual = streams.royalty_income
            + streams.initial_fees
            + streams.renewal_fees
            + streams.transfer_fees
            + streams.training_income
            + streams.tech_income
            + streams.support_income
            + streams.supply_chain_income
            + streams.msp_income
            + streams.marketing_income
            + streams.master_franchise_fees
            + streams.master_override_income;
        assert_relative_eq!(streams.total(), manual, max_relative = 1e-12);
    }
}
