//! Franchisor operating costs for a projection year

use crate::params::{BusinessParameters, FeatureToggles};

/// Total operating costs for a year with `units` in operation.
///
/// Zero when cost modeling is switched off.
pub fn operating_costs(params: &BusinessParameters, toggles: &FeatureToggles, units: f64) -> f64 {
    if !toggles.include_operating_costs {
        return 0.0;
    }

    let costs = &params.costs;
    let new_units = params.new_units_per_year as f64;

    costs.annual_staff_cost
        + new_units * costs.per_new_unit_recruitment_cost
        + new_units * costs.per_new_unit_training_cost
        + costs.tech_cost.annual(units)
        + costs.annual_legal_cost
        + costs.annual_marketing_admin_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TechCost;
    use approx::assert_relative_eq;

    #[test]
    fn test_costs_disabled() {
        let params = BusinessParameters::default();
        assert_eq!(operating_costs(&params, &FeatureToggles::default(), 35.0), 0.0);
    }

    #[test]
    fn test_flat_tech_cost() {
        let params = BusinessParameters::default();
        let toggles = FeatureToggles {
            include_operating_costs: true,
            ..Default::default()
        };
        // 250k staff + 10 * (5k + 2k) + 50k tech + 75k legal + 25k admin
        assert_relative_eq!(operating_costs(&params, &toggles, 35.0), 470_000.0);
        assert_relative_eq!(operating_costs(&params, &toggles, 90.0), 470_000.0);
    }

    #[test]
    fn test_per_unit_tech_cost_scales() {
        let mut params = BusinessParameters::default();
        params.costs.tech_cost = TechCost::PerUnitMonthly(100.0);
        let toggles = FeatureToggles {
            include_operating_costs: true,
            ..Default::default()
        };
        assert_relative_eq!(operating_costs(&params, &toggles, 35.0), 420_000.0 + 42_000.0);
    }
}
