//! Core projection engine: the year-by-year fold over the network state

use log::debug;

use super::costs::operating_costs;
use super::results::{ProjectionResult, YearProjection};
use super::state::NetworkState;
use super::streams::{marketing_levy, RevenueStreams};
use crate::error::ProjectionError;
use crate::params::{BusinessParameters, FeatureToggles};

/// Main projection engine over a validated parameter set
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine<'a> {
    params: &'a BusinessParameters,
    toggles: FeatureToggles,
}

impl<'a> ProjectionEngine<'a> {
    /// Create an engine, rejecting structurally invalid parameters
    pub fn new(
        params: &'a BusinessParameters,
        toggles: FeatureToggles,
    ) -> Result<Self, ProjectionError> {
        params.validate()?;
        Ok(Self { params, toggles })
    }

    /// Run the projection over `projection_years` years.
    ///
    /// Fails if the unit count outgrows what the recurrence can carry.
    pub fn run(&self) -> Result<ProjectionResult, ProjectionError> {
        let horizon = self.params.projection_years;
        let mut result = ProjectionResult::with_capacity(horizon as usize);
        let mut state = NetworkState::opening(self.params);

        for _year in 1..=horizon {
            state.advance_year(self.params)?;

            let row = self.project_year(&state);
            debug!(
                "year {}: units={} gross={:.2} costs={:.2} net={:.2}",
                row.year_index, row.units, row.gross_revenue, row.total_costs, row.net_profit
            );
            result.add_year(row);
        }

        Ok(result)
    }

    /// Calculate revenue, costs and profit for the year `state` has advanced to
    fn project_year(&self, state: &NetworkState) -> YearProjection {
        let units = state.units_f64();
        let streams = RevenueStreams::compute(self.params, &self.toggles, state.year, units);

        YearProjection::new(
            state.year,
            state.units,
            units * self.params.avg_annual_sales_per_unit,
            marketing_levy(self.params, units),
            streams,
            operating_costs(self.params, &self.toggles, units),
        )
    }
}

/// Project `params` under `toggles`.
///
/// Pure and deterministic: identical inputs give identical output. Fails only
/// with [`ProjectionError::InvalidParameter`], for invalid inputs or a unit
/// count that outgrows `u64`.
pub fn project(
    params: &BusinessParameters,
    toggles: &FeatureToggles,
) -> Result<ProjectionResult, ProjectionError> {
    ProjectionEngine::new(params, *toggles)?.run()
}
