//! Named scenarios and a runner for batch projections
//!
//! Each scenario is an independent `(params, toggles)` pair, so batches are
//! projected in parallel and returned in input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::params::{BusinessParameters, FeatureToggles};
use crate::projection::{project, ProjectionResult, ProjectionSummary};

/// A named input set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub params: BusinessParameters,
    #[serde(default)]
    pub toggles: FeatureToggles,
}

impl Scenario {
    pub fn new(name: impl Into<String>, params: BusinessParameters, toggles: FeatureToggles) -> Self {
        Self {
            name: name.into(),
            params,
            toggles,
        }
    }

    /// Project this scenario
    pub fn project(&self) -> Result<ProjectionResult, ProjectionError> {
        project(&self.params, &self.toggles)
    }
}

/// Outcome of projecting one scenario in a batch
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<ProjectionResult, ProjectionError>,
}

impl ScenarioOutcome {
    pub fn summary(&self) -> Option<ProjectionSummary> {
        self.result.as_ref().ok().map(ProjectionResult::summary)
    }
}

/// Runner for projecting many scenarios, optionally against shared base inputs
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(BusinessParameters::default(), FeatureToggles::all());
///
/// // Sweep royalty rates on top of the base inputs
/// let results = runner.sweep(&[5.0, 6.0, 7.0], |p, rate| p.royalty_rate_pct = *rate);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_params: BusinessParameters,
    base_toggles: FeatureToggles,
}

impl ScenarioRunner {
    /// Create runner with base inputs used by `run` and `sweep`
    pub fn new(base_params: BusinessParameters, base_toggles: FeatureToggles) -> Self {
        Self {
            base_params,
            base_toggles,
        }
    }

    /// Project the base inputs
    pub fn run(&self) -> Result<ProjectionResult, ProjectionError> {
        project(&self.base_params, &self.base_toggles)
    }

    /// Project a batch of independent scenarios in parallel, preserving order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: scenario.name.clone(),
                result: scenario.project(),
            })
            .collect()
    }

    /// Project one variant of the base inputs per value, in parallel
    pub fn sweep<T, F>(&self, values: &[T], apply: F) -> Vec<Result<ProjectionResult, ProjectionError>>
    where
        T: Sync,
        F: Fn(&mut BusinessParameters, &T) + Sync,
    {
        values
            .par_iter()
            .map(|value| {
                let mut params = self.base_params.clone();
                apply(&mut params, value);
                project(&params, &self.base_toggles)
            })
            .collect()
    }

    /// Get reference to base inputs for inspection
    pub fn base_params(&self) -> &BusinessParameters {
        &self.base_params
    }

    /// Get mutable reference to base inputs for customization
    pub fn base_params_mut(&mut self) -> &mut BusinessParameters {
        &mut self.base_params
    }

    pub fn base_toggles(&self) -> FeatureToggles {
        self.base_toggles
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(BusinessParameters::default(), FeatureToggles::default())
    }
}
