//! Calculator session: current inputs plus their projection, recomputed on every write

use crate::error::ProjectionError;
use crate::params::{BusinessParameters, FeatureToggles};
use crate::projection::{ProjectionCache, ProjectionResult};
use crate::store::SavedScenario;

/// Holds the inputs a user is editing and the projection for them.
///
/// Every write recomputes synchronously. Writes that leave the inputs invalid
/// keep the new inputs but clear the projection, so readers see "no data"
/// rather than stale figures.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    params: BusinessParameters,
    toggles: FeatureToggles,
    projection: Option<ProjectionResult>,
    last_error: Option<ProjectionError>,
    cache: ProjectionCache,
}

impl CalculatorSession {
    /// Start a session and compute the initial projection
    pub fn new(params: BusinessParameters, toggles: FeatureToggles) -> Self {
        let mut session = Self {
            params,
            toggles,
            projection: None,
            last_error: None,
            cache: ProjectionCache::default(),
        };
        let _ = session.recompute();
        session
    }

    pub fn params(&self) -> &BusinessParameters {
        &self.params
    }

    pub fn toggles(&self) -> FeatureToggles {
        self.toggles
    }

    /// Latest projection, `None` while the inputs are invalid
    pub fn projection(&self) -> Option<&ProjectionResult> {
        self.projection.as_ref()
    }

    pub fn last_error(&self) -> Option<&ProjectionError> {
        self.last_error.as_ref()
    }

    /// Edit one or more parameter fields in place, then recompute
    pub fn update_params<F>(&mut self, edit: F) -> Result<&ProjectionResult, ProjectionError>
    where
        F: FnOnce(&mut BusinessParameters),
    {
        edit(&mut self.params);
        self.recompute()
    }

    /// Edit the feature toggles, then recompute
    pub fn update_toggles<F>(&mut self, edit: F) -> Result<&ProjectionResult, ProjectionError>
    where
        F: FnOnce(&mut FeatureToggles),
    {
        edit(&mut self.toggles);
        self.recompute()
    }

    /// Replace the entire input set, then recompute
    pub fn replace_inputs(
        &mut self,
        params: BusinessParameters,
        toggles: FeatureToggles,
    ) -> Result<&ProjectionResult, ProjectionError> {
        self.params = params;
        self.toggles = toggles;
        self.recompute()
    }

    /// Load a saved scenario. Its inputs overwrite the whole current set; the
    /// stored projection is ignored and recomputed.
    pub fn load_saved(&mut self, saved: &SavedScenario) -> Result<&ProjectionResult, ProjectionError> {
        self.replace_inputs(saved.params.clone(), saved.toggles)
    }

    fn recompute(&mut self) -> Result<&ProjectionResult, ProjectionError> {
        match self.cache.get_or_project(&self.params, &self.toggles) {
            Ok(result) => {
                self.last_error = None;
                let projection: &ProjectionResult = self.projection.insert(result);
                Ok(projection)
            }
            Err(err) => {
                self.projection = None;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Cache statistics as `(hits, misses)`
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new(BusinessParameters::default(), FeatureToggles::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use chrono::Utc;

    #[test]
    fn test_initial_projection() {
        let session = CalculatorSession::default();
        assert_eq!(session.projection().map(|p| p.len()), Some(5));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_recompute_on_write() {
        let mut session = CalculatorSession::default();
        let before = session.projection().unwrap().summary().total_gross_revenue;

        let after = session
            .update_params(|p| p.royalty_rate_pct = 8.0)
            .unwrap()
            .summary()
            .total_gross_revenue;
        assert!(after > before);

        let years = session.update_params(|p| p.projection_years = 10).unwrap().len();
        assert_eq!(years, 10);
    }

    #[test]
    fn test_toggle_write() {
        let mut session = CalculatorSession::default();
        let result = session.update_toggles(|t| t.include_operating_costs = true).unwrap();
        assert!(result.years.iter().all(|y| y.total_costs > 0.0));
    }

    #[test]
    fn test_invalid_write_clears_projection() {
        let mut session = CalculatorSession::default();
        assert!(session.update_params(|p| p.projection_years = 0).is_err());
        assert!(session.projection().is_none());
        assert!(session.last_error().is_some());

        session.update_params(|p| p.projection_years = 3).unwrap();
        assert_eq!(session.projection().map(|p| p.len()), Some(3));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_revisited_inputs_hit_cache() {
        let mut session = CalculatorSession::default();
        session.update_params(|p| p.growth_rate_pct = 20.0).unwrap();
        session.update_params(|p| p.growth_rate_pct = 15.0).unwrap();
        let (hits, misses) = session.cache_stats();
        assert_eq!(misses, 2);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_load_replaces_all_inputs() {
        let mut session = CalculatorSession::default();
        session.update_params(|p| p.renewal_fee = 99_999.0).unwrap();
        session.update_toggles(|t| t.include_msp = true).unwrap();

        let saved_params = BusinessParameters {
            starting_units: 80,
            projection_years: 4,
            ..Default::default()
        };
        let saved_toggles = FeatureToggles {
            include_supply_chain: true,
            ..Default::default()
        };
        let saved = SavedScenario {
            id: 7,
            title: "Expansion".into(),
            description: String::new(),
            params: saved_params.clone(),
            toggles: saved_toggles,
            projections: None,
            created_at: Utc::now(),
        };

        let loaded = session.load_saved(&saved).unwrap().clone();
        assert_eq!(session.params(), &saved_params);
        assert_eq!(session.toggles(), saved_toggles);
        assert_eq!(session.params().renewal_fee, 15_000.0);
        assert!(!session.toggles().include_msp);
        assert_eq!(loaded, project(&saved_params, &saved_toggles).unwrap());
    }
}
