//! Network unit-count state carried from one projection year to the next

use crate::error::ProjectionError;
use crate::params::BusinessParameters;

/// Largest unit count the recurrence can carry exactly as a whole number
pub const MAX_UNITS: f64 = u64::MAX as f64;

/// Size of the franchise network at a point in the projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkState {
    /// Projection year (1-indexed, 0 before the first advance)
    pub year: u32,

    /// Operating units at the end of `year`
    pub units: u64,
}

impl NetworkState {
    /// State before year 1: the existing network only
    pub fn opening(params: &BusinessParameters) -> Self {
        Self {
            year: 0,
            units: params.starting_units as u64,
        }
    }

    /// Advance one year: growth and churn on last year's rounded count, then new openings.
    ///
    /// Year 1 only adds the new units. The count is rounded and floored at zero each
    /// year, and the next year compounds on that rounded figure. A count beyond
    /// [`MAX_UNITS`] is an error rather than a clamp.
    pub fn advance_year(&mut self, params: &BusinessParameters) -> Result<(), ProjectionError> {
        self.year += 1;

        let prior = self.units as f64;
        let new_units = params.new_units_per_year as f64;

        let raw = if self.year == 1 {
            prior + new_units
        } else {
            prior * (1.0 + params.growth_rate_pct / 100.0) - prior * (params.churn_rate_pct / 100.0)
                + new_units
        };

        self.units = round_units(raw).ok_or_else(|| {
            ProjectionError::invalid(
                "growthRatePct",
                format!("unit count {:e} in year {} exceeds {:e}", raw, self.year, MAX_UNITS),
            )
        })?;
        Ok(())
    }

    pub fn units_f64(&self) -> f64 {
        self.units as f64
    }
}

/// Round to the nearest whole unit, floored at zero; `None` past [`MAX_UNITS`]
fn round_units(raw: f64) -> Option<u64> {
    if raw.is_nan() {
        return Some(0);
    }
    let rounded = raw.round().max(0.0);
    if rounded >= MAX_UNITS {
        return None;
    }
    Some(rounded as u64)
}
