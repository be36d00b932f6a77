//! Projection engine for multi-year franchise revenue and profit

mod state;
mod engine;
mod streams;
mod costs;
mod results;
mod cache;

pub use state::NetworkState;
pub use engine::{project, ProjectionEngine};
pub use streams::{marketing_levy, RevenueStreams};
pub use costs::operating_costs;
pub use results::{per_unit, ProjectionResult, ProjectionSummary, YearProjection};
pub use cache::{ProjectionCache, DEFAULT_CACHE_CAPACITY};
