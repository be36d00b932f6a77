//! Franchise Projection - multi-year revenue and profit engine for franchise systems
//!
//! This library provides:
//! - The projection engine: unit-count recurrence, franchisor revenue streams,
//!   operating costs and net profit per year
//! - Scenario loading (CSV sheets, JSON files) and parallel batch runs
//! - A recompute-on-write calculator session with a memo cache
//! - Scenario persistence and tabular export

pub mod error;
pub mod params;
pub mod projection;
pub mod scenario;
pub mod session;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::ProjectionError;
pub use params::{BusinessParameters, FeatureToggles};
pub use projection::{project, ProjectionEngine, ProjectionResult, YearProjection};
pub use scenario::{Scenario, ScenarioRunner};
pub use session::CalculatorSession;
