//! Scenario persistence
//!
//! A saved scenario is the full `(params, toggles)` input set plus an optional
//! copy of the projection it produced. Loading always hands back the whole
//! input set; callers replace their current inputs with it wholesale.

mod file;
mod memory;

pub use file::{JsonFileStore, DEFAULT_STORE_DIR};
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ProjectionError;
use crate::params::{BusinessParameters, FeatureToggles};
use crate::projection::YearProjection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario {0} not found")]
    NotFound(u64),
    #[error("refusing to save invalid inputs: {0}")]
    Invalid(#[from] ProjectionError),
}

/// A scenario to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct NewScenario {
    /// Blank titles are replaced with a timestamped default
    pub title: String,
    pub description: String,
    pub params: BusinessParameters,
    pub toggles: FeatureToggles,
    /// Projection computed from these inputs, kept only as a cache
    pub projections: Option<Vec<YearProjection>>,
}

impl NewScenario {
    pub fn new(params: BusinessParameters, toggles: FeatureToggles) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            params,
            toggles,
            projections: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_projections(mut self, projections: Vec<YearProjection>) -> Self {
        self.projections = Some(projections);
        self
    }

    /// Assign identity and timestamp
    fn into_saved(self, id: u64, created_at: DateTime<Utc>) -> SavedScenario {
        let title = if self.title.trim().is_empty() {
            format!("Calculation {}", created_at.format("%Y-%m-%d %H:%M:%S"))
        } else {
            self.title
        };
        SavedScenario {
            id,
            title,
            description: self.description,
            params: self.params,
            toggles: self.toggles,
            projections: self.projections,
            created_at,
        }
    }
}

/// A persisted scenario record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScenario {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub params: BusinessParameters,
    #[serde(default)]
    pub toggles: FeatureToggles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projections: Option<Vec<YearProjection>>,
    pub created_at: DateTime<Utc>,
}

/// Storage backend for saved scenarios
pub trait ScenarioStore {
    /// Persist a new scenario and return the stored record
    fn save(&mut self, scenario: NewScenario) -> Result<SavedScenario, StoreError>;

    /// All saved scenarios, newest first
    fn list(&self) -> Result<Vec<SavedScenario>, StoreError>;

    fn load(&self, id: u64) -> Result<SavedScenario, StoreError>;

    fn delete(&mut self, id: u64) -> Result<(), StoreError>;
}

/// Newest first; ids break ties between records saved in the same instant
fn sort_newest_first(records: &mut [SavedScenario]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
