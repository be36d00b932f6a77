//! Memoization of projection results keyed on the full input set
//!
//! Keys are the serialized `(params, toggles)` pair, so any field change is a new key.

use std::collections::{HashMap, VecDeque};

use log::trace;

use super::engine::project;
use super::results::ProjectionResult;
use crate::error::ProjectionError;
use crate::params::{BusinessParameters, FeatureToggles};

/// Default number of distinct input sets kept
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Bounded first-in-first-out projection cache
#[derive(Debug, Clone)]
pub struct ProjectionCache {
    entries: HashMap<String, ProjectionResult>,
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ProjectionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Cache key for an input set, `None` if the inputs cannot be serialized
    fn key(params: &BusinessParameters, toggles: &FeatureToggles) -> Option<String> {
        serde_json::to_string(&(params, toggles)).ok()
    }

    /// Return the cached projection for these inputs, computing it on a miss.
    ///
    /// Invalid inputs are never cached.
    pub fn get_or_project(
        &mut self,
        params: &BusinessParameters,
        toggles: &FeatureToggles,
    ) -> Result<ProjectionResult, ProjectionError> {
        let Some(key) = Self::key(params, toggles) else {
            return project(params, toggles);
        };

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            trace!("projection cache hit ({} entries)", self.entries.len());
            return Ok(hit.clone());
        }

        self.misses += 1;
        let result = project(params, toggles)?;
        self.insert(key, result.clone());
        Ok(result)
    }

    fn insert(&mut self, key: String, result: ProjectionResult) {
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for ProjectionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
