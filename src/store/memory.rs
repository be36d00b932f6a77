//! In-memory scenario store

use chrono::Utc;

use super::{sort_newest_first, NewScenario, SavedScenario, ScenarioStore, StoreError};

/// Scenario store that lives for the duration of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SavedScenario>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for MemoryStore {
    fn save(&mut self, scenario: NewScenario) -> Result<SavedScenario, StoreError> {
        scenario.params.validate()?;
        self.next_id += 1;
        let saved = scenario.into_saved(self.next_id, Utc::now());
        self.records.push(saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedScenario>, StoreError> {
        let mut records = self.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn load(&self, id: u64) -> Result<SavedScenario, StoreError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BusinessParameters, FeatureToggles};

    #[test]
    fn test_save_list_load_delete() {
        let mut store = MemoryStore::new();
        let first = store
            .save(NewScenario::new(BusinessParameters::default(), FeatureToggles::default()).with_title("A"))
            .unwrap();
        let second = store
            .save(NewScenario::new(BusinessParameters::default(), FeatureToggles::all()).with_title("B"))
            .unwrap();
        assert_ne!(first.id, second.id);

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["B", "A"]);

        assert_eq!(store.load(first.id).unwrap(), first);
        store.delete(first.id).unwrap();
        assert!(matches!(store.load(first.id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(first.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_blank_title_defaulted() {
        let mut store = MemoryStore::new();
        let saved = store
            .save(NewScenario::new(BusinessParameters::default(), FeatureToggles::default()))
            .unwrap();
        assert!(saved.title.starts_with("Calculation "));
    }

    #[test]
    fn test_invalid_inputs_refused() {
        let mut store = MemoryStore::new();
        let params = BusinessParameters {
            projection_years: 0,
            ..Default::default()
        };
        let err = store.save(NewScenario::new(params, FeatureToggles::default())).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(store.list().unwrap().is_empty());
    }
}
