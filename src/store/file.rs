//! Scenario store backed by one JSON file per record

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use serde::Serialize;

use super::{sort_newest_first, NewScenario, SavedScenario, ScenarioStore, StoreError};

/// Default directory for saved scenarios
pub const DEFAULT_STORE_DIR: &str = "data/scenarios";

const FILE_PREFIX: &str = "scenario-";
const FILE_SUFFIX: &str = ".json";
const COUNTER_FILE: &str = "next-id.json";

/// Directory of `scenario-<id>.json` files plus a `next-id.json` counter.
///
/// Each file is written to a temporary file and renamed into place, so a
/// reader never observes a half-written record. Ids are never reused, even
/// after the newest record is deleted.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }

    /// Ids of every record file in the directory
    fn ids(&self) -> Result<Vec<u64>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let id = name
                .to_str()
                .and_then(|n| n.strip_prefix(FILE_PREFIX))
                .and_then(|n| n.strip_suffix(FILE_SUFFIX))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(id) = id {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn read_record(path: &Path) -> Result<SavedScenario, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_record(&self, record: &SavedScenario) -> Result<(), StoreError> {
        write_json_atomic(&self.record_path(record.id), record)
    }

    /// Next unused id: the persisted counter, bumped past any record on disk
    fn next_id(&self) -> Result<u64, StoreError> {
        let path = self.dir.join(COUNTER_FILE);
        let counter = match File::open(&path) {
            Ok(file) => match serde_json::from_reader::<_, u64>(BufReader::new(file)) {
                Ok(next) => next,
                Err(err) => {
                    warn!("ignoring unreadable id counter {}: {}", path.display(), err);
                    1
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => 1,
            Err(err) => return Err(err.into()),
        };
        let past_records = self.ids()?.into_iter().max().map_or(1, |max| max + 1);
        Ok(counter.max(past_records))
    }
}

/// Serialize `value` to a sibling temp file and rename it over `path`.
/// The temp file is removed if any step fails.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let written = (|| -> Result<(), StoreError> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp, path)?;
        Ok(())
    })();
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

impl ScenarioStore for JsonFileStore {
    fn save(&mut self, scenario: NewScenario) -> Result<SavedScenario, StoreError> {
        scenario.params.validate()?;
        let id = self.next_id()?;
        let saved = scenario.into_saved(id, Utc::now());
        self.write_record(&saved)?;
        write_json_atomic(&self.dir.join(COUNTER_FILE), &(id + 1))?;
        info!("saved scenario {} ({}) to {}", saved.id, saved.title, self.dir.display());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedScenario>, StoreError> {
        let mut records = Vec::new();
        for id in self.ids()? {
            let path = self.record_path(id);
            match Self::read_record(&path) {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping unreadable scenario file {}: {}", path.display(), err),
            }
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn load(&self, id: u64) -> Result<SavedScenario, StoreError> {
        match Self::read_record(&self.record_path(id)) {
            Err(StoreError::Io(err)) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            other => other,
        }
    }

    fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {
                info!("deleted scenario {}", id);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }
}
