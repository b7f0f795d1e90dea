//! Local persistence: two JSON array documents in the data directory.
//!
//! Document names are fixed by the on-disk contract and kept verbatim from
//! the original store so existing data reads back unchanged. Every save is a
//! full-replace write of one collection; there is no transactionality across
//! the two collections (last write wins on each independently).

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::member::{Member, seed_members};
use crate::core::task::Task;
use crate::error::StoreError;

pub const TASKS_KEY: &str = "syncfamily_tasks";
pub const MEMBERS_KEY: &str = "syncfamily_members";

pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (and create if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read one collection; `None` when the document has never been written.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Full-replace write of one collection.
    fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(self.document_path(key), content)?;
        Ok(())
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read(TASKS_KEY)?.unwrap_or_default())
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        self.write(TASKS_KEY, tasks)
    }

    /// Load members, seeding the two defaults on the first-ever call.
    ///
    /// The seeds are persisted before returning, so a subsequent load (with
    /// no intervening save) returns the same records without re-seeding. An
    /// explicitly saved empty collection stays empty.
    pub fn load_members(&self) -> Result<Vec<Member>, StoreError> {
        match self.read(MEMBERS_KEY)? {
            Some(members) => Ok(members),
            None => {
                let seeds = seed_members();
                self.write(MEMBERS_KEY, &seeds)?;
                Ok(seeds)
            }
        }
    }

    pub fn save_members(&self, members: &[Member]) -> Result<(), StoreError> {
        self.write(MEMBERS_KEY, members)
    }
}
