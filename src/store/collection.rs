//! A small JSON-backed document collection.
//!
//! Records are kept in one JSON file per collection. Every record has an
//! opaque id and a revision number that is bumped on each write, so "most
//! recent" covers both newly added and recently updated records.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Result, StoreError};

/// Opaque identifier of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored record with bookkeeping metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<T> {
    /// The record id.
    pub id: RecordId,
    /// Bumped on every add or update; higher is more recent.
    pub revision: u64,
    /// When the record was added.
    pub created_on: DateTime<Utc>,
    /// The stored data.
    #[serde(flatten)]
    pub data: T,
}

/// On-disk layout of a collection file.
#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile<T> {
    next_id: u64,
    next_revision: u64,
    records: Vec<Record<T>>,
}

impl<T> Default for CollectionFile<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            next_revision: 1,
            records: Vec::new(),
        }
    }
}

/// A persisted collection of records of type `T`.
#[derive(Debug)]
pub struct Collection<T> {
    /// Path of the backing JSON file.
    path: PathBuf,
    /// In-memory copy of the file.
    state: CollectionFile<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open a collection, creating an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the file exists but cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("Collection {:?} does not exist yet", path);
                CollectionFile::default()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self { path, state })
    }

    /// Path of the backing file.
    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Number of stored records.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.state.records.len()
    }

    /// Whether the collection has no records.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    /// Add a record and persist the collection.
    pub fn add(&mut self, data: T) -> Result<RecordId> {
        let id = RecordId(self.state.next_id);
        self.state.next_id += 1;
        let revision = self.bump_revision();

        self.state.records.push(Record {
            id,
            revision,
            created_on: Utc::now(),
            data,
        });
        self.save()?;

        debug!(%id, path = ?self.path, "Added record");
        Ok(id)
    }

    /// Apply `change` to the record with `id` and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record has that id.
    pub fn update<F>(&mut self, id: RecordId, change: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let revision = self.bump_revision();
        let record = self
            .state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        change(&mut record.data);
        record.revision = revision;
        self.save()?;

        debug!(%id, path = ?self.path, "Updated record");
        Ok(())
    }

    /// Get a record by id.
    #[cfg(test)]
    pub fn get(&self, id: RecordId) -> Option<&Record<T>> {
        self.state.records.iter().find(|r| r.id == id)
    }

    /// All records matching `filter`, most recent first.
    pub fn find<F>(&self, filter: F) -> Vec<Record<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut found: Vec<Record<T>> = self
            .state
            .records
            .iter()
            .filter(|r| filter(&r.data))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.revision.cmp(&a.revision));
        found
    }

    /// The most recent record matching `filter`.
    pub fn find_most_recent<F>(&self, filter: F) -> Option<Record<T>>
    where
        F: Fn(&T) -> bool,
    {
        self.state
            .records
            .iter()
            .filter(|r| filter(&r.data))
            .max_by_key(|r| r.revision)
            .cloned()
    }

    fn bump_revision(&mut self) -> u64 {
        let revision = self.state.next_revision;
        self.state.next_revision += 1;
        revision
    }

    /// Write the collection to disk.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.state)
            .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, content)?;
        trace!("Saved collection to {:?}", self.path);
        Ok(())
    }
}
