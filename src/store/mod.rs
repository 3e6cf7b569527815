//! Persisted field selections and saved queries.
//!
//! Both collections live as JSON documents in the platform data directory:
//! - Linux: `~/.local/share/jira-helper/`
//! - macOS: `~/Library/Application Support/jira-helper/`
//! - Windows: `C:\Users\<User>\AppData\Local\jira-helper\`

mod collection;
mod queries;
mod selections;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::APP_DIR;

pub use collection::{Collection, Record, RecordId};
pub use queries::{SavedQuery, SavedQueryStore};
pub use selections::{FieldSelection, FieldSelectionStore, FieldType};

/// File name of the field selection collection.
const FIELD_SELECTIONS_FILE: &str = "field_selections.json";

/// File name of the saved query collection.
const SAVED_QUERIES_FILE: &str = "saved_queries.json";

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform data directory could not be determined.
    #[error("could not determine local data directory")]
    NoDataDir,

    /// Reading or writing a collection file failed.
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file exists but is not valid JSON for its schema.
    #[error("collection file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No record has the given id.
    #[error("no record with id {0}")]
    NotFound(RecordId),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Partial update applied to a field selection or saved query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    /// New user-assigned label.
    pub name: Option<String>,
    /// New last-reuse timestamp.
    pub chosen_on: Option<DateTime<Utc>>,
}

impl EntryUpdate {
    /// An update marking the entry as reused now.
    pub fn chosen_now() -> Self {
        Self {
            name: None,
            chosen_on: Some(Utc::now()),
        }
    }

    /// Also set the entry's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Apply to the name and timestamp of an entry.
    fn apply(self, name: &mut Option<String>, chosen_on: &mut Option<DateTime<Utc>>) {
        if let Some(new_name) = self.name {
            *name = Some(new_name);
        }
        if let Some(when) = self.chosen_on {
            *chosen_on = Some(when);
        }
    }
}

/// Both persisted collections.
#[derive(Debug)]
pub struct Stores {
    pub selections: FieldSelectionStore,
    pub queries: SavedQueryStore,
}

impl Stores {
    /// Open the collections in the default data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_dir()?)
    }

    /// Open the collections in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self {
            selections: FieldSelectionStore::open(dir.join(FIELD_SELECTIONS_FILE))?,
            queries: SavedQueryStore::open(dir.join(SAVED_QUERIES_FILE))?,
        })
    }

    /// The platform data directory for jira-helper.
    pub fn default_dir() -> Result<PathBuf> {
        let base = dirs::data_local_dir().ok_or(StoreError::NoDataDir)?;
        Ok(base.join(APP_DIR))
    }
}
