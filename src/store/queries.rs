//! Persisted JQL queries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::collection::{Collection, Record, RecordId};
use super::{EntryUpdate, Result};
use crate::prompt::Prompter;

/// A previously typed JQL query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedQuery {
    /// The raw query text.
    pub jql: String,
    /// Optional user-assigned label.
    #[serde(default)]
    pub name: Option<String>,
    /// When the query was last reused from history.
    #[serde(default)]
    pub chosen_on: Option<DateTime<Utc>>,
}

impl SavedQuery {
    /// Menu label: `(name) jql`.
    pub fn label(&self) -> String {
        format!("({}) {}", self.name.as_deref().unwrap_or("unnamed"), self.jql)
    }
}

/// Store of [`SavedQuery`] records.
#[derive(Debug)]
pub struct SavedQueryStore {
    collection: Collection<SavedQuery>,
}

impl SavedQueryStore {
    /// Open the store backed by `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            collection: Collection::open(path)?,
        })
    }

    /// The most recently added or reused query.
    pub fn find_most_recent(&self) -> Option<Record<SavedQuery>> {
        self.collection.find_most_recent(|_| true)
    }

    /// All saved queries, most recent first.
    pub fn find_all(&self) -> Vec<Record<SavedQuery>> {
        self.collection.find(|_| true)
    }

    /// Find a saved query by its name.
    #[cfg(test)]
    pub fn find_by_name(&self, name: &str) -> Option<Record<SavedQuery>> {
        self.collection
            .find_most_recent(|q| q.name.as_deref() == Some(name))
    }

    /// Persist a newly typed query.
    pub fn add(&mut self, jql: impl Into<String>) -> Result<RecordId> {
        let jql = jql.into();
        let id = self.collection.add(SavedQuery {
            jql,
            name: None,
            chosen_on: None,
        })?;
        info!(%id, "Saved query");
        Ok(id)
    }

    /// Set the name and/or last-reuse time of a query.
    pub fn update(&mut self, id: RecordId, update: EntryUpdate) -> Result<()> {
        self.collection
            .update(id, |q| update.apply(&mut q.name, &mut q.chosen_on))
    }

    /// Let the operator pick a saved query to reuse.
    ///
    /// A picked query without a name is named on the spot, and its
    /// `chosen_on` is always refreshed. `None` means there was nothing to
    /// pick or the operator cancelled.
    #[instrument(skip(self, prompter))]
    pub fn choose_from_history(
        &mut self,
        prompter: &mut dyn Prompter,
    ) -> crate::error::Result<Option<String>> {
        let history = self.find_all();
        if history.is_empty() {
            return Ok(None);
        }

        let labels: Vec<String> = history.iter().map(|r| r.data.label()).collect();
        let Some(index) = prompter.select("Choose one", &labels)? else {
            return Ok(None);
        };
        let Some(entry) = history.into_iter().nth(index) else {
            return Ok(None);
        };

        let mut update = EntryUpdate::chosen_now();
        if entry.data.name.is_none() {
            if let Some(name) = prompter.input("Enter a name for this selection")? {
                update = update.with_name(name);
            }
        }
        self.update(entry.id, update)?;
        Ok(Some(entry.data.jql))
    }
}
