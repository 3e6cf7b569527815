//! Persisted groups of return and order-by fields.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::collection::{Collection, Record, RecordId};
use super::{EntryUpdate, Result};
use crate::config::FieldSettings;
use crate::prompt::Prompter;

/// Menu entry to reuse a previous selection.
const CHOOSE_OLD: &str = "Choose from old selections";
/// Menu entry to make a fresh selection.
const MAKE_NEW: &str = "Make a new selection";

/// Kind of field selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Fields returned in search results.
    Return,
    /// Fields used in an ORDER BY clause.
    #[serde(rename = "orderby")]
    OrderBy,
}

impl FieldType {
    /// The stored name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Return => "return",
            Self::OrderBy => "orderby",
        }
    }

    /// The fields the operator may pick for this type.
    pub fn allowed_fields(self, settings: &FieldSettings) -> &[String] {
        match self {
            Self::Return => &settings.return_fields,
            Self::OrderBy => &settings.orderby_fields,
        }
    }

    /// Prompt shown when picking fields of this type.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Return => "Select return fields you are interested in",
            Self::OrderBy => "Select order by fields you are interested in",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted group of chosen fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSelection {
    /// What the fields are used for.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// The chosen fields, in order.
    pub selected: Vec<String>,
    /// Optional user-assigned label.
    #[serde(default)]
    pub name: Option<String>,
    /// When the selection was last reused from history.
    #[serde(default)]
    pub chosen_on: Option<DateTime<Utc>>,
}

impl FieldSelection {
    /// Menu label: `(name): field, field`.
    pub fn label(&self) -> String {
        format!(
            "({}): {}",
            self.name.as_deref().unwrap_or("unnamed"),
            self.selected.join(", ")
        )
    }
}

/// Store of [`FieldSelection`] records.
#[derive(Debug)]
pub struct FieldSelectionStore {
    collection: Collection<FieldSelection>,
}

impl FieldSelectionStore {
    /// Open the store backed by `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            collection: Collection::open(path)?,
        })
    }

    /// The most recently created or reused selection of `field_type`.
    pub fn find_most_recent(&self, field_type: FieldType) -> Option<Record<FieldSelection>> {
        self.collection
            .find_most_recent(|s| s.field_type == field_type)
    }

    /// All selections of `field_type`, most recent first.
    pub fn find_all(&self, field_type: FieldType) -> Vec<Record<FieldSelection>> {
        self.collection.find(|s| s.field_type == field_type)
    }

    /// Persist a new selection.
    pub fn add(&mut self, field_type: FieldType, selected: Vec<String>) -> Result<RecordId> {
        self.collection.add(FieldSelection {
            field_type,
            selected,
            name: None,
            chosen_on: None,
        })
    }

    /// Set the name and/or last-reuse time of a selection.
    pub fn update(&mut self, id: RecordId, update: EntryUpdate) -> Result<()> {
        self.collection
            .update(id, |s| update.apply(&mut s.name, &mut s.chosen_on))
    }

    /// Return the most recent selection of `field_type`, or ask for a new one.
    ///
    /// With `force_new`, history is ignored and the operator always picks from
    /// the allowed fields. A non-empty pick is persisted. An empty result
    /// means the operator chose nothing.
    #[instrument(skip(self, settings, prompter))]
    pub fn get_or_select(
        &mut self,
        field_type: FieldType,
        force_new: bool,
        settings: &FieldSettings,
        prompter: &mut dyn Prompter,
    ) -> crate::error::Result<Vec<String>> {
        if !force_new {
            if let Some(last) = self.find_most_recent(field_type) {
                if !last.data.selected.is_empty() {
                    debug!(id = %last.id, "Using most recent selection");
                    return Ok(last.data.selected);
                }
            }
        }

        let allowed = field_type.allowed_fields(settings);
        let picked = prompter.multi_select(field_type.prompt(), allowed)?;
        let selected: Vec<String> = picked
            .into_iter()
            .filter_map(|i| allowed.get(i).cloned())
            .collect();

        if !selected.is_empty() {
            let id = self.add(field_type, selected.clone())?;
            info!(%id, count = selected.len(), "Saved new field selection");
        }
        Ok(selected)
    }

    /// Reuse a selection from history or make a new one.
    ///
    /// A reused selection without a name is named on the spot, and its
    /// `chosen_on` is always refreshed. An empty result means the operator
    /// cancelled.
    #[instrument(skip(self, settings, prompter))]
    pub fn choose_from_history_or_new(
        &mut self,
        field_type: FieldType,
        settings: &FieldSettings,
        prompter: &mut dyn Prompter,
    ) -> crate::error::Result<Vec<String>> {
        let menu = [CHOOSE_OLD.to_string(), MAKE_NEW.to_string()];
        let prompt = format!("Choose one for {} fields in search results", field_type);
        let choice = match prompter.select(&prompt, &menu)? {
            Some(choice) => choice,
            None => return Ok(Vec::new()),
        };

        if choice == 0 {
            let history = self.find_all(field_type);
            if history.is_empty() {
                info!("No saved {} selections, making a new one", field_type);
            } else {
                let labels: Vec<String> = history.iter().map(|r| r.data.label()).collect();
                let Some(index) = prompter.select("Choose one", &labels)? else {
                    return Ok(Vec::new());
                };
                let Some(entry) = history.into_iter().nth(index) else {
                    return Ok(Vec::new());
                };

                let mut update = EntryUpdate::chosen_now();
                if entry.data.name.is_none() {
                    if let Some(name) = prompter.input("Enter a name for this selection")? {
                        update = update.with_name(name);
                    }
                }
                self.update(entry.id, update)?;
                return Ok(entry.data.selected);
            }
        }

        self.get_or_select(field_type, true, settings, prompter)
    }
}
