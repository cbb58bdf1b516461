//! Append-only history of catalog changes (`changelog.json`).
//!
//! Existing entries are carried through as raw JSON when a new entry is
//! appended, so history written by older versions of the tracker is never
//! re-encoded, reordered, or trimmed.

use crate::diff::{ChangeSummary, UnitChange};
use crate::error::StoreError;
use crate::persist::{read_existing, write_json_atomic};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Changes detected by one comparison run.
pub struct ChangeLog {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub changes: Vec<UnitChange>,
}

impl ChangeLog {
    pub fn new(date: NaiveDate, changes: Vec<UnitChange>) -> Self {
        Self { date, changes }
    }

    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary::of(&self.changes)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
/// What [`ChangelogStore::append`] did.
pub enum AppendOutcome {
    /// The batch was empty; the file was not touched.
    Skipped,
    /// The entry was written; `entries` is the new history length.
    Appended { entries: usize },
}

#[derive(Clone, Debug)]
pub struct ChangelogStore {
    path: PathBuf,
}

impl ChangelogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry` after every existing entry.
    ///
    /// An entry with no changes is not recorded. A missing file is an empty
    /// history.
    pub fn append(&self, entry: &ChangeLog) -> Result<AppendOutcome, StoreError> {
        if entry.changes.is_empty() {
            debug!(path = %self.path.display(), "no changes; changelog untouched");
            return Ok(AppendOutcome::Skipped);
        }
        self.prepare()?.commit(entry)
    }

    /// Read and validate the existing history without writing anything.
    ///
    /// Lets a caller surface a corrupt changelog before it touches any other
    /// file, then append to exactly the history it validated.
    pub fn prepare(&self) -> Result<PendingAppend<'_>, StoreError> {
        Ok(PendingAppend {
            store: self,
            entries: self.load_raw()?,
        })
    }

    /// Read the full history, upgrading units stored under older schemas.
    pub fn load(&self) -> Result<Vec<ChangeLog>, StoreError> {
        self.load_raw()?
            .into_iter()
            .enumerate()
            .map(|(pos, value)| {
                serde_json::from_value(value).map_err(|err| self.decode(format!("entry {pos}: {err}")))
            })
            .collect()
    }

    fn load_raw(&self) -> Result<Vec<Value>, StoreError> {
        let bytes = match read_existing(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        match serde_json::from_slice(&bytes) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => Err(self.decode("changelog must be a JSON array".to_string())),
            Err(err) => Err(self.decode(err.to_string())),
        }
    }

    fn decode(&self, detail: String) -> StoreError {
        StoreError::Decode {
            path: self.path.clone(),
            detail,
        }
    }
}

/// History loaded by [`ChangelogStore::prepare`], waiting for one entry.
#[derive(Debug)]
pub struct PendingAppend<'a> {
    store: &'a ChangelogStore,
    entries: Vec<Value>,
}

impl PendingAppend<'_> {
    /// Number of entries already in the history.
    pub fn existing(&self) -> usize {
        self.entries.len()
    }

    /// Write the history plus `entry`. An empty entry writes nothing.
    pub fn commit(mut self, entry: &ChangeLog) -> Result<AppendOutcome, StoreError> {
        let path = &self.store.path;
        if entry.changes.is_empty() {
            debug!(path = %path.display(), "no changes; changelog untouched");
            return Ok(AppendOutcome::Skipped);
        }

        let encoded = serde_json::to_value(entry).map_err(|source| StoreError::Encode {
            path: path.clone(),
            source,
        })?;
        self.entries.push(encoded);
        write_json_atomic(path, &self.entries)?;

        info!(
            path = %path.display(),
            date = %entry.date,
            changes = entry.changes.len(),
            entries = self.entries.len(),
            "appended changelog entry"
        );
        Ok(AppendOutcome::Appended {
            entries: self.entries.len(),
        })
    }
}
