//! Persisted catalog (`units.json`).
//!
//! The store only loads and replaces the full ordered list. Combining old and
//! new catalogs is the differ's job; the store never merges.

use crate::catalog::index::CatalogIndex;
use crate::catalog::migrate::unit_from_stored;
use crate::catalog::model::Unit;
use crate::error::StoreError;
use crate::persist::{read_existing, write_json_atomic};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug)]
/// Catalog file handle; cheap to construct, does no I/O until used.
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored catalog in file order.
    ///
    /// Units written under the legacy schema are upgraded on the way in. A
    /// stored catalog with a repeated or unsafe slug is a decode error, the
    /// same as one that fails to parse.
    pub fn load(&self) -> Result<Vec<Unit>, StoreError> {
        let bytes = read_existing(&self.path)?;
        let values: Vec<Value> = serde_json::from_slice(&bytes).map_err(|err| self.decode(err))?;
        let units = values
            .into_iter()
            .map(unit_from_stored)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|err| self.decode(format!("{err:#}")))?;
        CatalogIndex::build(&units).map_err(|err| self.decode(err))?;
        debug!(path = %self.path.display(), units = units.len(), "loaded catalog");
        Ok(units)
    }

    /// Like [`CatalogStore::load`], but an absent file is `Ok(None)`.
    pub fn load_existing(&self) -> Result<Option<Vec<Unit>>, StoreError> {
        match self.load() {
            Ok(units) => Ok(Some(units)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Replace the stored catalog with `units`.
    pub fn save(&self, units: &[Unit]) -> Result<(), StoreError> {
        write_json_atomic(&self.path, units)?;
        debug!(path = %self.path.display(), units = units.len(), "saved catalog");
        Ok(())
    }

    fn decode(&self, detail: impl ToString) -> StoreError {
        StoreError::Decode {
            path: self.path.clone(),
            detail: detail.to_string(),
        }
    }
}
