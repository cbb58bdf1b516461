//! Shared library for the unit tracker.
//!
//! The crate turns the unit list embedded in the game site's page data into
//! a canonical catalog (`units.json`), compares it with the catalog from the
//! previous run, and appends the differences to an append-only changelog
//! (`changelog.json`). Public functions here form the contract the binaries
//! depend on: normalization, catalog and changelog storage, diffing, and the
//! end-to-end run.

pub mod catalog;
pub mod changelog;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod icons;
pub mod logging;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod raw;
pub mod source;

pub use catalog::{
    Ability, AirGround, AttackType, CatalogIndex, CatalogStore, SchemaVersion, Slug, Trait, Unit,
};
pub use changelog::{AppendOutcome, ChangeLog, ChangelogStore, PendingAppend};
pub use config::TrackerPaths;
pub use diff::{ChangeKind, ChangeSummary, FieldChange, UnitChange, diff};
pub use error::{CatalogError, NormalizeError, StoreError};
pub use icons::{AssetFetcher, HttpFetcher, IconCache, IconReport};
pub use normalize::{UnlockCosts, normalize_all, normalize_document, normalize_unit};
pub use pipeline::{RunOptions, RunReport, changes_since, run};
pub use raw::RawUnit;
pub use source::{DocumentSource, InputSource};
