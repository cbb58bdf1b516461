//! Unit catalog wiring.
//!
//! This module owns the canonical `Unit` record, its identity (`Slug`), the
//! on-disk catalog under `units.json`, and the adapter that reads catalogs
//! written by older versions of the tracker. Callers use `CatalogIndex` for
//! slug lookups and `CatalogStore` to load or replace the persisted list.

pub mod identity;
pub mod index;
pub mod migrate;
pub mod model;
pub mod store;

pub use identity::{AirGround, AttackType, Slug};
pub use index::CatalogIndex;
pub use migrate::SchemaVersion;
pub use model::{Ability, Trait, Unit};
pub use store::CatalogStore;
