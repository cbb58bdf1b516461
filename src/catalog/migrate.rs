//! Upgrades stored unit objects written by older versions of the tracker.
//!
//! The first catalogs carried an `armor_type` column derived from the free
//! text unit tag and had no trait lists. Those objects are rewritten into the
//! current shape before strict decoding; nothing else in the crate needs to
//! know the legacy layout existed.

use crate::catalog::model::Unit;
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

const LEGACY_ARMOR_FIELD: &str = "armor_type";
const TRAIT_LIST_FIELDS: [&str; 3] = ["traits", "counters", "countered_by"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// Layout a stored unit object was written with.
pub enum SchemaVersion {
    /// Tag-derived classification, `armor_type`, no trait lists.
    V1,
    /// Explicit classification fields and trait lists.
    V2,
}

impl SchemaVersion {
    /// Classify a stored unit object by the fields it carries.
    pub fn detect(object: &Map<String, Value>) -> Self {
        let has_all_trait_lists = TRAIT_LIST_FIELDS
            .iter()
            .all(|field| object.contains_key(*field));
        if object.contains_key(LEGACY_ARMOR_FIELD) || !has_all_trait_lists {
            SchemaVersion::V1
        } else {
            SchemaVersion::V2
        }
    }
}

/// Rewrite a stored unit object into the current layout.
///
/// V2 objects pass through untouched. V1 objects lose `armor_type` and gain
/// empty trait lists where they are missing.
pub fn upgrade(value: Value) -> Result<Value> {
    let Value::Object(mut object) = value else {
        bail!("stored unit must be a JSON object");
    };
    if SchemaVersion::detect(&object) == SchemaVersion::V1 {
        object.remove(LEGACY_ARMOR_FIELD);
        for field in TRAIT_LIST_FIELDS {
            object
                .entry(field)
                .or_insert_with(|| Value::Array(Vec::new()));
        }
    }
    Ok(Value::Object(object))
}

/// Decode one stored unit of either schema version.
pub fn unit_from_stored(value: Value) -> Result<Unit> {
    let slug = value
        .get("slug")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    let upgraded = upgrade(value)?;
    serde_json::from_value(upgraded).with_context(|| format!("decoding stored unit '{slug}'"))
}

/// Decode an optional stored unit (`null` stays `None`), as found in
/// changelog entries.
pub fn optional_unit_from_stored(value: Value) -> Result<Option<Unit>> {
    match value {
        Value::Null => Ok(None),
        other => unit_from_stored(other).map(Some),
    }
}
