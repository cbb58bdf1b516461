//! Shapes of the unit records embedded in the source page's data blob.
//!
//! Every member is optional here; the normalizer decides which ones are
//! required and reports the missing one by name. Only the fields the tracker
//! understands are declared, and anything else in the blob is ignored.

use crate::error::NormalizeError;
use serde::Deserialize;
use serde_json::Value;

/// Where the unit list lives inside the page's data document.
pub const UNITS_POINTER: &str = "/props/pageProps/units";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One unit as published by the source page.
pub struct RawUnit {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub tech_tier: Option<RawTechTier>,
    /// Free-text classification tag used before the explicit fields existed.
    pub unit_tag: Option<String>,
    pub unit_domain: Option<RawDomain>,
    pub targets_air: Option<bool>,
    pub targets_ground: Option<bool>,
    pub target_description: Option<String>,
    pub stat_health: Option<u32>,
    pub stat_damage: Option<u32>,
    pub stat_speed: Option<u32>,
    pub stat_range: Option<u32>,
    pub cost_matter: Option<u32>,
    pub cost_energy: Option<u32>,
    pub cost_bandwidth: Option<u32>,
    pub unit_ability: Option<RawAbility>,
    pub unit_traits: Option<Vec<RawTrait>>,
    pub unit_counters: Option<Vec<RawTrait>>,
    pub unit_countered_by: Option<Vec<RawTrait>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTechTier {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDomain {
    pub slug: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAbility {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTrait {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl RawUnit {
    /// Decode one raw record.
    ///
    /// A record with a wrongly typed member is malformed; the error names the
    /// offending member when serde reports it.
    pub fn from_value(value: &Value, index: usize) -> Result<Self, NormalizeError> {
        let slug = value
            .get("slug")
            .and_then(Value::as_str)
            .map(str::to_string);
        RawUnit::deserialize(value).map_err(|err| NormalizeError::MalformedRecord {
            index,
            slug,
            field: err.to_string(),
        })
    }
}

/// Pull the ordered list of raw unit values out of a page document.
///
/// Accepts either the full data blob (`props.pageProps.units`) or a bare
/// array of unit records.
pub fn unit_values(document: &Value) -> Result<&[Value], NormalizeError> {
    let list = match document {
        Value::Array(items) => return Ok(items),
        Value::Object(_) => document.pointer(UNITS_POINTER).ok_or_else(|| {
            NormalizeError::MalformedDocument(format!("no unit list at {UNITS_POINTER}"))
        })?,
        _ => {
            return Err(NormalizeError::MalformedDocument(
                "expected a JSON object or array".to_string(),
            ));
        }
    };
    list.as_array().map(Vec::as_slice).ok_or_else(|| {
        NormalizeError::MalformedDocument(format!("{UNITS_POINTER} is not an array"))
    })
}
