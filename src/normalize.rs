//! Builds canonical [`Unit`] records from raw page records.
//!
//! Normalization is all-or-nothing per run: the first record missing a
//! required field aborts with [`NormalizeError::MalformedRecord`] and no
//! partial catalog is produced. Optional inputs (ability, trait lists,
//! unlock cost) map to explicit "absent" values, never to zero.

use crate::catalog::{Ability, CatalogIndex, Slug, Trait, Unit};
use crate::error::NormalizeError;
use crate::extract;
use crate::raw::{RawAbility, RawTrait, RawUnit, unit_values};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

pub const UNIT_PAGE_URL: &str = "https://www.playbattleaces.com/units/";
pub const UNIT_ICON_URL: &str = "https://cdn.playbattleaces.com/images/icons/units/";
pub const ABILITY_ICON_URL: &str = "https://cdn.playbattleaces.com/images/icons/abilities/";
pub const TRAIT_ICON_URL: &str = "https://cdn.playbattleaces.com/images/icons/traits/";

pub fn unit_page_url(slug: &str) -> String {
    format!("{UNIT_PAGE_URL}{slug}")
}

pub fn unit_icon_url(slug: &str) -> String {
    format!("{UNIT_ICON_URL}{slug}.png")
}

pub fn ability_icon_url(slug: &str) -> String {
    format!("{ABILITY_ICON_URL}{slug}.png")
}

pub fn trait_icon_url(slug: &str) -> String {
    format!("{TRAIT_ICON_URL}{slug}.png")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Unlock cost per unit slug, as kept in `warcredits.json`.
///
/// A slug mapped to `null` and a slug missing from the table both mean "no
/// known cost".
pub struct UnlockCosts(BTreeMap<String, Option<u32>>);

impl UnlockCosts {
    /// Read the table from disk. A missing file yields an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "unlock cost table not found; costs will be empty");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn get(&self, slug: &str) -> Option<u32> {
        self.0.get(slug).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Option<u32>)> for UnlockCosts {
    fn from_iter<I: IntoIterator<Item = (S, Option<u32>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Required-field accessor that carries the record context into the error.
struct RecordContext<'a> {
    index: usize,
    slug: Option<&'a str>,
}

impl RecordContext<'_> {
    fn require<T: Clone>(&self, value: &Option<T>, field: &str) -> Result<T, NormalizeError> {
        value.clone().ok_or_else(|| self.malformed(field))
    }

    fn malformed(&self, field: &str) -> NormalizeError {
        NormalizeError::MalformedRecord {
            index: self.index,
            slug: self.slug.map(str::to_string),
            field: field.to_string(),
        }
    }
}

/// Normalize one raw record into a [`Unit`] at position `index`.
pub fn normalize_unit(
    raw: &RawUnit,
    unlock_costs: &UnlockCosts,
    index: usize,
) -> Result<Unit, NormalizeError> {
    let ctx = RecordContext {
        index,
        slug: raw.slug.as_deref(),
    };
    let slug = ctx.require(&raw.slug, "slug")?;
    let name = ctx.require(&raw.name, "name")?;
    let tech_tier = raw
        .tech_tier
        .as_ref()
        .and_then(|tier| tier.name.clone())
        .ok_or_else(|| ctx.malformed("techTier.name"))?;
    let health = ctx.require(&raw.stat_health, "statHealth")?;
    let damage = ctx.require(&raw.stat_damage, "statDamage")?;
    let speed = ctx.require(&raw.stat_speed, "statSpeed")?;
    let range = ctx.require(&raw.stat_range, "statRange")?;
    let matter = ctx.require(&raw.cost_matter, "costMatter")?;
    let energy = ctx.require(&raw.cost_energy, "costEnergy")?;
    let bandwidth = ctx.require(&raw.cost_bandwidth, "costBandwidth")?;

    let ability = raw
        .unit_ability
        .as_ref()
        .map(|ability| normalize_ability(ability, &ctx))
        .transpose()?;
    let traits = normalize_traits(raw.unit_traits.as_deref(), &ctx, "unitTraits")?;
    let counters = normalize_traits(raw.unit_counters.as_deref(), &ctx, "unitCounters")?;
    let countered_by =
        normalize_traits(raw.unit_countered_by.as_deref(), &ctx, "unitCounteredBy")?;

    let (air_ground, attack_type, splash, melee) = match raw.unit_tag.as_deref() {
        Some(tag) => {
            let tag = tag.trim();
            (
                extract::legacy::air_ground(tag),
                extract::legacy::attack_type(tag),
                extract::legacy::has_splash(tag),
                extract::legacy::is_melee(tag),
            )
        }
        None => (
            extract::air_ground(
                speed,
                raw.unit_domain.as_ref().and_then(|d| d.slug.as_deref()),
            ),
            extract::attack_type(
                raw.targets_air.unwrap_or(false),
                raw.targets_ground.unwrap_or(false),
                raw.target_description.as_deref(),
            ),
            extract::has_splash(raw.unit_traits.as_deref().unwrap_or_default()),
            extract::is_melee(range),
        ),
    };

    Ok(Unit {
        index,
        war_credits: unlock_costs.get(&slug),
        page_url: unit_page_url(&slug),
        icon_url: unit_icon_url(&slug),
        slug: Slug(slug),
        name,
        tech_tier,
        air_ground,
        attack_type,
        splash,
        melee,
        ability,
        health,
        damage,
        speed,
        range,
        matter,
        energy,
        bandwidth,
        traits,
        counters,
        countered_by,
    })
}

fn normalize_ability(raw: &RawAbility, ctx: &RecordContext<'_>) -> Result<Ability, NormalizeError> {
    let slug = ctx.require(&raw.slug, "unitAbility.slug")?;
    Ok(Ability {
        name: ctx.require(&raw.name, "unitAbility.name")?,
        description: ctx.require(&raw.description, "unitAbility.description")?,
        icon_url: ability_icon_url(&slug),
        slug,
    })
}

fn normalize_traits(
    raw: Option<&[RawTrait]>,
    ctx: &RecordContext<'_>,
    field: &str,
) -> Result<Vec<Trait>, NormalizeError> {
    raw.unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(pos, t)| -> Result<Trait, NormalizeError> {
            let slug = ctx.require(&t.slug, &format!("{field}[{pos}].slug"))?;
            Ok(Trait {
                name: ctx.require(&t.name, &format!("{field}[{pos}].name"))?,
                icon_url: trait_icon_url(&slug),
                slug,
            })
        })
        .collect()
}

/// Normalize every record of a page document, in source order.
///
/// Fails fast on the first malformed record and rejects catalogs whose
/// slugs are not unique.
pub fn normalize_document(
    document: &Value,
    unlock_costs: &UnlockCosts,
) -> Result<Vec<Unit>, NormalizeError> {
    normalize_all(unit_values(document)?, unlock_costs)
}

/// Normalize a list of raw record values, assigning sequential indices.
pub fn normalize_all(
    records: &[Value],
    unlock_costs: &UnlockCosts,
) -> Result<Vec<Unit>, NormalizeError> {
    let mut units = Vec::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        let raw = RawUnit::from_value(value, index)?;
        units.push(normalize_unit(&raw, unlock_costs, index)?);
    }
    CatalogIndex::build(&units)?;
    debug!(units = units.len(), "normalized catalog");
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AirGround, AttackType};
    use serde_json::json;

    fn raw_crab() -> Value {
        json!({
            "name": "Crab",
            "slug": "crab",
            "techTier": {"name": "Core"},
            "unitDomain": {"slug": "ground"},
            "targetsAir": false,
            "targetsGround": true,
            "statHealth": 3,
            "statDamage": 2,
            "statSpeed": 3,
            "statRange": 2,
            "costMatter": 50,
            "costEnergy": 0,
            "costBandwidth": 1,
            "unitAbility": null,
            "unitTraits": [{"name": "Small", "slug": "small"}],
            "unitCounters": [{"name": "Splash", "slug": "splash"}],
            "unitCounteredBy": []
        })
    }

    fn normalize(value: &Value, costs: &UnlockCosts) -> Result<Unit, NormalizeError> {
        normalize_unit(&RawUnit::from_value(value, 0)?, costs, 0)
    }

    #[test]
    fn normalizes_current_schema_record() {
        let costs: UnlockCosts = [("crab", Some(0))].into_iter().collect();
        let unit = normalize(&raw_crab(), &costs).unwrap();
        assert_eq!(unit.slug.as_str(), "crab");
        assert_eq!(unit.tech_tier, "Core");
        assert_eq!(unit.air_ground, AirGround::Ground);
        assert_eq!(unit.attack_type, AttackType::Ground);
        assert!(!unit.melee);
        assert!(!unit.splash);
        assert!(unit.ability.is_none());
        assert_eq!(unit.war_credits, Some(0));
        assert_eq!(unit.page_url, "https://www.playbattleaces.com/units/crab");
        assert_eq!(
            unit.icon_url,
            "https://cdn.playbattleaces.com/images/icons/units/crab.png"
        );
        assert_eq!(unit.traits.len(), 1);
        assert_eq!(
            unit.counters[0].icon_url,
            "https://cdn.playbattleaces.com/images/icons/traits/splash.png"
        );
        assert!(unit.countered_by.is_empty());
    }

    #[test]
    fn missing_cost_is_none_not_zero() {
        let unit = normalize(&raw_crab(), &UnlockCosts::default()).unwrap();
        assert_eq!(unit.war_credits, None);

        let costs: UnlockCosts = [("crab", None)].into_iter().collect();
        assert_eq!(normalize(&raw_crab(), &costs).unwrap().war_credits, None);
    }

    #[test]
    fn builds_ability_only_when_present() {
        let mut raw = raw_crab();
        raw["unitAbility"] = json!({
            "name": "Overclock",
            "slug": "overclock",
            "description": "Attacks faster."
        });
        let unit = normalize(&raw, &UnlockCosts::default()).unwrap();
        let ability = unit.ability.expect("ability");
        assert_eq!(ability.slug, "overclock");
        assert_eq!(
            ability.icon_url,
            "https://cdn.playbattleaces.com/images/icons/abilities/overclock.png"
        );
    }

    #[test]
    fn absent_trait_lists_are_empty() {
        let mut raw = raw_crab();
        let obj = raw.as_object_mut().unwrap();
        obj.remove("unitTraits");
        obj.insert("unitCounters".into(), Value::Null);
        let unit = normalize(&raw, &UnlockCosts::default()).unwrap();
        assert!(unit.traits.is_empty());
        assert!(unit.counters.is_empty());
    }

    #[test]
    fn splash_and_melee_from_current_fields() {
        let mut raw = raw_crab();
        raw["statRange"] = json!(1);
        raw["unitTraits"] = json!([{"name": "Splash", "slug": "splash"}]);
        let unit = normalize(&raw, &UnlockCosts::default()).unwrap();
        assert!(unit.melee);
        assert!(unit.splash);
    }

    #[test]
    fn legacy_tag_is_trimmed_and_classified() {
        let mut raw = raw_crab();
        raw["unitTag"] = json!("  Anti-Air Splash Air Unit \n");
        let unit = normalize(&raw, &UnlockCosts::default()).unwrap();
        assert_eq!(unit.attack_type, AttackType::AntiAir);
        assert_eq!(unit.air_ground, AirGround::Air);
        assert!(unit.splash);
    }

    #[test]
    fn missing_required_field_names_the_field() {
        for field in ["name", "statHealth", "costBandwidth"] {
            let mut raw = raw_crab();
            raw.as_object_mut().unwrap().remove(field);
            let err = normalize(&raw, &UnlockCosts::default()).unwrap_err();
            match err {
                NormalizeError::MalformedRecord { slug, field: got, .. } => {
                    assert_eq!(slug.as_deref(), Some("crab"));
                    assert_eq!(got, field);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        let mut raw = raw_crab();
        raw["techTier"] = json!({});
        assert!(matches!(
            normalize(&raw, &UnlockCosts::default()),
            Err(NormalizeError::MalformedRecord { ref field, .. }) if field == "techTier.name"
        ));
    }

    #[test]
    fn malformed_ability_and_trait_entries_fail() {
        let mut raw = raw_crab();
        raw["unitAbility"] = json!({"name": "Overclock"});
        assert!(normalize(&raw, &UnlockCosts::default()).is_err());

        let mut raw = raw_crab();
        raw["unitCounteredBy"] = json!([{"name": "Big"}]);
        let err = normalize(&raw, &UnlockCosts::default()).unwrap_err();
        assert!(err.to_string().contains("unitCounteredBy[0].slug"));
    }

    #[test]
    fn normalize_all_assigns_indices_and_rejects_duplicates() {
        let mut wasp = raw_crab();
        wasp["slug"] = json!("wasp");
        let units = normalize_all(&[raw_crab(), wasp], &UnlockCosts::default()).unwrap();
        assert_eq!(units[0].index, 0);
        assert_eq!(units[1].index, 1);
        assert_eq!(units[1].slug.as_str(), "wasp");

        let err = normalize_all(&[raw_crab(), raw_crab()], &UnlockCosts::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::Catalog(_)));
    }

    #[test]
    fn normalize_all_fails_fast_with_index() {
        let mut broken = raw_crab();
        broken["slug"] = json!("wasp");
        broken.as_object_mut().unwrap().remove("statSpeed");
        let err = normalize_all(&[raw_crab(), broken], &UnlockCosts::default()).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MalformedRecord { index: 1, .. }
        ));
    }

    #[test]
    fn unlock_costs_load_missing_and_present() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("warcredits.json");
        assert!(UnlockCosts::load(&path).unwrap().is_empty());

        fs::write(&path, r#"{"crab": 0, "wasp": 600, "hunter": null}"#).unwrap();
        let costs = UnlockCosts::load(&path).unwrap();
        assert_eq!(costs.len(), 3);
        assert_eq!(costs.get("wasp"), Some(600));
        assert_eq!(costs.get("crab"), Some(0));
        assert_eq!(costs.get("hunter"), None);
        assert_eq!(costs.get("nobody"), None);
    }
}
