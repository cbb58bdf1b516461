//! Canonical unit records as stored in `units.json`.
//!
//! `Unit` is the system of record: the normalizer builds it from raw page
//! data, the catalog store persists it, and the differ compares it. Equality
//! skips `index`: reordering the source list never shows up as
//! a change.

use crate::catalog::identity::{AirGround, AttackType, Slug};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Special ability attached to a unit.
pub struct Ability {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Trait badge (e.g. `splash`, `big`); used for innate traits as well as the
/// counter lists.
pub struct Trait {
    pub name: String,
    pub slug: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// One normalized unit.
///
/// Decoding is strict: catalogs written under the legacy schema must pass
/// through [`crate::catalog::migrate`] first.
pub struct Unit {
    /// Position in the source list. Not part of equality.
    pub index: usize,
    pub name: String,
    pub slug: Slug,
    pub tech_tier: String,
    pub air_ground: AirGround,
    pub attack_type: AttackType,
    pub splash: bool,
    pub melee: bool,
    pub ability: Option<Ability>,
    pub health: u32,
    pub damage: u32,
    pub speed: u32,
    pub range: u32,
    pub matter: u32,
    pub energy: u32,
    pub bandwidth: u32,
    /// Unlock cost; `None` when the cost table has no value for this unit.
    pub war_credits: Option<u32>,
    pub page_url: String,
    pub icon_url: String,
    pub traits: Vec<Trait>,
    pub counters: Vec<Trait>,
    pub countered_by: Vec<Trait>,
}

/// Borrowed projection of every identity-relevant field of a [`Unit`].
///
/// Built by exhaustive destructuring so a new `Unit` field fails to compile
/// until it is either listed here or explicitly ignored.
#[derive(Debug, PartialEq, Eq)]
struct UnitView<'a> {
    name: &'a str,
    slug: &'a Slug,
    tech_tier: &'a str,
    air_ground: AirGround,
    attack_type: &'a AttackType,
    splash: bool,
    melee: bool,
    ability: Option<&'a Ability>,
    health: u32,
    damage: u32,
    speed: u32,
    range: u32,
    matter: u32,
    energy: u32,
    bandwidth: u32,
    war_credits: Option<u32>,
    page_url: &'a str,
    icon_url: &'a str,
    traits: &'a [Trait],
    counters: &'a [Trait],
    countered_by: &'a [Trait],
}

impl Unit {
    fn view(&self) -> UnitView<'_> {
        let Unit {
            index: _,
            name,
            slug,
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
            war_credits,
            page_url,
            icon_url,
            traits,
            counters,
            countered_by,
        } = self;
        UnitView {
            name,
            slug,
            tech_tier,
            air_ground: *air_ground,
            attack_type,
            splash: *splash,
            melee: *melee,
            ability: ability.as_ref(),
            health: *health,
            damage: *damage,
            speed: *speed,
            range: *range,
            matter: *matter,
            energy: *energy,
            bandwidth: *bandwidth,
            war_credits: *war_credits,
            page_url,
            icon_url,
            traits,
            counters,
            countered_by,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl Eq for Unit {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_unit(slug: &str) -> Unit {
        Unit {
            index: 0,
            name: slug.to_uppercase(),
            slug: Slug::from(slug),
            tech_tier: "Core".to_string(),
            air_ground: AirGround::Ground,
            attack_type: AttackType::Ground,
            splash: false,
            melee: false,
            ability: None,
            health: 3,
            damage: 2,
            speed: 3,
            range: 2,
            matter: 50,
            energy: 0,
            bandwidth: 1,
            war_credits: None,
            page_url: format!("https://www.playbattleaces.com/units/{slug}"),
            icon_url: format!("https://cdn.playbattleaces.com/images/icons/units/{slug}.png"),
            traits: Vec::new(),
            counters: Vec::new(),
            countered_by: Vec::new(),
        }
    }

    #[test]
    fn equality_ignores_index() {
        let a = sample_unit("crab");
        let mut b = a.clone();
        b.index = 17;
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn equality_sees_every_other_field() {
        let base = sample_unit("crab");

        let mut changed = base.clone();
        changed.health = 4;
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.war_credits = Some(0);
        assert_ne!(base, changed, "zero cost differs from no cost");

        let mut changed = base.clone();
        changed.counters.push(Trait {
            name: "Big".into(),
            slug: "big".into(),
            icon_url: "https://cdn.playbattleaces.com/images/icons/traits/big.png".into(),
        });
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.attack_type = AttackType::Other("Workers".into());
        assert_ne!(base, changed);
    }

    #[test]
    fn unit_rejects_unknown_fields() {
        let mut value = serde_json::to_value(sample_unit("crab")).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .insert("armor_type".into(), "Normal".into());
        assert!(serde_json::from_value::<Unit>(value).is_err());
    }

    #[test]
    fn serialized_field_order_is_stable() {
        let value = serde_json::to_value(sample_unit("crab")).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.first(), Some(&"index"));
        assert_eq!(keys.last(), Some(&"countered_by"));
        assert_eq!(keys.len(), 22);
    }
}
