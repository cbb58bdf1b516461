//! Classification of raw unit attributes into the catalog's closed sets.
//!
//! Every function here is total: input the classifier does not recognize
//! falls back to a defined category (`?` domain, `Ground` attack type)
//! instead of failing.

use crate::catalog::{AirGround, AttackType};
use crate::raw::RawTrait;

/// Trait slug marking area-of-effect damage.
pub const SPLASH_TRAIT: &str = "splash";

const WORKERS_ONLY_PHRASE: &str = "can only attack workers";

/// Domain from the explicit fields: immobile units are static defenses.
pub fn air_ground(speed: u32, domain_slug: Option<&str>) -> AirGround {
    if speed == 0 {
        return AirGround::Static;
    }
    match domain_slug.map(str::trim) {
        Some(slug) if slug.eq_ignore_ascii_case("air") => AirGround::Air,
        Some(slug) if slug.eq_ignore_ascii_case("ground") => AirGround::Ground,
        _ => AirGround::Unknown,
    }
}

/// Attack type from the explicit targeting fields.
pub fn attack_type(
    targets_air: bool,
    targets_ground: bool,
    target_description: Option<&str>,
) -> AttackType {
    let workers_only = target_description
        .map(|text| text.to_lowercase().contains(WORKERS_ONLY_PHRASE))
        .unwrap_or(false);
    if workers_only {
        AttackType::AntiWorker
    } else if targets_air && targets_ground {
        AttackType::Versatile
    } else if targets_air {
        AttackType::AntiAir
    } else {
        AttackType::Ground
    }
}

pub fn is_melee(range: u32) -> bool {
    range == 1
}

pub fn has_splash(traits: &[RawTrait]) -> bool {
    traits
        .iter()
        .any(|t| t.slug.as_deref() == Some(SPLASH_TRAIT))
}

/// Classifiers for the free-text `unitTag` the source used before it
/// published explicit fields (e.g. `"Anti-Air Splash Air Unit"`).
///
/// Callers trim the tag first; matching is by prefix, suffix, and substring.
pub mod legacy {
    use crate::catalog::{AirGround, AttackType};

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    /// Armor class the tag used to carry. Not part of the current catalog.
    pub enum ArmorType {
        Normal,
        Durable,
    }

    pub fn attack_type(tag: &str) -> AttackType {
        if tag.starts_with("Anti-Air") {
            AttackType::AntiAir
        } else if tag.starts_with("Versatile") {
            AttackType::Versatile
        } else if tag.starts_with("Anti-Worker") {
            AttackType::AntiWorker
        } else {
            AttackType::Ground
        }
    }

    pub fn air_ground(tag: &str) -> AirGround {
        if tag.ends_with("Air Unit") {
            AirGround::Air
        } else if tag.ends_with("Ground Unit") {
            AirGround::Ground
        } else if tag.ends_with("Base Defense") {
            AirGround::Static
        } else {
            AirGround::Unknown
        }
    }

    pub fn armor_type(tag: &str) -> ArmorType {
        if tag.contains(" Durable ") {
            ArmorType::Durable
        } else {
            ArmorType::Normal
        }
    }

    pub fn has_splash(tag: &str) -> bool {
        tag.contains("Splash")
    }

    pub fn is_melee(tag: &str) -> bool {
        tag.contains("Melee")
    }
}
