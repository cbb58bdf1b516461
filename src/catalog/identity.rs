use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stable, source-assigned identifier for a unit (e.g., `crab`).
///
/// The slug is the only identity that survives across runs; the differ
/// matches old and new catalogs on it.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(pub String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase ASCII letters, digits, `-` and `_` only.
    ///
    /// Slugs become file names in the icon cache and path segments in URLs,
    /// so anything else (separators, dots, whitespace) is refused.
    pub fn is_url_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Slug {
    fn from(value: &str) -> Self {
        Slug(value.to_string())
    }
}

/// Where a unit lives on the battlefield.
///
/// `Unknown` serializes as `?`, which is what the catalog has always stored
/// for domains the classifier does not recognize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AirGround {
    Air,
    Ground,
    Static,
    Unknown,
}

/// What a unit is able to shoot at.
///
/// Known variants keep serialization consistent; `Other` preserves labels
/// found in stored catalogs written by newer or older classifiers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttackType {
    Ground,
    AntiAir,
    Versatile,
    AntiWorker,
    Other(String),
}

impl Serialize for AirGround {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AirGround {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_label(&value))
    }
}

impl AirGround {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirGround::Air => "Air",
            AirGround::Ground => "Ground",
            AirGround::Static => "Static",
            AirGround::Unknown => "?",
        }
    }

    fn from_label(value: &str) -> Self {
        match value {
            "Air" => AirGround::Air,
            "Ground" => AirGround::Ground,
            "Static" => AirGround::Static,
            _ => AirGround::Unknown,
        }
    }
}

impl fmt::Display for AirGround {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AttackType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttackType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_label(&value))
    }
}

impl AttackType {
    pub fn as_str(&self) -> &str {
        match self {
            AttackType::Ground => "Ground",
            AttackType::AntiAir => "Anti-Air",
            AttackType::Versatile => "Versatile",
            AttackType::AntiWorker => "Anti-Worker",
            AttackType::Other(value) => value.as_str(),
        }
    }

    fn from_label(value: &str) -> Self {
        match value {
            "Ground" => AttackType::Ground,
            "Anti-Air" => AttackType::AntiAir,
            "Versatile" => AttackType::Versatile,
            "Anti-Worker" => AttackType::AntiWorker,
            other => AttackType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_type_round_trips_known_and_unknown() {
        let known = AttackType::AntiAir;
        let json = serde_json::to_string(&known).unwrap();
        assert_eq!(json, "\"Anti-Air\"");
        let back: AttackType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, known);

        let parsed: AttackType = serde_json::from_str("\"Ground + Air\"").unwrap();
        assert_eq!(parsed, AttackType::Other("Ground + Air".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Ground + Air\"");
    }

    #[test]
    fn unknown_domain_serializes_as_question_mark() {
        assert_eq!(serde_json::to_string(&AirGround::Unknown).unwrap(), "\"?\"");
        let parsed: AirGround = serde_json::from_str("\"Underground\"").unwrap();
        assert_eq!(parsed, AirGround::Unknown);
        let parsed: AirGround = serde_json::from_str("\"Static\"").unwrap();
        assert_eq!(parsed, AirGround::Static);
    }

    #[test]
    fn url_safe_slugs() {
        for ok in ["crab", "king-crab", "mortar_2"] {
            assert!(Slug::from(ok).is_url_safe(), "{ok}");
        }
        for bad in ["", "../../escape", "Crab", "king crab", "a/b", "crab.png"] {
            assert!(!Slug::from(bad).is_url_safe(), "{bad}");
        }
    }

    #[test]
    fn slug_is_transparent() {
        let slug = Slug::from("crab");
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"crab\"");
        let parsed: Slug = serde_json::from_str("\"wasp\"").unwrap();
        assert_eq!(parsed.as_str(), "wasp");
    }
}
