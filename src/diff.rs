//! Change detection between two catalogs.
//!
//! Units are matched by slug, never by position. Output order is part of the
//! contract: every removal (in old-catalog order) comes first, followed by
//! additions and modifications interleaved in new-catalog order.

use crate::catalog::{Slug, Unit};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One unit's transition between two catalogs.
///
/// `before` is `None` for an addition and `after` is `None` for a removal;
/// a modification carries both.
pub struct UnitChange {
    pub before: Option<Unit>,
    pub after: Option<Unit>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// One top-level field whose stored value differs between `before` and
/// `after` of a modification.
pub struct FieldChange {
    pub field: String,
    pub before: Value,
    pub after: Value,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
/// Per-kind counts for a change batch.
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl UnitChange {
    pub fn added(unit: Unit) -> Self {
        Self {
            before: None,
            after: Some(unit),
        }
    }

    pub fn removed(unit: Unit) -> Self {
        Self {
            before: Some(unit),
            after: None,
        }
    }

    pub fn modified(before: Unit, after: Unit) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    /// Kind of change, or `None` for the degenerate empty change.
    pub fn kind(&self) -> Option<ChangeKind> {
        match (&self.before, &self.after) {
            (None, Some(_)) => Some(ChangeKind::Added),
            (Some(_), None) => Some(ChangeKind::Removed),
            (Some(_), Some(_)) => Some(ChangeKind::Modified),
            (None, None) => None,
        }
    }

    /// Slug of the unit this change is about.
    pub fn slug(&self) -> Option<&Slug> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|unit| &unit.slug)
    }

    /// Fields that differ in a modification, in stored field order.
    ///
    /// `index` is skipped; additions and removals report no field changes.
    pub fn field_changes(&self) -> Vec<FieldChange> {
        let (Some(before), Some(after)) = (&self.before, &self.after) else {
            return Vec::new();
        };
        let (Ok(Value::Object(before)), Ok(Value::Object(after))) =
            (serde_json::to_value(before), serde_json::to_value(after))
        else {
            return Vec::new();
        };
        after
            .into_iter()
            .filter(|(field, _)| field != "index")
            .filter_map(|(field, after_value)| {
                let before_value = before.get(&field).cloned().unwrap_or(Value::Null);
                (before_value != after_value).then(|| FieldChange {
                    field,
                    before: before_value,
                    after: after_value,
                })
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for UnitChange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use crate::catalog::migrate::optional_unit_from_stored;
        use serde::de::Error;

        #[derive(Deserialize)]
        struct StoredChange {
            #[serde(default)]
            before: Value,
            #[serde(default)]
            after: Value,
        }

        let stored = StoredChange::deserialize(deserializer)?;
        let before = optional_unit_from_stored(stored.before)
            .map_err(|err| D::Error::custom(format!("{err:#}")))?;
        let after = optional_unit_from_stored(stored.after)
            .map_err(|err| D::Error::custom(format!("{err:#}")))?;
        Ok(Self { before, after })
    }
}

impl ChangeSummary {
    pub fn of(changes: &[UnitChange]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change.kind() {
                Some(ChangeKind::Added) => summary.added += 1,
                Some(ChangeKind::Removed) => summary.removed += 1,
                Some(ChangeKind::Modified) => summary.modified += 1,
                None => {}
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// Compare `old` against `new` by slug.
///
/// Equality is the catalog's index-excluding equality, so a pure reordering
/// yields no changes. Calling this with an empty `old` reports everything as
/// added; whether to record that is the caller's decision.
pub fn diff(old: &[Unit], new: &[Unit]) -> Vec<UnitChange> {
    let old_by_slug: BTreeMap<&Slug, &Unit> = old.iter().map(|unit| (&unit.slug, unit)).collect();
    let new_slugs: BTreeSet<&Slug> = new.iter().map(|unit| &unit.slug).collect();

    let mut changes: Vec<UnitChange> = old
        .iter()
        .filter(|unit| !new_slugs.contains(&unit.slug))
        .map(|unit| UnitChange::removed(unit.clone()))
        .collect();

    for unit in new {
        match old_by_slug.get(&unit.slug) {
            None => changes.push(UnitChange::added(unit.clone())),
            Some(existing) if *existing != unit => {
                changes.push(UnitChange::modified((*existing).clone(), unit.clone()))
            }
            Some(_) => {}
        }
    }
    changes
}
