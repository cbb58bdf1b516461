//! Slug-keyed view of a catalog.
//!
//! The index enforces the invariants a catalog has on its own: every slug is
//! URL-safe and no slug repeats. A bad source list or a hand-edited stored
//! catalog is rejected here instead of being matched ambiguously by the
//! differ or written outside the icon cache.

use crate::catalog::identity::Slug;
use crate::catalog::model::Unit;
use crate::error::CatalogError;
use std::collections::BTreeMap;

#[derive(Debug)]
/// Borrowed catalog plus a lookup table keyed by slug.
pub struct CatalogIndex<'a> {
    units: &'a [Unit],
    by_slug: BTreeMap<&'a Slug, &'a Unit>,
}

impl<'a> CatalogIndex<'a> {
    /// Index `units`, failing on the first blank, unsafe, or repeated slug.
    pub fn build(units: &'a [Unit]) -> Result<Self, CatalogError> {
        let mut by_slug = BTreeMap::new();
        for unit in units {
            if unit.slug.as_str().trim().is_empty() {
                return Err(CatalogError::EmptySlug { index: unit.index });
            }
            if !unit.slug.is_url_safe() {
                return Err(CatalogError::InvalidSlug {
                    index: unit.index,
                    slug: unit.slug.clone(),
                });
            }
            if by_slug.insert(&unit.slug, unit).is_some() {
                return Err(CatalogError::DuplicateSlug {
                    slug: unit.slug.clone(),
                });
            }
        }
        Ok(Self { units, by_slug })
    }

    /// Resolve a unit by slug.
    pub fn get(&self, slug: &Slug) -> Option<&'a Unit> {
        self.by_slug.get(slug).copied()
    }

    pub fn contains(&self, slug: &Slug) -> bool {
        self.by_slug.contains_key(slug)
    }

    /// Slugs in stable (sorted) order.
    pub fn slugs(&self) -> impl Iterator<Item = &'a Slug> + '_ {
        self.by_slug.keys().copied()
    }

    /// Units in catalog order.
    pub fn units(&self) -> &'a [Unit] {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
