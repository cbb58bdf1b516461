//! One tracker run, end to end.
//!
//! The order is fixed: fetch, normalize everything, load the previous
//! catalog, diff, read the changelog, replace the catalog, append the
//! changelog, fill the icon cache. Nothing is written until the whole new
//! catalog has normalized and the existing history has been read, so a
//! malformed record, a failed fetch, or a corrupt changelog leaves every file
//! as it was.

use crate::catalog::{CatalogStore, Unit};
use crate::changelog::{AppendOutcome, ChangeLog, ChangelogStore};
use crate::config::TrackerPaths;
use crate::diff::{ChangeSummary, UnitChange, diff};
use crate::icons::{AssetFetcher, IconCache, IconReport};
use crate::normalize::{UnlockCosts, normalize_document};
use crate::source::DocumentSource;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

/// Inputs of a run besides the document source.
pub struct RunOptions<'a> {
    pub paths: &'a TrackerPaths,
    /// Date stamped on the changelog entry.
    pub today: NaiveDate,
    /// Icon downloads are skipped when no fetcher is supplied.
    pub fetcher: Option<&'a dyn AssetFetcher>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// What a run did; printed by `unit-sync` as one JSON line.
pub struct RunReport {
    pub units: usize,
    /// True when no usable previous catalog existed and this run only
    /// established the baseline.
    pub baseline: bool,
    pub summary: ChangeSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<AppendOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<IconReport>,
}

/// Changes to record for this run, or `None` when the run only establishes
/// a baseline (no previous catalog, or an empty one).
pub fn changes_since(previous: Option<&[Unit]>, current: &[Unit]) -> Option<Vec<UnitChange>> {
    match previous {
        Some(old) if !old.is_empty() => Some(diff(old, current)),
        _ => None,
    }
}

pub fn run(source: &dyn DocumentSource, options: &RunOptions<'_>) -> Result<RunReport> {
    let paths = options.paths;
    let catalog = CatalogStore::new(paths.catalog_path());
    let changelog = ChangelogStore::new(paths.changelog_path());

    let document = source
        .fetch_document()
        .with_context(|| format!("fetching page document from {}", source.describe()))?;
    let unlock_costs = UnlockCosts::load(&paths.unlock_costs_path())?;
    let units = normalize_document(&document, &unlock_costs).context("normalizing units")?;
    info!(units = units.len(), source = %source.describe(), "normalized units");

    let previous = catalog.load_existing().context("loading previous catalog")?;
    let changes = changes_since(previous.as_deref(), &units);
    if changes.is_none() && changelog.path().exists() {
        warn!(
            catalog = %catalog.path().display(),
            changelog = %changelog.path().display(),
            "no previous catalog but a changelog exists; treating this run as a new baseline"
        );
    }

    // A changelog that cannot be appended to fails the run with units.json
    // still holding the previous catalog.
    let pending = match &changes {
        Some(changes) if !changes.is_empty() => {
            Some(changelog.prepare().context("reading changelog")?)
        }
        _ => None,
    };

    catalog.save(&units).context("saving catalog")?;
    info!(path = %catalog.path().display(), units = units.len(), "wrote catalog");

    let (baseline, summary, appended) = match changes {
        None => {
            info!("baseline established; changelog not updated");
            (true, ChangeSummary::default(), None)
        }
        Some(changes) => {
            let entry = ChangeLog::new(options.today, changes);
            let summary = entry.summary();
            let outcome = match pending {
                Some(pending) => pending.commit(&entry),
                None => changelog.append(&entry),
            }
            .context("appending changelog")?;
            info!(
                added = summary.added,
                removed = summary.removed,
                modified = summary.modified,
                "compared against previous catalog"
            );
            (false, summary, Some(outcome))
        }
    };

    let icons = match options.fetcher {
        Some(fetcher) => Some(IconCache::new(&paths.icons_dir).fill(&units, fetcher)?),
        None => None,
    };

    Ok(RunReport {
        units: units.len(),
        baseline,
        summary,
        changelog: appended,
        icons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::tests::sample_unit;

    #[test]
    fn absent_or_empty_previous_is_a_baseline() {
        let current = vec![sample_unit("crab")];
        assert!(changes_since(None, &current).is_none());
        assert!(changes_since(Some(&[][..]), &current).is_none());
    }

    #[test]
    fn existing_previous_is_diffed() {
        let old = vec![sample_unit("crab")];
        let current = vec![sample_unit("crab"), sample_unit("wasp")];
        let changes = changes_since(Some(old.as_slice()), &current).unwrap();
        assert_eq!(changes.len(), 1);

        let unchanged = changes_since(Some(old.as_slice()), &old).unwrap();
        assert!(unchanged.is_empty());
    }
}
