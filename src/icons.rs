//! Local icon cache keyed by unit slug.
//!
//! Filling the cache is idempotent: a unit whose `{slug}.png` already exists
//! is skipped without asking the fetcher, and there is no freshness check.
//! Downloading is delegated to an [`AssetFetcher`]; [`HttpFetcher`] is the
//! network-backed one.

use crate::catalog::Unit;
use crate::persist::write_bytes_atomic;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Retrieves the bytes behind a URL.
pub trait AssetFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// User agent sent with icon downloads.
pub const USER_AGENT: &str = concat!("unit-tracker/", env!("CARGO_PKG_VERSION"));

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
/// Blocking HTTP fetcher for icon assets.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to download {url}"))?;
        if !response.status().is_success() {
            bail!("Download failed: HTTP {} for {}", response.status(), url);
        }
        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
/// Outcome of one cache-fill pass.
pub struct IconReport {
    pub downloaded: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache path for a unit's icon.
    pub fn icon_path(&self, unit: &Unit) -> PathBuf {
        self.dir.join(format!("{}.png", unit.slug))
    }

    /// Download the icon of every unit that is not cached yet.
    ///
    /// Stops at the first failed download or unsafe slug; icons fetched
    /// before the failure stay cached.
    pub fn fill(&self, units: &[Unit], fetcher: &dyn AssetFetcher) -> Result<IconReport> {
        let mut report = IconReport::default();
        for unit in units {
            if !unit.slug.is_url_safe() {
                bail!("refusing to cache icon for unsafe slug '{}'", unit.slug);
            }
            let path = self.icon_path(unit);
            if path.exists() {
                debug!(slug = %unit.slug, "icon exists");
                report.skipped.push(unit.slug.to_string());
                continue;
            }
            let bytes = fetcher
                .fetch_bytes(&unit.icon_url)
                .with_context(|| format!("downloading icon for '{}'", unit.slug))?;
            write_bytes_atomic(&path, &bytes)?;
            debug!(slug = %unit.slug, bytes = bytes.len(), "icon downloaded");
            report.downloaded.push(unit.slug.to_string());
        }
        info!(
            dir = %self.dir.display(),
            downloaded = report.downloaded.len(),
            skipped = report.skipped.len(),
            "icon cache filled"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::tests::sample_unit;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingFetcher {
        urls: RefCell<Vec<String>>,
    }

    impl AssetFetcher for RecordingFetcher {
        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(url.as_bytes().to_vec())
        }
    }

    struct FailingFetcher;

    impl AssetFetcher for FailingFetcher {
        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
            bail!("offline: {url}")
        }
    }

    #[test]
    fn skips_cached_icons_without_fetching() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path().join("icons"));
        let units = vec![sample_unit("crab"), sample_unit("wasp")];
        fs::create_dir_all(cache.dir()).unwrap();
        fs::write(cache.icon_path(&units[0]), b"cached").unwrap();

        let fetcher = RecordingFetcher::default();
        let report = cache.fill(&units, &fetcher).unwrap();
        assert_eq!(report.skipped, vec!["crab".to_string()]);
        assert_eq!(report.downloaded, vec!["wasp".to_string()]);
        assert_eq!(
            fetcher.urls.borrow().as_slice(),
            ["https://cdn.playbattleaces.com/images/icons/units/wasp.png".to_string()]
        );
        assert_eq!(fs::read(cache.icon_path(&units[0])).unwrap(), b"cached");
    }

    #[test]
    fn second_fill_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path());
        let units = vec![sample_unit("crab")];
        cache.fill(&units, &RecordingFetcher::default()).unwrap();

        let fetcher = RecordingFetcher::default();
        let report = cache.fill(&units, &fetcher).unwrap();
        assert!(report.downloaded.is_empty());
        assert!(fetcher.urls.borrow().is_empty());
    }

    #[test]
    fn unsafe_slug_never_leaves_the_cache_dir() {
        let root = TempDir::new().unwrap();
        let cache = IconCache::new(root.path().join("public").join("icons"));
        let fetcher = RecordingFetcher::default();
        let err = cache
            .fill(&[sample_unit("../../escape")], &fetcher)
            .unwrap_err();
        assert!(err.to_string().contains("unsafe slug"));
        assert!(fetcher.urls.borrow().is_empty());
        assert!(!root.path().join("escape.png").exists());
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("unit-tracker/"));
        assert!(HttpFetcher::new().is_ok());
    }

    #[test]
    fn fetch_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path());
        let err = cache.fill(&[sample_unit("crab")], &FailingFetcher).unwrap_err();
        assert!(format!("{err:#}").contains("crab"));
        assert!(!cache.icon_path(&sample_unit("crab")).exists());
    }
}
