//! Where the tracker keeps its files.
//!
//! Resolution order for each location: explicit CLI override, then the
//! environment variable, then the default relative to the working directory.
//! The defaults match the layout of the site repository the tracker feeds
//! (`src/data` for JSON, `public/icons` for images).

use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "UNIT_TRACKER_DATA_DIR";
pub const ICONS_DIR_ENV: &str = "UNIT_TRACKER_ICONS_DIR";

pub const DEFAULT_DATA_DIR: &str = "src/data";
pub const DEFAULT_ICONS_DIR: &str = "public/icons";

pub const CATALOG_FILE: &str = "units.json";
pub const CHANGELOG_FILE: &str = "changelog.json";
pub const UNLOCK_COSTS_FILE: &str = "warcredits.json";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Resolved file locations for one run.
pub struct TrackerPaths {
    pub data_dir: PathBuf,
    pub icons_dir: PathBuf,
}

impl TrackerPaths {
    /// Resolve locations from overrides and the process environment.
    pub fn resolve(data_dir: Option<&Path>, icons_dir: Option<&Path>) -> Self {
        Self::resolve_with(data_dir, icons_dir, |name| env::var_os(name).map(PathBuf::from))
    }

    /// Resolution with an injectable environment lookup.
    pub fn resolve_with(
        data_dir: Option<&Path>,
        icons_dir: Option<&Path>,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> Self {
        let pick = |explicit: Option<&Path>, var: &str, default: &str| {
            explicit
                .map(Path::to_path_buf)
                .or_else(|| lookup(var).filter(|p| !p.as_os_str().is_empty()))
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            data_dir: pick(data_dir, DATA_DIR_ENV, DEFAULT_DATA_DIR),
            icons_dir: pick(icons_dir, ICONS_DIR_ENV, DEFAULT_ICONS_DIR),
        }
    }

    /// Everything rooted under one directory; used by tests and tools.
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.join(DEFAULT_DATA_DIR),
            icons_dir: root.join(DEFAULT_ICONS_DIR),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.data_dir.join(CHANGELOG_FILE)
    }

    pub fn unlock_costs_path(&self) -> PathBuf {
        self.data_dir.join(UNLOCK_COSTS_FILE)
    }
}
