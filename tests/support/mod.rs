use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use unit_tracker::TrackerPaths;

/// Temporary tracker layout (`src/data`, `public/icons`) under one root.
pub struct Workspace {
    pub dir: TempDir,
    pub paths: TrackerPaths,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let paths = TrackerPaths::under(dir.path());
        fs::create_dir_all(&paths.data_dir).expect("create data dir");
        Self { dir, paths }
    }

    pub fn write_unlock_costs(&self, costs: Value) {
        write_json(&self.paths.unlock_costs_path(), &costs);
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|err| panic!("reading {}: {err}", path.display()))
    }
}

pub fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, serde_json::to_string_pretty(value).expect("encode")).expect("write json");
}

/// Current-schema raw unit as the page publishes it.
pub fn raw_unit(slug: &str, health: u32) -> Value {
    json!({
        "name": capitalize(slug),
        "slug": slug,
        "techTier": {"name": "Core"},
        "unitDomain": {"slug": "ground"},
        "targetsAir": false,
        "targetsGround": true,
        "statHealth": health,
        "statDamage": 2,
        "statSpeed": 3,
        "statRange": 2,
        "costMatter": 50,
        "costEnergy": 0,
        "costBandwidth": 1,
        "unitAbility": null,
        "unitTraits": [{"name": "Small", "slug": "small"}],
        "unitCounters": [],
        "unitCounteredBy": [{"name": "Splash", "slug": "splash"}]
    })
}

/// Wrap raw units the way the page's data blob nests them.
pub fn page_document(units: Vec<Value>) -> Value {
    json!({
        "buildId": "fixture",
        "props": {"pageProps": {"units": units}}
    })
}

fn capitalize(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
