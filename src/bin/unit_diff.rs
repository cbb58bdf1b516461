//! Compares two stored catalogs and streams the changes as NDJSON.
//!
//! Each line is one change in differ order (removals first). With `--brief`
//! a line carries only the kind, slug, and changed fields instead of the full
//! before/after units. Neither catalog file is modified.

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use unit_tracker::{CatalogStore, ChangeKind, ChangeSummary, FieldChange, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct BriefChange<'a> {
    kind: ChangeKind,
    slug: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldChange>,
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    logging::init(None);

    let old = CatalogStore::new(&cli.old)
        .load_existing()
        .with_context(|| format!("loading {}", cli.old.display()))?
        .unwrap_or_default();
    let new = CatalogStore::new(&cli.new)
        .load()
        .with_context(|| format!("loading {}", cli.new.display()))?;

    let changes = unit_tracker::diff(&old, &new);
    for change in &changes {
        let line = if cli.brief {
            let (Some(kind), Some(slug)) = (change.kind(), change.slug()) else {
                continue;
            };
            serde_json::to_string(&BriefChange {
                kind,
                slug: slug.as_str(),
                fields: change.field_changes(),
            })?
        } else {
            serde_json::to_string(change)?
        };
        println!("{line}");
    }

    let summary = ChangeSummary::of(&changes);
    tracing::info!(
        added = summary.added,
        removed = summary.removed,
        modified = summary.modified,
        "diff complete"
    );
    Ok(())
}

struct Cli {
    old: PathBuf,
    new: PathBuf,
    brief: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut old = None;
        let mut new = None;
        let mut brief = false;

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--old" => old = Some(next_path("--old", &mut args)?),
                "--new" => new = Some(next_path("--new", &mut args)?),
                "--brief" => brief = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self {
            old: old.ok_or_else(|| anyhow!("--old is required"))?,
            new: new.ok_or_else(|| anyhow!("--new is required"))?,
            brief,
        })
    }
}

fn next_path(flag: &str, args: &mut env::ArgsOs) -> Result<PathBuf> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?;
    let path = PathBuf::from(
        value
            .into_string()
            .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?,
    );
    if path.as_os_str().is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(path)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: unit-diff --old PATH --new PATH [--brief]\n\nOptions:\n  --old PATH                Previous catalog (a missing file counts as empty).\n  --new PATH                Current catalog.\n  --brief                   Print kind, slug, and changed fields instead of full units.\n  --help                    Show this help text."
    );
    std::process::exit(code);
}
