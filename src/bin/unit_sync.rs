//! Runs one tracker pass and prints the run report as JSON.
//!
//! Reads the already-extracted page document (`--input PATH` or `-` for
//! stdin), normalizes it, replaces `units.json`, appends any changes to
//! `changelog.json`, and optionally downloads missing icons over HTTP.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use std::env;
use std::path::PathBuf;
use unit_tracker::logging;
use unit_tracker::{AssetFetcher, HttpFetcher, InputSource, RunOptions, TrackerPaths, run};

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let cli = Cli::parse()?;
    logging::init(cli.log_level.as_deref());

    let paths = TrackerPaths::resolve(cli.data_dir.as_deref(), cli.icons_dir.as_deref());
    let http = if cli.fetch_icons {
        Some(HttpFetcher::new()?)
    } else {
        None
    };
    let fetcher = http.as_ref().map(|http| http as &dyn AssetFetcher);
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());

    let report = run(
        &cli.input,
        &RunOptions {
            paths: &paths,
            today,
            fetcher,
        },
    )?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

struct Cli {
    input: InputSource,
    data_dir: Option<PathBuf>,
    icons_dir: Option<PathBuf>,
    fetch_icons: bool,
    date: Option<NaiveDate>,
    log_level: Option<String>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut input = None;
        let mut data_dir = None;
        let mut icons_dir = None;
        let mut fetch_icons = false;
        let mut date = None;
        let mut log_level = None;

        while let Some(arg) = args.next() {
            let arg = arg
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--input" => input = Some(InputSource::from_arg(&next_value(&mut args, "--input")?)),
                "--data-dir" => data_dir = Some(next_path(&mut args, "--data-dir")?),
                "--icons-dir" => icons_dir = Some(next_path(&mut args, "--icons-dir")?),
                "--fetch-icons" => fetch_icons = true,
                "--date" => {
                    let raw = next_value(&mut args, "--date")?;
                    let parsed = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .with_context(|| format!("--date must be YYYY-MM-DD, got {raw}"))?;
                    date = Some(parsed);
                }
                "--log-level" => log_level = Some(next_value(&mut args, "--log-level")?),
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        let input = input.ok_or_else(|| anyhow!("--input is required (use '-' for stdin)"))?;
        Ok(Self {
            input,
            data_dir,
            icons_dir,
            fetch_icons,
            date,
            log_level,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?
        .into_string()
        .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?;
    if value.is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(value)
}

fn next_path(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<PathBuf> {
    next_value(args, flag).map(PathBuf::from)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: unit-sync --input PATH|- [--data-dir DIR] [--icons-dir DIR] [--fetch-icons] [--date YYYY-MM-DD] [--log-level FILTER]\n\nOptions:\n  --input PATH|-            Page data document (JSON) to ingest; '-' reads stdin.\n  --data-dir DIR            Directory holding units.json, changelog.json, warcredits.json (or set UNIT_TRACKER_DATA_DIR).\n  --icons-dir DIR           Icon cache directory (or set UNIT_TRACKER_ICONS_DIR).\n  --fetch-icons             Download missing icons over HTTP.\n  --date YYYY-MM-DD         Date stamped on the changelog entry (default: today).\n  --log-level FILTER        tracing filter, e.g. 'debug' (default: RUST_LOG or 'info').\n  --help                    Show this help text."
    );
    std::process::exit(code);
}
