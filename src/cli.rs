//! Command-line surface of the `nstat` binary.
//!
//! [`run`] holds all the behaviour so the harness tests can drive it with
//! in-memory writers; `main` only parses arguments, sets up logging, and
//! exits with the returned code.

use anyhow::bail;
use clap::{CommandFactory, Parser};
use nstat_core::config::Config;
use nstat_core::report::{render_comparison, render_report};
use nstat_core::source::Source;
use nstat_core::{diff_with_policy, normalize, SnapshotStore};
use std::io::Write;

#[derive(Debug, Parser)]
#[command(
    name = "nstat",
    version,
    about = "Nix evaluator statistics: terminal report, dashboard, and snapshot comparison"
)]
pub struct Cli {
    /// Stats JSON files written by the evaluator (`-` reads stdin).
    pub files: Vec<String>,

    /// Compare two files: the first is the baseline, the second the current run.
    #[arg(long)]
    pub compare: bool,

    /// Print the normalised record as JSON instead of the report.
    #[arg(long, conflicts_with_all = ["compare", "tui"])]
    pub json: bool,

    /// Open the interactive dashboard with every file loaded as a snapshot.
    #[arg(long, conflicts_with = "compare")]
    pub tui: bool,

    /// Write debug logs to /tmp/nstat-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,
}

/// Run the CLI and return the process exit code.
///
/// Failures are written to `err` as `Error: <message>` with exit code 1.
pub fn run(cli: Cli, config: Config, out: &mut impl Write, err: &mut impl Write) -> i32 {
    match execute(cli, config, out) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            let _ = writeln!(err, "Error: {e}");
            1
        }
    }
}

fn execute(cli: Cli, config: Config, out: &mut impl Write) -> anyhow::Result<i32> {
    if cli.tui {
        let store = load_all(&cli.files)?;
        nstat_tui::run(store, config)?;
        return Ok(0);
    }

    match (cli.compare, cli.files.as_slice()) {
        (_, []) => {
            writeln!(out, "{}", Cli::command().render_usage())?;
            writeln!(out, "\nRun `nstat --help` for options.")?;
            Ok(1)
        }
        (true, [_, _]) => {
            let store = load_all(&cli.files)?;
            let (Some(baseline), Some(current)) = (store.at(0), store.at(1)) else {
                bail!("failed to load both snapshots");
            };
            let rows = diff_with_policy(baseline, current, config.compare.presence);
            write!(out, "{}", render_comparison(baseline, current, &rows))?;
            Ok(0)
        }
        (true, files) => bail!("--compare takes exactly two files, got {}", files.len()),
        (false, [file]) => {
            let raw = Source::from_arg(file).read()?;
            let record = normalize(&raw);
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                write!(out, "{}", render_report(&record))?;
            }
            Ok(0)
        }
        (false, files) => bail!(
            "expected one file, got {}; use --compare for two or --tui for more",
            files.len()
        ),
    }
}

/// Fall back to the built-in defaults when the user config cannot be loaded,
/// with a one-line warning on `err`.
pub fn config_or_defaults(loaded: anyhow::Result<Config>, err: &mut impl Write) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "config load failed, using defaults");
        let _ = writeln!(err, "Warning: ignoring invalid config ({e:#}); using defaults");
        Config::defaults()
    })
}

/// Read every argument into a fresh store, named after its source.
fn load_all(files: &[String]) -> anyhow::Result<SnapshotStore> {
    let mut store = SnapshotStore::new();
    for arg in files {
        let source = Source::from_arg(arg);
        let raw = source.read()?;
        store.add(source.label(), raw);
    }
    Ok(store)
}
