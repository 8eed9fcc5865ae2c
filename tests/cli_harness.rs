#![allow(unused)]
//! CLI integration harness.
//!
//! # What this covers
//!
//! - **Exit codes**: 0 after a report or comparison, 1 for missing arguments
//!   and for unreadable or invalid input.
//! - **Streams**: usage goes to stdout, `Error: <message>` to stderr, and
//!   nothing partial is printed on failure.
//! - **Modes**: report, `--json`, and `--compare`, driven through
//!   [`nstat::cli::run`] with files written to a temp dir.
//!
//! # What this does NOT cover
//!
//! - `--tui` (needs a terminal)
//! - `--debug` log file setup, which lives in `main`
//!
//! # Running
//!
//! ```sh
//! cargo test --test cli_harness
//! ```

mod common;
use clap::Parser;
use common::*;
use nstat::cli::{run, Cli};
use nstat_core::config::Config;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

struct Outcome {
    code: i32,
    stdout: String,
    stderr: String,
}

fn nstat(args: &[&str]) -> Outcome {
    let cli = Cli::try_parse_from(std::iter::once("nstat").chain(args.iter().copied()))
        .expect("arguments parse");
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run(cli, Config::defaults(), &mut out, &mut err);
    Outcome {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path: PathBuf = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let o = nstat(&[]);
    assert_eq!(o.code, 1);
    assert!(o.stdout.contains("Usage: nstat"), "stdout was {:?}", o.stdout);
    assert_eq!(o.stderr, "");
}

#[test]
fn single_file_prints_report() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "run.json", BASELINE_STATS);
    let o = nstat(&[&path]);
    assert_eq!(o.code, 0);
    assert!(o.stdout.starts_with("=== Nix Evaluator Statistics ===\n"));
    assert!(o.stdout.contains("Thunks:       400,000"));
    assert_eq!(o.stderr, "");
}

#[test]
fn json_flag_prints_normalised_record() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "run.json", r#"{"nrThunks": 9, "gc": {"heapSize": 1}}"#);
    let o = nstat(&["--json", &path]);
    assert_eq!(o.code, 0);
    let value: serde_json::Value = serde_json::from_str(&o.stdout).unwrap();
    assert_eq!(value["nrThunks"], serde_json::json!(9.0));
    assert_eq!(value["envs"]["bytes"], serde_json::json!(0.0));
    assert!(value.get("gc").is_none());
}

#[test]
fn compare_prints_table_named_after_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "main.json", BASELINE_STATS);
    let b = write(&dir, "feature.json", CURRENT_STATS);
    let o = nstat(&["--compare", &a, &b]);
    assert_eq!(o.code, 0, "stderr was {:?}", o.stderr);
    assert!(o.stdout.starts_with("=== Comparison: main → feature ===\n"));
    assert!(o.stdout.contains("11 improved, 1 regressed, 4 unchanged, 4 unavailable"));
}

#[test]
fn compare_needs_two_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.json", "{}");
    let o = nstat(&["--compare", &a]);
    assert_eq!(o.code, 1);
    assert_eq!(o.stdout, "");
    assert_eq!(o.stderr, "Error: --compare takes exactly two files, got 1\n");
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");
    let o = nstat(&[path.to_str().unwrap()]);
    assert_eq!(o.code, 1);
    assert_eq!(o.stdout, "");
    assert!(o.stderr.starts_with("Error: failed to read "), "stderr was {:?}", o.stderr);
    assert!(o.stderr.contains("nope.json"));
}

#[test]
fn invalid_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", "{ not json");
    let o = nstat(&[&path]);
    assert_eq!(o.code, 1);
    assert_eq!(o.stdout, "");
    assert!(o.stderr.starts_with("Error: invalid JSON"), "stderr was {:?}", o.stderr);
}

#[test]
fn top_level_array_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "list.json", "[1, 2, 3]");
    let o = nstat(&[&path]);
    assert_eq!(o.code, 1);
    assert_eq!(
        o.stderr,
        "Error: expected a JSON object at the top level, found an array\n"
    );
}

#[test]
fn failed_comparison_prints_nothing_on_stdout() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.json", BASELINE_STATS);
    let b = write(&dir, "b.json", "oops");
    let o = nstat(&["--compare", &a, &b]);
    assert_eq!(o.code, 1);
    assert_eq!(o.stdout, "");
}
