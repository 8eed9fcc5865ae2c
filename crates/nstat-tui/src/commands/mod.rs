// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use nstat_core::{PresencePolicy, SnapshotId};
use std::path::PathBuf;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    // Change theme
    Theme(String),
    // Read a stats file and add it as a snapshot
    Load(PathBuf),
    // Add a snapshot from JSON typed into the bar
    Paste(String),
    // Rename the snapshot under the cursor
    Rename(String),
    Baseline(SnapshotId),
    Current(SnapshotId),
    // Delete by id, or the snapshot under the cursor
    Delete(Option<SnapshotId>),
    // Swap baseline and current
    Swap,
    Presence(PresencePolicy),
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "swap" => Ok(Command::Swap),
            "theme" => non_empty(rest, "usage: theme <default|gruvbox>").map(Command::Theme),
            "load" | "e" => non_empty(rest, "usage: load <path>")
                .map(|p| Command::Load(PathBuf::from(p))),
            "paste" => non_empty(rest, "usage: paste <json>").map(Command::Paste),
            "rename" => non_empty(rest, "usage: rename <name>").map(Command::Rename),
            "baseline" | "b" => parse_id(rest).map(Command::Baseline),
            "current" | "c" => parse_id(rest).map(Command::Current),
            "delete" | "d" => {
                if rest.is_empty() {
                    Ok(Command::Delete(None))
                } else {
                    parse_id(rest).map(|id| Command::Delete(Some(id)))
                }
            }
            "presence" => match rest {
                "reported" => Ok(Command::Presence(PresencePolicy::Reported)),
                "typed" => Ok(Command::Presence(PresencePolicy::Typed)),
                _ => Err("usage: presence <reported|typed>".to_string()),
            },
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn non_empty(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(usage.to_string())
    } else {
        Ok(rest.to_string())
    }
}

/// Accepts `3` or `#3`.
fn parse_id(rest: &str) -> Result<SnapshotId, String> {
    rest.trim_start_matches('#')
        .parse::<u64>()
        .map(SnapshotId)
        .map_err(|_| format!("not a snapshot id: {rest:?}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
