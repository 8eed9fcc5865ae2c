//! nstat TUI: ratatui viewer for evaluator stats snapshots.
//!
//! The left pane lists loaded snapshots; the main pane shows either the
//! dashboard for the snapshot under the cursor or the comparison between the
//! chosen baseline and current snapshots.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use nstat_core::{config::Config, SnapshotStore};

/// Start the TUI with the snapshots loaded on the command line.
pub fn run(store: SnapshotStore, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme);
    tracing::debug!(snapshots = store.len(), theme = %config.ui.theme, "starting tui");
    App::new(store, config, theme).run()
}
