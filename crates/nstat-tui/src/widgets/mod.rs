//! Ratatui widgets for the nstat TUI.

pub mod command_bar;
pub mod comparison;
pub mod dashboard;
pub mod help;
pub mod snapshot_list;
pub mod tab_bar;
