//! nstat: Nix evaluator statistics.
//!
//! The binary is a thin wrapper over [`cli::run`]; the stats model lives in
//! `nstat-core` and the interactive viewer in `nstat-tui`.
//!
//! # Architecture
//!
//! ```text
//! file / stdin ──► Source ──► normalize ──► report (stdout)
//!                                  │
//!                                  └──► SnapshotStore ──► diff ──► comparison / TUI
//! ```

pub mod cli;
