//! nstat-core: evaluator statistics core library.
//!
//! Turns a JSON stats dump from the evaluator into a complete, typed
//! [`StatisticsRecord`] and compares two such records field by field.
//!
//! # Data flow
//!
//! ```text
//! raw JSON ──► normalize ──► StatisticsRecord ──► Snapshot ──► diff ──► ComparisonRow
//!                                  │
//!                                  └──► report / analysis (dashboard)
//! ```
//!
//! Nothing here performs terminal I/O; [`source`] is the only module that
//! reads from the filesystem or stdin.

pub mod analysis;
pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod metrics;
pub mod normalizer;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod types;

pub use diff::{diff, diff_with_policy, ComparisonRow, ComparisonSummary, PresencePolicy, Verdict};
pub use error::LoadError;
pub use normalizer::normalize;
pub use snapshot::{Snapshot, SnapshotId, SnapshotStore};
pub use types::StatisticsRecord;
