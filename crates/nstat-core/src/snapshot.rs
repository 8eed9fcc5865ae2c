//! Snapshots: named, timestamped, normalised stats records held for comparison.
//!
//! [`SnapshotStore`] is an ordered, caller-owned collection. It hands out
//! monotonically increasing [`SnapshotId`]s that are never reused within a
//! session, even after removal. The store does no locking; a concurrent host
//! must serialise mutations itself.

use crate::normalizer::normalize;
use crate::types::StatisticsRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Surrogate identifier of a snapshot within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(pub u64);

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A normalised record together with the raw payload it came from.
///
/// The raw payload is kept so that comparisons can tell "the evaluator did
/// not report this field" apart from "the evaluator reported zero".
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub name: String,
    pub record: StatisticsRecord,
    pub raw: Value,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Normalise `raw` and wrap it as a snapshot stamped with the current time.
    pub fn new(id: SnapshotId, name: impl Into<String>, raw: Value) -> Self {
        Self {
            id,
            name: name.into(),
            record: normalize(&raw),
            raw,
            created_at: Utc::now(),
        }
    }
}

/// Ordered collection of snapshots for one session.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: Vec<Snapshot>,
    next_id: u64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise and append a payload, returning the id assigned to it.
    pub fn add(&mut self, name: impl Into<String>, raw: Value) -> SnapshotId {
        self.next_id += 1;
        let id = SnapshotId(self.next_id);
        let snapshot = Snapshot::new(id, name, raw);
        tracing::debug!(%id, name = %snapshot.name, "snapshot added");
        self.entries.push(snapshot);
        id
    }

    pub fn get(&self, id: SnapshotId) -> Option<&Snapshot> {
        self.entries.iter().find(|s| s.id == id)
    }

    /// Remove a snapshot, preserving the order of the remaining entries.
    pub fn remove(&mut self, id: SnapshotId) -> Option<Snapshot> {
        let pos = self.position(id)?;
        tracing::debug!(%id, "snapshot removed");
        Some(self.entries.remove(pos))
    }

    /// Change the display name of a snapshot. Returns false for an unknown id.
    pub fn rename(&mut self, id: SnapshotId, name: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|s| s.id == id) {
            Some(snapshot) => {
                snapshot.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Index of `id` in insertion order.
    pub fn position(&self, id: SnapshotId) -> Option<usize> {
        self.entries.iter().position(|s| s.id == id)
    }

    /// Snapshot at an insertion-order index.
    pub fn at(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
