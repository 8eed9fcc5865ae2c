//! Test builders: ergonomic constructors for stats payloads and snapshots.
//!
//! These are for readability in assertions, not production use. They panic on
//! invalid input rather than returning `Result`.

use nstat_core::{Snapshot, SnapshotId, SnapshotStore};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// StatsJsonBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for raw stats payloads.
///
/// # Example
///
/// ```rust
/// let raw = StatsJsonBuilder::new()
///     .set("envs.bytes", 2048)
///     .gc(1024, 4096, 3)
///     .primop("map", 12)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct StatsJsonBuilder {
    root: Map<String, Value>,
}

impl StatsJsonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dotted path, creating intermediate objects.
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop().expect("path must not be empty");
        let mut node = &mut self.root;
        for segment in segments {
            node = node
                .entry(segment)
                .or_insert_with(|| json!({}))
                .as_object_mut()
                .unwrap_or_else(|| panic!("{segment} is not an object"));
        }
        node.insert(last.to_string(), value.into());
        self
    }

    pub fn gc(self, heap_size: u64, total_bytes: u64, cycles: u64) -> Self {
        self.set("gc", json!({ "heapSize": heap_size, "totalBytes": total_bytes, "cycles": cycles }))
    }

    pub fn primop(self, name: &str, count: u64) -> Self {
        self.set(&format!("primops.{name}"), count)
    }

    pub fn function(mut self, name: Option<&str>, file: &str, line: u64, count: u64) -> Self {
        let site = json!({ "name": name, "file": file, "line": line, "column": 1, "count": count });
        self.root
            .entry("functions")
            .or_insert_with(|| json!([]))
            .as_array_mut()
            .expect("functions is an array")
            .push(site);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.root)
    }
}

// ---------------------------------------------------------------------------
// Snapshot helpers
// ---------------------------------------------------------------------------

/// A store holding `baseline` then `current`, with their ids.
pub fn store_with_pair(baseline: Value, current: Value) -> (SnapshotStore, SnapshotId, SnapshotId) {
    let mut store = SnapshotStore::new();
    let b = store.add("baseline", baseline);
    let c = store.add("current", current);
    (store, b, c)
}

/// A standalone snapshot, for tests that do not need a store.
pub fn snapshot(name: &str, raw: Value) -> Snapshot {
    Snapshot::new(SnapshotId(0), name, raw)
}
