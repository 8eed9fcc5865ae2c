//! Canned stats payloads.
//!
//! `BASELINE_STATS` and `CURRENT_STATS` are two runs of the same evaluation
//! where the second one got faster and allocated less, but avoided fewer
//! thunks and dropped the GC and store-I/O sections.

use serde_json::Value;

/// A complete dump with every optional group present.
pub const BASELINE_STATS: &str = r#"{
  "cpuTime": 1.234,
  "time": {
    "cpu": 1.234,
    "gc": 0.2,
    "gcNonIncremental": 0.05,
    "gcFraction": 0.162,
    "gcNonIncrementalFraction": 0.041
  },
  "envs": { "number": 150000, "elements": 300000, "bytes": 4194304 },
  "list": { "elements": 50000, "bytes": 400000, "concats": 1200 },
  "values": { "number": 900000, "bytes": 21600000 },
  "symbols": { "number": 40000, "bytes": 1048576 },
  "sets": { "number": 60000, "elements": 500000, "bytes": 8388608 },
  "sizes": { "Env": 16, "Value": 24, "Bindings": 16, "Attr": 16 },
  "nrExprs": 250000,
  "nrThunks": 400000,
  "nrAvoided": 120000,
  "nrLookups": 180000,
  "nrOpUpdates": 9000,
  "nrOpUpdateValuesCopied": 700000,
  "nrPrimOpCalls": 220000,
  "nrFunctionCalls": 310000,
  "gc": { "heapSize": 402653184, "totalBytes": 1073741824, "cycles": 12 },
  "primops": { "map": 5000, "filter": 3000, "concatLists": 800, "attrNames": 1200 },
  "functions": [
    { "name": "mkDerivation", "file": "/nix/store/lib/customisation.nix", "line": 67, "column": 5, "count": 1800 },
    { "name": null, "file": "/nix/store/lib/attrsets.nix", "line": 12, "column": 9, "count": 9400 },
    { "name": "callPackage", "file": "/nix/store/lib/customisation.nix", "line": 120, "column": 3, "count": 640 }
  ],
  "attributes": [
    { "file": "/nix/store/pkgs/top-level/all-packages.nix", "line": 400, "column": 12, "count": 7300 },
    { "file": "/nix/store/lib/fixed-points.nix", "line": 19, "column": 20, "count": 2100 }
  ],
  "narInfoRead": 10,
  "narRead": 3,
  "narReadBytes": 1048576,
  "narReadCompressedBytes": 400000
}"#;

/// A later run: fewer thunks avoided, less memory, no GC or store-I/O data.
pub const CURRENT_STATS: &str = r#"{
  "cpuTime": 0.987,
  "time": { "cpu": 0.987, "gc": 0.1, "gcNonIncremental": 0, "gcFraction": 0.101, "gcNonIncrementalFraction": 0 },
  "envs": { "number": 150000, "elements": 280000, "bytes": 2097152 },
  "list": { "elements": 50000, "bytes": 400000, "concats": 1100 },
  "values": { "number": 800000, "bytes": 19200000 },
  "symbols": { "number": 40000, "bytes": 1048576 },
  "sets": { "number": 55000, "elements": 480000, "bytes": 7340032 },
  "sizes": { "Env": 16, "Value": 24, "Bindings": 16, "Attr": 16 },
  "nrExprs": 250000,
  "nrThunks": 380000,
  "nrAvoided": 60000,
  "nrLookups": 170000,
  "nrOpUpdates": 8000,
  "nrOpUpdateValuesCopied": 650000,
  "nrPrimOpCalls": 210000,
  "nrFunctionCalls": 300000
}"#;

pub fn baseline_stats() -> Value {
    serde_json::from_str(BASELINE_STATS).expect("BASELINE_STATS is valid JSON")
}

pub fn current_stats() -> Value {
    serde_json::from_str(CURRENT_STATS).expect("CURRENT_STATS is valid JSON")
}

/// Payloads that are valid JSON but carry nothing usable.
pub const DEGENERATE_PAYLOADS: &[&str] = &[
    "{}",
    r#"{"cpuTime": "fast"}"#,
    r#"{"envs": 7, "list": [], "values": null}"#,
    r#"{"gc": {"heapSize": 1}}"#,
    r#"{"functions": "none", "attributes": {}}"#,
    r#"{"primops": {"map": "many"}}"#,
];
