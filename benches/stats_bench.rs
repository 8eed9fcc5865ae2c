//! Stats pipeline benchmarks.
//!
//! Dumps from large evaluations carry thousands of function and attribute
//! call sites, and the TUI re-runs the differ on every frame of the compare
//! view, so both paths are measured here.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `normalize` | Minimal payload, full payload, and a payload with large call-site lists |
//! | `diff` | Comparing two snapshots under each presence policy |
//! | `report` | Rendering the single-file report and the comparison table |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench stats_bench
//! open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nstat_core::report::{render_comparison, render_report};
use nstat_core::{diff_with_policy, normalize, PresencePolicy, SnapshotStore};
use serde_json::{json, Value};
use std::hint::black_box;

fn full_payload(scale: f64) -> Value {
    json!({
        "cpuTime": 1.234 * scale,
        "time": { "cpu": 1.234 * scale, "gc": 0.2, "gcFraction": 0.16 },
        "envs": { "number": 200_000.0 * scale, "elements": 320_000, "bytes": 4_194_304.0 * scale },
        "list": { "elements": 50_000, "concats": 1200, "bytes": 400_000 },
        "values": { "number": 900_000, "bytes": 21_600_000 },
        "symbols": { "number": 40_000, "bytes": 1_048_576 },
        "sets": { "number": 90_000, "elements": 1_000_000, "bytes": 8_388_608 },
        "sizes": { "Env": 16, "Value": 24, "Bindings": 16, "Attr": 24 },
        "nrExprs": 250_000,
        "nrThunks": 400_000.0 * scale,
        "nrAvoided": 120_000,
        "nrLookups": 300_000,
        "nrFunctionCalls": 180_000,
        "nrPrimOpCalls": 95_000,
        "gc": { "heapSize": 402_653_184, "totalBytes": 1_073_741_824, "cycles": 12 },
        "primops": { "map": 20_000, "filter": 3000, "elem": 800, "concatLists": 150 },
        "narRead": 3,
        "narReadBytes": 1_048_576,
    })
}

fn with_call_sites(sites: usize) -> Value {
    let mut raw = full_payload(1.0);
    raw["functions"] = (0..sites)
        .map(|i| json!({ "name": format!("f{i}"), "file": "lib/default.nix", "line": i, "column": 3, "count": i * 7 }))
        .collect();
    raw["attributes"] = (0..sites)
        .map(|i| json!({ "file": "pkgs/top-level/all-packages.nix", "line": i, "column": 5, "count": i * 3 }))
        .collect();
    raw
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

fn normalize_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(1));

    let minimal = json!({ "cpuTime": 0.5, "nrThunks": 10 });
    group.bench_function("minimal", |b| b.iter(|| normalize(black_box(&minimal))));

    let full = full_payload(1.0);
    group.bench_function("full", |b| b.iter(|| normalize(black_box(&full))));

    for sites in [100usize, 10_000] {
        let raw = with_call_sites(sites);
        group.bench_with_input(BenchmarkId::new("call_sites", sites), &raw, |b, raw| {
            b.iter(|| normalize(black_box(raw)))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Differ
// ---------------------------------------------------------------------------

fn diff_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    let mut store = SnapshotStore::new();
    let before = store.add("before", full_payload(1.0));
    let after = store.add("after", full_payload(0.8));
    let (Some(before), Some(after)) = (store.get(before), store.get(after)) else {
        return;
    };

    for (name, policy) in [("reported", PresencePolicy::Reported), ("typed", PresencePolicy::Typed)] {
        group.bench_function(name, |b| {
            b.iter(|| diff_with_policy(black_box(before), black_box(after), policy))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

fn report_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    let record = normalize(&full_payload(1.0));
    group.bench_function("single", |b| b.iter(|| render_report(black_box(&record))));

    let mut store = SnapshotStore::new();
    let before = store.add("before", full_payload(1.0));
    let after = store.add("after", full_payload(0.8));
    let (Some(before), Some(after)) = (store.get(before), store.get(after)) else {
        return;
    };
    let rows = diff_with_policy(before, after, PresencePolicy::Reported);
    group.bench_function("comparison", |b| {
        b.iter(|| render_comparison(black_box(before), black_box(after), black_box(&rows)))
    });

    group.finish();
}

criterion_group!(benches, normalize_bench, diff_bench, report_bench);
criterion_main!(benches);
