//! Normalizer: turns an untyped evaluator stats dump into a [`StatisticsRecord`].
//!
//! Normalisation never fails. A missing or mistyped numeric field becomes `0`;
//! an optional group (`gc`, `primops`, `functions`, `attributes`) is kept only
//! when every part of it is well-typed, otherwise it is dropped as a whole.
//! Store-I/O counters are kept or dropped one field at a time.
//!
//! No range validation is performed: negative or very large numbers pass
//! through unchanged.

use crate::types::{
    AttributeCallSite, EnvStats, FunctionCallSite, GcStats, ListStats, PoolStats, SetStats,
    StatisticsRecord, StoreIo, StructureSizes, TimeStats,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

type Object = Map<String, Value>;

/// Normalise a raw stats dump. Non-object input yields an all-default record.
pub fn normalize(raw: &Value) -> StatisticsRecord {
    let root = raw.as_object();
    let time = section(root, "time");
    let envs = section(root, "envs");
    let list = section(root, "list");
    let values = section(root, "values");
    let symbols = section(root, "symbols");
    let sets = section(root, "sets");
    let sizes = section(root, "sizes");

    let cpu_time = num(root, "cpuTime");

    StatisticsRecord {
        cpu_time,
        time: TimeStats {
            // A flat `cpuTime` stands in for `time.cpu` when the evaluator
            // did not report the nested value.
            cpu: opt_num(time, "cpu").unwrap_or(cpu_time),
            gc: num(time, "gc"),
            gc_non_incremental: num(time, "gcNonIncremental"),
            gc_fraction: num(time, "gcFraction"),
            gc_non_incremental_fraction: num(time, "gcNonIncrementalFraction"),
        },
        envs: EnvStats {
            number: num(envs, "number"),
            elements: num(envs, "elements"),
            bytes: num(envs, "bytes"),
        },
        list: ListStats {
            elements: num(list, "elements"),
            bytes: num(list, "bytes"),
            concats: num(list, "concats"),
        },
        values: PoolStats {
            number: num(values, "number"),
            bytes: num(values, "bytes"),
        },
        symbols: PoolStats {
            number: num(symbols, "number"),
            bytes: num(symbols, "bytes"),
        },
        sets: SetStats {
            number: num(sets, "number"),
            elements: num(sets, "elements"),
            bytes: num(sets, "bytes"),
        },
        sizes: StructureSizes {
            env: num(sizes, "Env"),
            value: num(sizes, "Value"),
            bindings: num(sizes, "Bindings"),
            attr: num(sizes, "Attr"),
        },
        nr_exprs: num(root, "nrExprs"),
        nr_thunks: num(root, "nrThunks"),
        nr_avoided: num(root, "nrAvoided"),
        nr_lookups: num(root, "nrLookups"),
        nr_op_updates: num(root, "nrOpUpdates"),
        nr_op_update_values_copied: num(root, "nrOpUpdateValuesCopied"),
        nr_prim_op_calls: num(root, "nrPrimOpCalls"),
        nr_function_calls: num(root, "nrFunctionCalls"),
        gc: optional_group(root, "gc", parse_gc),
        primops: optional_group(root, "primops", parse_primops),
        functions: optional_group(root, "functions", parse_functions),
        attributes: optional_group(root, "attributes", parse_attributes),
        store: parse_store_io(root),
    }
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

fn section<'a>(obj: Option<&'a Object>, key: &str) -> Option<&'a Object> {
    obj?.get(key)?.as_object()
}

fn opt_num(obj: Option<&Object>, key: &str) -> Option<f64> {
    obj?.get(key)?.as_f64()
}

fn num(obj: Option<&Object>, key: &str) -> f64 {
    opt_num(obj, key).unwrap_or(0.0)
}

/// Run `parse` on `root[key]` if the key is present. A present-but-malformed
/// group is logged and dropped.
fn optional_group<T>(
    root: Option<&Object>,
    key: &str,
    parse: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = root?.get(key)?;
    let parsed = parse(value);
    if parsed.is_none() {
        tracing::debug!(group = key, "dropping malformed optional group");
    }
    parsed
}

// ---------------------------------------------------------------------------
// Optional groups
// ---------------------------------------------------------------------------

fn parse_gc(value: &Value) -> Option<GcStats> {
    let gc = value.as_object();
    Some(GcStats {
        heap_size: opt_num(gc, "heapSize")?,
        total_bytes: opt_num(gc, "totalBytes")?,
        cycles: opt_num(gc, "cycles")?,
    })
}

fn parse_primops(value: &Value) -> Option<BTreeMap<String, f64>> {
    value
        .as_object()?
        .iter()
        .map(|(name, count)| Some((name.clone(), count.as_f64()?)))
        .collect()
}

fn parse_functions(value: &Value) -> Option<Vec<FunctionCallSite>> {
    value
        .as_array()?
        .iter()
        .map(|site| {
            let site = site.as_object()?;
            Some(FunctionCallSite {
                name: optional_field(site, "name", |v| v.as_str().map(str::to_string))?,
                file: optional_field(site, "file", |v| v.as_str().map(str::to_string))?,
                line: optional_field(site, "line", Value::as_u64)?,
                column: optional_field(site, "column", Value::as_u64)?,
                count: site.get("count")?.as_f64()?,
            })
        })
        .collect()
}

fn parse_attributes(value: &Value) -> Option<Vec<AttributeCallSite>> {
    value
        .as_array()?
        .iter()
        .map(|site| {
            let site = site.as_object()?;
            Some(AttributeCallSite {
                file: optional_field(site, "file", |v| v.as_str().map(str::to_string))?,
                line: optional_field(site, "line", Value::as_u64)?,
                column: optional_field(site, "column", Value::as_u64)?,
                count: site.get("count")?.as_f64()?,
            })
        })
        .collect()
}

/// A call-site key that may be left out. Absent or `null` is `Some(None)`;
/// present with the wrong type is `None`, which drops the whole list.
fn optional_field<T>(
    site: &Object,
    key: &str,
    get: impl Fn(&Value) -> Option<T>,
) -> Option<Option<T>> {
    match site.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(value) => get(value).map(Some),
    }
}

fn parse_store_io(root: Option<&Object>) -> StoreIo {
    let mut store = StoreIo::default();
    for key in StoreIo::KEYS {
        if let Some(slot) = store.slot_mut(key) {
            *slot = opt_num(root, key);
        }
    }
    store
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_object_is_all_defaults() {
        let record = normalize(&json!({}));
        assert_eq!(record, StatisticsRecord::default());
        assert!(record.gc.is_none());
        assert!(record.primops.is_none());
        assert!(record.store.is_empty());
    }

    #[test]
    fn non_object_input_is_all_defaults() {
        assert_eq!(normalize(&json!([1, 2, 3])), StatisticsRecord::default());
        assert_eq!(normalize(&json!("stats")), StatisticsRecord::default());
        assert_eq!(normalize(&Value::Null), StatisticsRecord::default());
    }

    #[test]
    fn flat_cpu_time_fills_nested_cpu() {
        let record = normalize(&json!({ "cpuTime": 5 }));
        assert_eq!(record.cpu_time, 5.0);
        assert_eq!(record.time.cpu, 5.0);
    }

    #[test]
    fn explicit_nested_cpu_wins() {
        let record = normalize(&json!({ "cpuTime": 5, "time": { "cpu": 9 } }));
        assert_eq!(record.time.cpu, 9.0);
        assert_eq!(record.cpu_time, 5.0);
    }

    #[test]
    fn explicit_zero_nested_cpu_is_kept() {
        let record = normalize(&json!({ "cpuTime": 5, "time": { "cpu": 0 } }));
        assert_eq!(record.time.cpu, 0.0);
    }

    #[test]
    fn mistyped_scalars_default_to_zero() {
        let record = normalize(&json!({
            "nrThunks": "many",
            "nrExprs": null,
            "envs": { "bytes": true, "number": 3 },
            "sets": "not an object",
        }));
        assert_eq!(record.nr_thunks, 0.0);
        assert_eq!(record.nr_exprs, 0.0);
        assert_eq!(record.envs.bytes, 0.0);
        assert_eq!(record.envs.number, 3.0);
        assert_eq!(record.sets, SetStats::default());
    }

    #[test]
    fn gc_with_bad_field_is_dropped() {
        let record = normalize(&json!({ "gc": { "heapSize": "oops", "totalBytes": 1, "cycles": 2 } }));
        assert!(record.gc.is_none());
    }

    #[test]
    fn gc_with_missing_field_is_dropped() {
        let record = normalize(&json!({ "gc": { "heapSize": 1, "totalBytes": 2 } }));
        assert!(record.gc.is_none());
    }

    #[test]
    fn well_typed_gc_is_kept() {
        let record =
            normalize(&json!({ "gc": { "heapSize": 1024, "totalBytes": 4096, "cycles": 3 } }));
        assert_eq!(
            record.gc,
            Some(GcStats { heap_size: 1024.0, total_bytes: 4096.0, cycles: 3.0 })
        );
    }

    #[test]
    fn primops_all_or_nothing() {
        let good = normalize(&json!({ "primops": { "map": 10, "foldl'": 4 } }));
        let primops = good.primops.expect("primops kept");
        assert_eq!(primops.get("map"), Some(&10.0));
        assert_eq!(primops.len(), 2);

        let bad = normalize(&json!({ "primops": { "map": 10, "filter": "x" } }));
        assert!(bad.primops.is_none());

        let wrong_shape = normalize(&json!({ "primops": [1, 2] }));
        assert!(wrong_shape.primops.is_none());
    }

    #[test]
    fn functions_accept_null_name() {
        let record = normalize(&json!({
            "functions": [
                { "name": null, "file": "/a.nix", "line": 1, "column": 2, "count": 7 },
                { "name": "mkDerivation", "file": "/b.nix", "line": 3, "column": 4, "count": 9 },
            ]
        }));
        let functions = record.functions.expect("functions kept");
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].display_name(), "<lambda>");
        assert_eq!(functions[1].display_name(), "mkDerivation");
    }

    #[test]
    fn one_malformed_call_site_drops_the_list() {
        let record = normalize(&json!({
            "functions": [
                { "name": "ok", "file": "/a.nix", "line": 1, "column": 2, "count": 7 },
                { "name": "bad", "file": "/b.nix", "line": "three", "column": 4, "count": 9 },
            ],
            "attributes": [{ "file": "/c.nix", "line": 1, "column": 1 }],
        }));
        assert!(record.functions.is_none());
        assert!(record.attributes.is_none());
    }

    #[test]
    fn call_sites_without_position_are_kept() {
        let record = normalize(&json!({
            "functions": [
                { "name": "mkDerivation", "file": "/a.nix", "line": 1, "column": 2, "count": 9000 },
                { "name": null, "count": 3 },
            ],
            "attributes": [
                { "file": "/a.nix", "line": 5, "column": 7, "count": 40 },
                { "count": 2 },
            ],
        }));
        let functions = record.functions.expect("functions kept");
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].location(), "/a.nix:1:2");
        assert_eq!(functions[1].file, None);
        assert_eq!(functions[1].location(), "<unknown>");

        let attributes = record.attributes.expect("attributes kept");
        assert_eq!(attributes[0].location(), "/a.nix:5:7");
        assert_eq!(attributes[1].line, None);
        assert_eq!(attributes[1].location(), "<unknown>");
    }

    #[test]
    fn call_site_without_count_drops_the_list() {
        let record = normalize(&json!({ "attributes": [{ "file": "/a.nix", "line": 1 }] }));
        assert!(record.attributes.is_none());
    }

    #[test]
    fn empty_call_site_lists_are_kept() {
        let record = normalize(&json!({ "functions": [], "attributes": [] }));
        assert_eq!(record.functions, Some(vec![]));
        assert_eq!(record.attributes, Some(vec![]));
    }

    #[test]
    fn store_io_fields_are_independent() {
        let record = normalize(&json!({
            "narRead": 4,
            "narReadBytes": "lots",
            "narWriteBytes": 2048,
        }));
        assert_eq!(record.store.nar_read, Some(4.0));
        assert_eq!(record.store.nar_read_bytes, None);
        assert_eq!(record.store.nar_write_bytes, Some(2048.0));
        assert_eq!(record.store.nar_info_read, None);

        let reported: Vec<_> = record.store.reported().collect();
        assert_eq!(reported, vec![("narRead", 4.0), ("narWriteBytes", 2048.0)]);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let record = normalize(&json!({
            "nrThunks": -12,
            "nrExprs": 18446744073709551615u64,
            "cpuTime": 1e300,
        }));
        assert_eq!(record.nr_thunks, -12.0);
        assert_eq!(record.nr_exprs, 18446744073709551615u64 as f64);
        assert_eq!(record.cpu_time, 1e300);
    }

    #[test]
    fn record_serialises_with_source_keys() {
        let record = normalize(&json!({ "nrThunks": 3, "sizes": { "Env": 16 }, "narRead": 1 }));
        let out = serde_json::to_value(&record).expect("serialise");
        assert_eq!(out["nrThunks"], json!(3.0));
        assert_eq!(out["sizes"]["Env"], json!(16.0));
        assert_eq!(out["narRead"], json!(1.0));
        assert!(out.get("gc").is_none());
        assert!(out.get("narWrite").is_none());
        assert_eq!(normalize(&out), record);
    }
}
