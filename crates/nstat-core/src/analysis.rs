//! Dashboard derivations over a single [`StatisticsRecord`].
//!
//! These only rearrange values the evaluator already reported; nothing here
//! recomputes memory or time from lower-level counters.

use crate::types::{AttributeCallSite, FunctionCallSite, StatisticsRecord};

/// A labelled value, one slice of a breakdown chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Share {
    pub label: &'static str,
    /// Key used to look up a description, e.g. `envs.bytes`.
    pub key: &'static str,
    pub value: f64,
}

impl Share {
    /// Fraction of `total` this share represents, `0` for an empty total.
    pub fn fraction_of(&self, total: f64) -> f64 {
        if total > 0.0 {
            self.value / total
        } else {
            0.0
        }
    }
}

/// Sum of the five pool byte counts.
pub fn total_memory(r: &StatisticsRecord) -> f64 {
    r.envs.bytes + r.list.bytes + r.values.bytes + r.symbols.bytes + r.sets.bytes
}

/// Per-pool memory, largest first.
pub fn memory_breakdown(r: &StatisticsRecord) -> Vec<Share> {
    sorted_desc(vec![
        Share { label: "Envs", key: "envs.bytes", value: r.envs.bytes },
        Share { label: "Lists", key: "list.bytes", value: r.list.bytes },
        Share { label: "Values", key: "values.bytes", value: r.values.bytes },
        Share { label: "Symbols", key: "symbols.bytes", value: r.symbols.bytes },
        Share { label: "Sets", key: "sets.bytes", value: r.sets.bytes },
    ])
}

/// CPU time split into evaluation and GC. Only positive parts are returned.
pub fn time_breakdown(r: &StatisticsRecord) -> Vec<Share> {
    let gc = r.time.gc;
    let full_gc = r.time.gc_non_incremental;
    let evaluation = (r.time.cpu - gc - full_gc).max(0.0);
    [
        Share { label: "Evaluation", key: "time.cpu", value: evaluation },
        Share { label: "Incremental GC", key: "time.gc", value: gc },
        Share { label: "Full GC", key: "time.gcNonIncremental", value: full_gc },
    ]
    .into_iter()
    .filter(|s| s.value > 0.0)
    .collect()
}

/// Evaluator operation counters, largest first.
pub fn operations(r: &StatisticsRecord) -> Vec<Share> {
    sorted_desc(vec![
        Share { label: "Lookups", key: "nrLookups", value: r.nr_lookups },
        Share { label: "Function Calls", key: "nrFunctionCalls", value: r.nr_function_calls },
        Share { label: "PrimOp Calls", key: "nrPrimOpCalls", value: r.nr_prim_op_calls },
        Share { label: "Op Updates", key: "nrOpUpdates", value: r.nr_op_updates },
        Share {
            label: "Values Copied",
            key: "nrOpUpdateValuesCopied",
            value: r.nr_op_update_values_copied,
        },
    ])
}

/// Share of thunks avoided, clamped to `0.0..=1.0`. `0` when no thunks were created.
pub fn thunk_avoidance_rate(r: &StatisticsRecord) -> f64 {
    if r.nr_thunks <= 0.0 {
        return 0.0;
    }
    (r.nr_avoided / r.nr_thunks).clamp(0.0, 1.0)
}

/// The `n` most-called builtins. Ties keep name order.
pub fn top_primops(r: &StatisticsRecord, n: usize) -> Vec<(&str, f64)> {
    let Some(primops) = &r.primops else {
        return Vec::new();
    };
    let mut ranked: Vec<(&str, f64)> =
        primops.iter().map(|(name, count)| (name.as_str(), *count)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// The `n` most-called user functions. Ties keep input order.
pub fn top_functions(r: &StatisticsRecord, n: usize) -> Vec<&FunctionCallSite> {
    top_by_count(r.functions.as_deref().unwrap_or_default(), n, |f| f.count)
}

/// The `n` hottest attribute-selection sites. Ties keep input order.
pub fn top_attributes(r: &StatisticsRecord, n: usize) -> Vec<&AttributeCallSite> {
    top_by_count(r.attributes.as_deref().unwrap_or_default(), n, |a| a.count)
}

/// The store-I/O section is shown only when NAR reads were reported.
pub fn has_store_io(r: &StatisticsRecord) -> bool {
    r.store.nar_read.is_some()
}

fn sorted_desc(mut shares: Vec<Share>) -> Vec<Share> {
    shares.sort_by(|a, b| b.value.total_cmp(&a.value));
    shares
}

fn top_by_count<T>(items: &[T], n: usize, count: fn(&T) -> f64) -> Vec<&T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| count(b).total_cmp(&count(a)));
    ranked.truncate(n);
    ranked
}
