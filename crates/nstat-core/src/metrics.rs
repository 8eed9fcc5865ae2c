//! Tracked metric table used by the comparison view.
//!
//! Each [`MetricSpec`] names one field of [`StatisticsRecord`] by its dotted
//! source path, carries a typed accessor for reading it back, and says which
//! direction of change counts as an improvement.

use crate::format;
use crate::types::StatisticsRecord;
use phf::phf_map;

/// How a metric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Count,
    Bytes,
    /// Seconds.
    Duration,
    /// A fraction in `0.0..=1.0`.
    Ratio,
}

impl UnitKind {
    /// Render `value` in this unit.
    pub fn format(self, value: f64) -> String {
        match self {
            UnitKind::Count => format::format_number(value),
            UnitKind::Bytes => format::format_bytes(value),
            UnitKind::Duration => format::format_time(value),
            UnitKind::Ratio => format::format_percent(value),
        }
    }
}

/// Direction in which a metric gets better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    LowerIsBetter,
    HigherIsBetter,
}

/// One row of the comparison table.
pub struct MetricSpec {
    /// Dotted path into the evaluator's JSON, e.g. `envs.bytes`.
    pub key: &'static str,
    pub label: &'static str,
    pub unit: UnitKind,
    pub polarity: Polarity,
    /// Reads the field from a normalised record. Returns `None` only when the
    /// field lives in an optional group that was not reported.
    pub read: fn(&StatisticsRecord) -> Option<f64>,
}

impl MetricSpec {
    /// Path segments of [`MetricSpec::key`].
    pub fn path(&self) -> impl Iterator<Item = &'static str> {
        self.key.split('.')
    }

    /// Long-form explanation of the metric, if one is known.
    pub fn description(&self) -> Option<&'static str> {
        DESCRIPTIONS.get(self.key).copied()
    }
}

impl std::fmt::Debug for MetricSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("unit", &self.unit)
            .field("polarity", &self.polarity)
            .finish_non_exhaustive()
    }
}

/// Tracked metrics, in display order.
pub static TRACKED_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "cpuTime",
        label: "CPU Time",
        unit: UnitKind::Duration,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.cpu_time),
    },
    MetricSpec {
        key: "envs.number",
        label: "Env Count",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.envs.number),
    },
    MetricSpec {
        key: "envs.bytes",
        label: "Env Memory",
        unit: UnitKind::Bytes,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.envs.bytes),
    },
    MetricSpec {
        key: "list.elements",
        label: "List Elements",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.list.elements),
    },
    MetricSpec {
        key: "list.concats",
        label: "List Concat",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.list.concats),
    },
    MetricSpec {
        key: "values.number",
        label: "Value Count",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.values.number),
    },
    MetricSpec {
        key: "symbols.number",
        label: "Symbol Count",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.symbols.number),
    },
    MetricSpec {
        key: "sets.number",
        label: "Set Count",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.sets.number),
    },
    MetricSpec {
        key: "sets.elements",
        label: "Attributes",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.sets.elements),
    },
    MetricSpec {
        key: "nrExprs",
        label: "Expressions",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.nr_exprs),
    },
    MetricSpec {
        key: "nrThunks",
        label: "Thunks",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.nr_thunks),
    },
    MetricSpec {
        key: "nrAvoided",
        label: "Thunks Avoided",
        unit: UnitKind::Count,
        polarity: Polarity::HigherIsBetter,
        read: |r| Some(r.nr_avoided),
    },
    MetricSpec {
        key: "nrLookups",
        label: "Lookups",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.nr_lookups),
    },
    MetricSpec {
        key: "nrFunctionCalls",
        label: "Function Calls",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.nr_function_calls),
    },
    MetricSpec {
        key: "nrPrimOpCalls",
        label: "PrimOp Calls",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.nr_prim_op_calls),
    },
    MetricSpec {
        key: "time.gcFraction",
        label: "GC Fraction",
        unit: UnitKind::Ratio,
        polarity: Polarity::LowerIsBetter,
        read: |r| Some(r.time.gc_fraction),
    },
    MetricSpec {
        key: "gc.heapSize",
        label: "GC Heap",
        unit: UnitKind::Bytes,
        polarity: Polarity::LowerIsBetter,
        read: |r| r.gc.map(|gc| gc.heap_size),
    },
    MetricSpec {
        key: "gc.cycles",
        label: "GC Cycles",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| r.gc.map(|gc| gc.cycles),
    },
    MetricSpec {
        key: "narRead",
        label: "NAR Reads",
        unit: UnitKind::Count,
        polarity: Polarity::LowerIsBetter,
        read: |r| r.store.nar_read,
    },
    MetricSpec {
        key: "narReadBytes",
        label: "NAR Read Bytes",
        unit: UnitKind::Bytes,
        polarity: Polarity::LowerIsBetter,
        read: |r| r.store.nar_read_bytes,
    },
];

/// Look up a tracked metric by its dotted key.
pub fn find(key: &str) -> Option<&'static MetricSpec> {
    TRACKED_METRICS.iter().find(|m| m.key == key)
}

/// Explanations for the metrics shown on the dashboard and comparison view.
static DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "cpuTime" => "Total CPU user time in seconds spent on expression evaluation",
    "memory" => "Combined memory for all evaluation structures (envs, lists, values, symbols, sets)",
    "nrExprs" => "Total number of expressions parsed and created during evaluation",
    "nrThunks" => "Number of thunks (delayed computations) created during evaluation",
    "nrAvoided" => "Number of thunks avoided because an already-computed value was reused",
    "nrLookups" => "Number of attribute lookups performed",
    "nrPrimOpCalls" => "Total number of builtin function (primop) calls",
    "nrFunctionCalls" => "Total number of user-defined function calls executed",
    "nrOpUpdates" => "Number of attribute set update operations (the // operator)",
    "nrOpUpdateValuesCopied" => "Number of values copied during attribute set updates",
    "envs.number" => "Total number of lexical environments created during evaluation",
    "envs.elements" => "Total number of values stored in environment slots",
    "envs.bytes" => "Memory for environments: frames plus one value pointer per slot",
    "list.elements" => "Total number of list elements allocated across all lists",
    "list.bytes" => "Memory for list elements: one value pointer per element",
    "list.concats" => "Number of list concatenation operations (++) performed",
    "values.number" => "Total number of value cells allocated",
    "values.bytes" => "Memory for value cells",
    "symbols.number" => "Total number of unique symbols interned in the symbol table",
    "symbols.bytes" => "Total memory used by symbol strings",
    "sets.number" => "Total number of attribute sets created during evaluation",
    "sets.elements" => "Total number of attributes across all attribute sets",
    "sets.bytes" => "Memory for attribute sets: set headers plus one entry per attribute",
    "time.gcFraction" => "Fraction of CPU time spent in incremental garbage collection",
    "gc.heapSize" => "Current size of the garbage collected heap",
    "gc.totalBytes" => "Total number of bytes allocated since program start",
    "gc.cycles" => "Total number of garbage collection cycles performed",
    "narRead" => "Number of NAR archives read from the store",
    "narWrite" => "Number of NAR archives written to the store",
    "narReadBytes" => "Total uncompressed bytes read from NAR archives",
    "narWriteBytes" => "Total uncompressed bytes written to NAR archives",
};

/// Explanation for any dashboard key, tracked or not.
pub fn describe(key: &str) -> Option<&'static str> {
    DESCRIPTIONS.get(key).copied()
}
