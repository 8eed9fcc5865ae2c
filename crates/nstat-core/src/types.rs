//! Core types for nstat-core.
//!
//! [`StatisticsRecord`] is the fully-typed form of an evaluator stats dump.
//! Every non-optional numeric field is always present after normalisation;
//! optional groups are either absent or completely well-typed.
//!
//! The record serialises back to the evaluator's own key names, so a
//! normalised record can be re-emitted as JSON and fed to the normaliser again.

use serde::Serialize;
use std::collections::BTreeMap;

/// A normalised evaluator statistics record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    /// Total CPU time in seconds, as reported by the evaluator.
    pub cpu_time: f64,
    pub time: TimeStats,
    pub envs: EnvStats,
    pub list: ListStats,
    pub values: PoolStats,
    pub symbols: PoolStats,
    pub sets: SetStats,
    pub sizes: StructureSizes,
    pub nr_exprs: f64,
    pub nr_thunks: f64,
    pub nr_avoided: f64,
    pub nr_lookups: f64,
    pub nr_op_updates: f64,
    pub nr_op_update_values_copied: f64,
    pub nr_prim_op_calls: f64,
    pub nr_function_calls: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gc: Option<GcStats>,
    /// Builtin name → call count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primops: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionCallSite>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeCallSite>>,
    #[serde(flatten)]
    pub store: StoreIo,
}

/// Timing breakdown (`time` object).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    pub cpu: f64,
    pub gc: f64,
    pub gc_non_incremental: f64,
    pub gc_fraction: f64,
    pub gc_non_incremental_fraction: f64,
}

/// Environment pool (`envs` object).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnvStats {
    pub number: f64,
    pub elements: f64,
    pub bytes: f64,
}

/// List-element pool (`list` object).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ListStats {
    pub elements: f64,
    pub bytes: f64,
    /// Number of `++` operations performed.
    pub concats: f64,
}

/// Shape shared by the `values` and `symbols` pools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PoolStats {
    pub number: f64,
    pub bytes: f64,
}

/// Attribute-set pool (`sets` object). `elements` counts attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SetStats {
    pub number: f64,
    pub elements: f64,
    pub bytes: f64,
}

/// Per-structure byte sizes (`sizes` object).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StructureSizes {
    #[serde(rename = "Env")]
    pub env: f64,
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Bindings")]
    pub bindings: f64,
    #[serde(rename = "Attr")]
    pub attr: f64,
}

/// Garbage-collector snapshot (`gc` object).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcStats {
    pub heap_size: f64,
    pub total_bytes: f64,
    pub cycles: f64,
}

/// One entry of the `functions` call-site list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallSite {
    /// `None` for anonymous lambdas.
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,
    pub count: f64,
}

impl FunctionCallSite {
    /// Name for display; anonymous functions render as `<lambda>`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<lambda>")
    }

    pub fn location(&self) -> String {
        location(self.file.as_deref(), self.line, self.column)
    }
}

/// One entry of the `attributes` selection call-site list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeCallSite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,
    pub count: f64,
}

impl AttributeCallSite {
    pub fn location(&self) -> String {
        location(self.file.as_deref(), self.line, self.column)
    }
}

/// `file:line:column`, shortened to what the evaluator reported. Sites with
/// no source file (`-E` expressions, stdin) render as `<unknown>`.
fn location(file: Option<&str>, line: Option<u64>, column: Option<u64>) -> String {
    match (file, line, column) {
        (Some(file), Some(line), Some(column)) => format!("{file}:{line}:{column}"),
        (Some(file), Some(line), None) => format!("{file}:{line}"),
        (Some(file), None, _) => file.to_string(),
        (None, ..) => "<unknown>".to_string(),
    }
}

/// Store-I/O counters. Each field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreIo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_info_read: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_info_read_averted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_info_missing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_info_write: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_read: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_read_bytes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_read_compressed_bytes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_write: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_write_averted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_write_bytes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nar_write_compressed_bytes: Option<f64>,
}

impl StoreIo {
    /// Source keys of the eleven counters, in report order.
    pub const KEYS: [&'static str; 11] = [
        "narInfoRead",
        "narInfoReadAverted",
        "narInfoMissing",
        "narInfoWrite",
        "narRead",
        "narReadBytes",
        "narReadCompressedBytes",
        "narWrite",
        "narWriteAverted",
        "narWriteBytes",
        "narWriteCompressedBytes",
    ];

    /// Mutable slot for a source key, or `None` for an unknown key.
    pub(crate) fn slot_mut(&mut self, key: &str) -> Option<&mut Option<f64>> {
        Some(match key {
            "narInfoRead" => &mut self.nar_info_read,
            "narInfoReadAverted" => &mut self.nar_info_read_averted,
            "narInfoMissing" => &mut self.nar_info_missing,
            "narInfoWrite" => &mut self.nar_info_write,
            "narRead" => &mut self.nar_read,
            "narReadBytes" => &mut self.nar_read_bytes,
            "narReadCompressedBytes" => &mut self.nar_read_compressed_bytes,
            "narWrite" => &mut self.nar_write,
            "narWriteAverted" => &mut self.nar_write_averted,
            "narWriteBytes" => &mut self.nar_write_bytes,
            "narWriteCompressedBytes" => &mut self.nar_write_compressed_bytes,
            _ => return None,
        })
    }

    /// Value of a counter by source key.
    pub fn value(&self, key: &str) -> Option<f64> {
        match key {
            "narInfoRead" => self.nar_info_read,
            "narInfoReadAverted" => self.nar_info_read_averted,
            "narInfoMissing" => self.nar_info_missing,
            "narInfoWrite" => self.nar_info_write,
            "narRead" => self.nar_read,
            "narReadBytes" => self.nar_read_bytes,
            "narReadCompressedBytes" => self.nar_read_compressed_bytes,
            "narWrite" => self.nar_write,
            "narWriteAverted" => self.nar_write_averted,
            "narWriteBytes" => self.nar_write_bytes,
            "narWriteCompressedBytes" => self.nar_write_compressed_bytes,
            _ => None,
        }
    }

    /// Reported counters in [`StoreIo::KEYS`] order.
    pub fn reported(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::KEYS
            .iter()
            .filter_map(|&key| self.value(key).map(|v| (key, v)))
    }

    /// True when no counter was reported at all.
    pub fn is_empty(&self) -> bool {
        *self == StoreIo::default()
    }
}
