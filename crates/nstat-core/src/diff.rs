//! Differ: field-by-field comparison of two snapshots.
//!
//! [`diff`] walks [`TRACKED_METRICS`] in declaration order and produces one
//! [`ComparisonRow`] per metric. Output order never depends on the values.
//!
//! # Percent change
//!
//! `percent = delta / baseline * 100`, except when the baseline is zero: then
//! the change is `0%` if both sides are zero and a flat `100%` otherwise. The
//! zero-baseline case is therefore not antisymmetric (`0 → 5` is `+100%`,
//! `5 → 0` is `-100%`).
//!
//! # Presence
//!
//! Under [`PresencePolicy::Reported`] a field is present only when the raw
//! payload carried a number at the metric's path, so a field the evaluator
//! never reported shows as unavailable instead of as a comparison of two
//! zero defaults. [`PresencePolicy::Typed`] only asks whether the normalised
//! record has a value, which fails solely for omitted optional groups.

use crate::metrics::{MetricSpec, Polarity, TRACKED_METRICS};
use crate::snapshot::Snapshot;
use crate::types::StatisticsRecord;
use serde::Deserialize;
use serde_json::Value;

/// How a comparison decides whether a field is available on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresencePolicy {
    /// Present when the raw payload reported a number at the metric's path.
    #[default]
    Reported,
    /// Present when the normalised record has a value.
    Typed,
}

/// Absolute and relative change between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    /// `current - baseline`.
    pub delta: f64,
    pub percent: f64,
    /// The value went down. Says nothing about whether that is good.
    pub is_reduction: bool,
}

/// Compute the change from `baseline` to `current`.
pub fn calculate_change(baseline: f64, current: f64) -> Change {
    let delta = current - baseline;
    let percent = if baseline == 0.0 {
        if delta == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        delta / baseline * 100.0
    };
    Change { delta, percent, is_reduction: delta < 0.0 }
}

/// Classification of a row, taking the metric's polarity into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Improved,
    Regressed,
    Unchanged,
    /// Missing on at least one side; excluded from tallies.
    Unavailable,
}

/// One side of a comparison row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue {
    /// Normalised value, `0` when the field is not available.
    pub value: f64,
    pub present: bool,
}

/// Comparison of one tracked metric between two snapshots.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub metric: &'static MetricSpec,
    pub baseline: MetricValue,
    pub current: MetricValue,
    pub is_different: bool,
    /// `None` when the row is missing on either side.
    pub change: Option<Change>,
    pub verdict: Verdict,
}

impl ComparisonRow {
    pub fn is_missing(&self) -> bool {
        !(self.baseline.present && self.current.present)
    }
}

/// Compare two snapshots under the default [`PresencePolicy`].
pub fn diff(baseline: &Snapshot, current: &Snapshot) -> Vec<ComparisonRow> {
    diff_with_policy(baseline, current, PresencePolicy::default())
}

/// Compare two snapshots under an explicit [`PresencePolicy`].
pub fn diff_with_policy(
    baseline: &Snapshot,
    current: &Snapshot,
    policy: PresencePolicy,
) -> Vec<ComparisonRow> {
    tracing::debug!(
        baseline = %baseline.id,
        current = %current.id,
        ?policy,
        "diffing snapshots"
    );
    TRACKED_METRICS
        .iter()
        .map(|metric| {
            compare_metric(
                metric,
                resolve(metric, &baseline.record, &baseline.raw, policy),
                resolve(metric, &current.record, &current.raw, policy),
            )
        })
        .collect()
}

fn resolve(
    metric: &MetricSpec,
    record: &StatisticsRecord,
    raw: &Value,
    policy: PresencePolicy,
) -> MetricValue {
    let typed = (metric.read)(record);
    let present = match policy {
        PresencePolicy::Typed => typed.is_some(),
        PresencePolicy::Reported => typed.is_some() && reported(metric, raw),
    };
    MetricValue { value: typed.unwrap_or(0.0), present }
}

/// True when `raw` holds a number at the metric's dotted path.
fn reported(metric: &MetricSpec, raw: &Value) -> bool {
    metric
        .path()
        .try_fold(raw, |node, segment| node.get(segment))
        .is_some_and(Value::is_number)
}

fn compare_metric(
    metric: &'static MetricSpec,
    baseline: MetricValue,
    current: MetricValue,
) -> ComparisonRow {
    let is_different = baseline.value != current.value;
    let missing = !(baseline.present && current.present);

    let change = (!missing).then(|| calculate_change(baseline.value, current.value));
    let verdict = match change {
        None => Verdict::Unavailable,
        Some(_) if !is_different => Verdict::Unchanged,
        Some(c) => {
            let better = match metric.polarity {
                Polarity::LowerIsBetter => c.delta < 0.0,
                Polarity::HigherIsBetter => c.delta > 0.0,
            };
            if better {
                Verdict::Improved
            } else {
                Verdict::Regressed
            }
        }
    };

    ComparisonRow { metric, baseline, current, is_different, change, verdict }
}

/// Tally of row verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub improved: usize,
    pub regressed: usize,
    pub unchanged: usize,
    pub unavailable: usize,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.verdict {
                Verdict::Improved => acc.improved += 1,
                Verdict::Regressed => acc.regressed += 1,
                Verdict::Unchanged => acc.unchanged += 1,
                Verdict::Unavailable => acc.unavailable += 1,
            }
            acc
        })
    }
}
