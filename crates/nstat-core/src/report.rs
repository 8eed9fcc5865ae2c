//! Plain-text terminal report for one record, and the text comparison table.

use crate::diff::{ComparisonRow, ComparisonSummary, Verdict};
use crate::format::{format_grouped, format_mb};
use crate::snapshot::Snapshot;
use crate::types::StatisticsRecord;
use std::fmt::Write;

const RULE_WIDTH: usize = 80;
const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 14;

/// Render the summary report printed by `nstat <file>`.
pub fn render_report(r: &StatisticsRecord) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, r);
    out
}

fn write_report(out: &mut String, r: &StatisticsRecord) -> std::fmt::Result {
    let ratio = if r.nr_thunks == 0.0 {
        0.0
    } else {
        r.nr_avoided / r.nr_thunks * 100.0
    };
    let total = crate::analysis::total_memory(r);

    writeln!(out, "=== Nix Evaluator Statistics ===")?;
    writeln!(out)?;
    writeln!(out, "CPU Time:     {:.3}s", r.cpu_time)?;
    writeln!(out, "Expressions:  {}", format_grouped(r.nr_exprs))?;
    writeln!(out, "Thunks:       {}", format_grouped(r.nr_thunks))?;
    writeln!(out, "  - Avoided:  {}", format_grouped(r.nr_avoided))?;
    writeln!(out, "  - Ratio:    {ratio:.2}%")?;
    writeln!(out, "Total Memory: {}", format_mb(total))?;

    writeln!(out)?;
    writeln!(out, "=== Memory Breakdown ===")?;
    writeln!(out)?;
    writeln!(out, "Environments: {}", format_mb(r.envs.bytes))?;
    writeln!(out, "Lists:        {}", format_mb(r.list.bytes))?;
    writeln!(out, "Values:       {}", format_mb(r.values.bytes))?;
    writeln!(out, "Symbols:      {}", format_mb(r.symbols.bytes))?;
    writeln!(out, "Sets:         {}", format_mb(r.sets.bytes))?;

    if let Some(gc) = &r.gc {
        writeln!(out)?;
        writeln!(out, "=== Garbage Collection ===")?;
        writeln!(out)?;
        writeln!(out, "Heap Size:    {}", format_mb(gc.heap_size))?;
        writeln!(out, "Total Alloc:  {}", format_mb(gc.total_bytes))?;
        writeln!(out, "GC Cycles:    {}", format_grouped(gc.cycles))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Render a comparison table, as printed by `nstat --compare`.
pub fn render_comparison(
    baseline: &Snapshot,
    current: &Snapshot,
    rows: &[ComparisonRow],
) -> String {
    let mut out = String::new();
    let _ = write_comparison(&mut out, baseline, current, rows);
    out
}

fn write_comparison(
    out: &mut String,
    baseline: &Snapshot,
    current: &Snapshot,
    rows: &[ComparisonRow],
) -> std::fmt::Result {
    writeln!(out, "=== Comparison: {} → {} ===", baseline.name, current.name)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}  {:>VALUE_WIDTH$}  Change",
        "Metric", baseline.name, current.name
    )?;

    for row in rows {
        let (left, right) = if row.is_missing() {
            ("N/A".to_string(), "N/A".to_string())
        } else {
            (
                row.metric.unit.format(row.baseline.value),
                row.metric.unit.format(row.current.value),
            )
        };
        writeln!(
            out,
            "{:<LABEL_WIDTH$}{left:>VALUE_WIDTH$}  {right:>VALUE_WIDTH$}  {}",
            row.metric.label,
            change_cell(row)
        )?;
    }

    let summary = ComparisonSummary::from_rows(rows);
    writeln!(out)?;
    writeln!(
        out,
        "{} improved, {} regressed, {} unchanged, {} unavailable",
        summary.improved, summary.regressed, summary.unchanged, summary.unavailable
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Text for the change column of a row.
pub fn change_cell(row: &ComparisonRow) -> String {
    match (row.verdict, row.change) {
        (Verdict::Unavailable, _) | (_, None) => "N/A".to_string(),
        (Verdict::Unchanged, _) => "—".to_string(),
        (verdict, Some(change)) => {
            let arrow = if change.is_reduction { '↓' } else { '↑' };
            let word = if verdict == Verdict::Improved { "improved" } else { "regressed" };
            format!("{arrow} {:.2}% {word}", change.percent.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use serde_json::json;

    #[test]
    fn report_ends_with_eighty_char_rule() {
        let report = render_report(&normalize(&json!({})));
        let last = report.lines().last().unwrap();
        assert_eq!(last, "=".repeat(80));
    }

    #[test]
    fn gc_section_only_when_reported() {
        let without = render_report(&normalize(&json!({})));
        assert!(!without.contains("Garbage Collection"));
        let with = render_report(&normalize(&json!({
            "gc": { "heapSize": 1048576, "totalBytes": 2097152, "cycles": 1234 }
        })));
        assert!(with.contains("=== Garbage Collection ==="));
        assert!(with.contains("Heap Size:    1.00 MB"));
        assert!(with.contains("GC Cycles:    1,234"));
    }

    #[test]
    fn zero_thunks_gives_zero_ratio() {
        let report = render_report(&normalize(&json!({ "nrAvoided": 3 })));
        assert!(report.contains("  - Ratio:    0.00%"));
    }
}
