//! Dashboard: the single-snapshot view in the main pane.
//!
//! Everything shown is read from the normalised record or derived by
//! [`nstat_core::analysis`]; the widget only lays it out. Sections for
//! optional groups (GC, store I/O, top lists) are omitted when the snapshot
//! did not report them.

use crate::theme::Theme;
use nstat_core::analysis::{self, Share};
use nstat_core::format::{format_bytes, format_number, format_percent, format_time};
use nstat_core::metrics::describe;
use nstat_core::{Snapshot, StatisticsRecord};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

const LABEL_WIDTH: usize = 16;
const BAR_WIDTH: usize = 24;

pub struct Dashboard<'a> {
    snapshot: Option<&'a Snapshot>,
    scroll: u16,
    top_n: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        snapshot: Option<&'a Snapshot>,
        scroll: u16,
        top_n: usize,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { snapshot, scroll, top_n, focused, theme }
    }

    fn lines(&self, snap: &Snapshot) -> Vec<Line<'static>> {
        let r = &snap.record;
        let t = self.theme;
        let mut out = Vec::new();

        out.push(Line::from(vec![
            Span::styled(format!("{} {}", snap.id, snap.name), t.heading),
            Span::styled(
                format!("  loaded {}", snap.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
                t.muted,
            ),
        ]));

        section(&mut out, t, "Overview");
        let total = analysis::total_memory(r);
        for (label, key, value) in [
            ("CPU Time", "cpuTime", format_time(r.cpu_time)),
            ("Total Memory", "memory", format_bytes(total)),
            ("Expressions", "nrExprs", format_number(r.nr_exprs)),
            ("Thunks", "nrThunks", format_number(r.nr_thunks)),
            (
                "Thunks Avoided",
                "nrAvoided",
                format!(
                    "{} ({})",
                    format_number(r.nr_avoided),
                    format_percent(analysis::thunk_avoidance_rate(r))
                ),
            ),
            ("Function Calls", "nrFunctionCalls", format_number(r.nr_function_calls)),
            ("PrimOp Calls", "nrPrimOpCalls", format_number(r.nr_prim_op_calls)),
        ] {
            out.push(stat_line(t, label, value, describe(key)));
        }

        section(&mut out, t, "Memory");
        chart(&mut out, t, &analysis::memory_breakdown(r), total, format_bytes);

        let time = analysis::time_breakdown(r);
        if !time.is_empty() {
            section(&mut out, t, "Time");
            let cpu: f64 = time.iter().map(|s| s.value).sum();
            chart(&mut out, t, &time, cpu, format_time);
        }

        section(&mut out, t, "Operations");
        let ops = analysis::operations(r);
        let max = ops.first().map(|s| s.value).unwrap_or(0.0);
        chart(&mut out, t, &ops, max, format_number);

        section(&mut out, t, "Pools");
        pools(&mut out, t, r);

        if let Some(gc) = &r.gc {
            section(&mut out, t, "Garbage Collection");
            out.push(stat_line(t, "Heap Size", format_bytes(gc.heap_size), describe("gc.heapSize")));
            out.push(stat_line(t, "Total Alloc", format_bytes(gc.total_bytes), describe("gc.totalBytes")));
            out.push(stat_line(t, "Cycles", format_number(gc.cycles), describe("gc.cycles")));
            out.push(stat_line(t, "GC Time", format_percent(r.time.gc_fraction), describe("time.gcFraction")));
        }

        if analysis::has_store_io(r) {
            section(&mut out, t, "Store I/O");
            for (key, value) in r.store.reported() {
                let rendered = if key.ends_with("Bytes") {
                    format_bytes(value)
                } else {
                    format_number(value)
                };
                out.push(stat_line(t, store_label(key), rendered, describe(key)));
            }
        }

        let primops = analysis::top_primops(r, self.top_n);
        if !primops.is_empty() {
            section(&mut out, t, "Top PrimOps");
            for (name, count) in primops {
                out.push(stat_line(t, name, format_number(count), None));
            }
        }

        let functions = analysis::top_functions(r, self.top_n);
        if !functions.is_empty() {
            section(&mut out, t, "Top Functions");
            for f in functions {
                out.push(site_line(t, f.display_name(), f.location(), f.count));
            }
        }

        let attributes = analysis::top_attributes(r, self.top_n);
        if !attributes.is_empty() {
            section(&mut out, t, "Top Attributes");
            for a in attributes {
                out.push(site_line(t, "", a.location(), a.count));
            }
        }

        out
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title("Dashboard")
            .border_style(self.theme.border(self.focused));

        let lines = match self.snapshot {
            Some(snap) => self.lines(snap),
            None => vec![
                Line::styled("No snapshot selected.", self.theme.muted),
                Line::styled(
                    "Load one with :load <path> or :paste <json>.",
                    self.theme.muted,
                ),
            ],
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Line builders
// ---------------------------------------------------------------------------

fn section(out: &mut Vec<Line<'static>>, theme: &Theme, title: &str) {
    out.push(Line::default());
    out.push(Line::styled(format!("── {title} ──"), theme.heading));
}

fn stat_line(theme: &Theme, label: &str, value: String, desc: Option<&'static str>) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("  {label:<LABEL_WIDTH$}")),
        Span::styled(format!("{value:>14}"), Style::default()),
    ];
    if let Some(desc) = desc {
        spans.push(Span::styled(format!("  {desc}"), theme.muted));
    }
    Line::from(spans)
}

fn chart(
    out: &mut Vec<Line<'static>>,
    theme: &Theme,
    shares: &[Share],
    scale: f64,
    fmt: fn(f64) -> String,
) {
    for share in shares {
        let fraction = share.fraction_of(scale);
        out.push(Line::from(vec![
            Span::raw(format!("  {:<LABEL_WIDTH$}", share.label)),
            Span::styled(bar(fraction, BAR_WIDTH), theme.series_style(share.label)),
            Span::raw(format!(" {:>12}", fmt(share.value))),
            Span::styled(format!(" {:>7}", format_percent(fraction)), theme.muted),
        ]));
    }
}

fn pools(out: &mut Vec<Line<'static>>, theme: &Theme, r: &StatisticsRecord) {
    let rows = [
        ("Environments", "envs.number", r.envs.number),
        ("Env Slots", "envs.elements", r.envs.elements),
        ("List Elements", "list.elements", r.list.elements),
        ("List Concats", "list.concats", r.list.concats),
        ("Values", "values.number", r.values.number),
        ("Symbols", "symbols.number", r.symbols.number),
        ("Sets", "sets.number", r.sets.number),
        ("Attributes", "sets.elements", r.sets.elements),
    ];
    for (label, key, value) in rows {
        out.push(stat_line(theme, label, format_number(value), describe(key)));
    }
    out.push(Line::styled(
        format!(
            "  sizes: Env {}  Value {}  Bindings {}  Attr {}",
            r.sizes.env, r.sizes.value, r.sizes.bindings, r.sizes.attr
        ),
        theme.muted,
    ));
}

fn site_line(theme: &Theme, name: &str, location: String, count: f64) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("  {:>10}  ", format_number(count)))];
    if !name.is_empty() {
        spans.push(Span::raw(format!("{name} ")));
    }
    spans.push(Span::styled(location, theme.muted));
    Line::from(spans)
}

/// Horizontal bar of `width` cells filled to `fraction`.
fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn store_label(key: &str) -> &'static str {
    match key {
        "narInfoRead" => "NAR Info Read",
        "narInfoReadAverted" => "NAR Info Averted",
        "narInfoMissing" => "NAR Info Missing",
        "narInfoWrite" => "NAR Info Write",
        "narRead" => "NAR Read",
        "narReadBytes" => "NAR Read Bytes",
        "narReadCompressedBytes" => "NAR Read (comp)",
        "narWrite" => "NAR Write",
        "narWriteAverted" => "NAR Write Averted",
        "narWriteBytes" => "NAR Write Bytes",
        "narWriteCompressedBytes" => "NAR Write (comp)",
        _ => "Store",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
