//! Comparison view: baseline vs current table in the main pane.
//!
//! Rows come straight from [`nstat_core::diff_with_policy`]. Missing rows
//! show `N/A` on both sides and are excluded from the tally. The metric under
//! the cursor has its description shown below the table.

use crate::theme::Theme;
use nstat_core::config::KeybindingsConfig;
use nstat_core::report::change_cell;
use nstat_core::{ComparisonRow, ComparisonSummary, PresencePolicy, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};

pub struct Comparison<'a> {
    baseline: Option<&'a Snapshot>,
    current: Option<&'a Snapshot>,
    rows: &'a [ComparisonRow],
    cursor: usize,
    policy: PresencePolicy,
    keys: &'a KeybindingsConfig,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Comparison<'a> {
    pub fn new(
        baseline: Option<&'a Snapshot>,
        current: Option<&'a Snapshot>,
        rows: &'a [ComparisonRow],
        cursor: usize,
        policy: PresencePolicy,
        keys: &'a KeybindingsConfig,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { baseline, current, rows, cursor, policy, keys, focused, theme }
    }
}

impl Widget for Comparison<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = self.theme;
        let (Some(baseline), Some(current)) = (self.baseline, self.current) else {
            let block = Block::bordered().title("Compare").border_style(t.border(self.focused));
            Paragraph::new(vec![
                Line::styled("Pick two snapshots to compare.", t.muted),
                Line::styled(
                    format!(
                        "Move to a snapshot and press {} for baseline, {} for current.",
                        self.keys.set_baseline, self.keys.set_current
                    ),
                    t.muted,
                ),
            ])
            .block(block)
            .render(area, buf);
            return;
        };

        let block = Block::bordered()
            .title(format!(
                "Compare {} {} → {} {}",
                baseline.id, baseline.name, current.id, current.name
            ))
            .border_style(t.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let [summary_area, table_area, desc_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        let summary = ComparisonSummary::from_rows(self.rows);
        let policy = match self.policy {
            PresencePolicy::Reported => "reported",
            PresencePolicy::Typed => "typed",
        };
        Line::from(vec![
            Span::styled(format!("{} improved", summary.improved), t.improved),
            Span::raw(", "),
            Span::styled(format!("{} regressed", summary.regressed), t.regressed),
            Span::raw(", "),
            Span::styled(format!("{} unchanged", summary.unchanged), t.unchanged),
            Span::raw(", "),
            Span::styled(format!("{} unavailable", summary.unavailable), t.unavailable),
            Span::styled(format!("   presence: {policy}"), t.muted),
        ])
        .render(summary_area, buf);

        let header = Row::new(vec![
            Cell::from("Metric"),
            Cell::from(baseline.name.clone()),
            Cell::from(current.name.clone()),
            Cell::from("Change"),
        ])
        .style(t.heading);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                let (left, right) = if row.is_missing() {
                    ("N/A".to_string(), "N/A".to_string())
                } else {
                    (
                        row.metric.unit.format(row.baseline.value),
                        row.metric.unit.format(row.current.value),
                    )
                };
                Row::new(vec![
                    Cell::from(row.metric.label),
                    Cell::from(Line::from(left).right_aligned()),
                    Cell::from(Line::from(right).right_aligned()),
                    Cell::from(Span::styled(change_cell(row), t.verdict_style(row.verdict))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .column_spacing(2)
        .row_highlight_style(t.selected);

        let mut state = TableState::default().with_selected(Some(self.cursor));
        StatefulWidget::render(table, table_area, buf, &mut state);

        if let Some(row) = self.rows.get(self.cursor) {
            let desc = row.metric.description().unwrap_or("");
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{}: ", row.metric.key), t.heading),
                Span::styled(desc, t.muted),
            ]))
            .wrap(Wrap { trim: true })
            .render(desc_area, buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nstat_core::config::Config;
    use nstat_core::{diff, SnapshotStore};
    use serde_json::json;

    fn render_text(widget: Comparison<'_>, area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn prompts_until_both_sides_are_picked() {
        let theme = Theme::load_default();
        let keys = KeybindingsConfig::default();
        let text = render_text(
            Comparison::new(None, None, &[], 0, PresencePolicy::Reported, &keys, true, &theme),
            Rect::new(0, 0, 80, 6),
        );
        assert!(text.contains("Pick two snapshots to compare."));
        assert!(text.contains("press b for baseline, c for current"));
    }

    #[test]
    fn prompt_names_the_configured_keys() {
        let theme = Theme::load_default();
        let cfg = Config::from_toml_str("[keybindings]\nset_baseline = \"x\"\nset_current = \"y\"\n")
            .unwrap();
        let text = render_text(
            Comparison::new(
                None,
                None,
                &[],
                0,
                PresencePolicy::Reported,
                &cfg.keybindings,
                true,
                &theme,
            ),
            Rect::new(0, 0, 80, 6),
        );
        assert!(text.contains("press x for baseline, y for current"));
    }

    #[test]
    fn missing_rows_render_as_na() {
        let mut store = SnapshotStore::new();
        let a = store.add("before", json!({ "nrThunks": 100, "gc": { "heapSize": 1, "totalBytes": 1, "cycles": 1 } }));
        let b = store.add("after", json!({ "nrThunks": 50 }));
        let (a, b) = (store.get(a).unwrap(), store.get(b).unwrap());
        let rows = diff(a, b);
        let theme = Theme::load_default();
        let keys = KeybindingsConfig::default();

        let text = render_text(
            Comparison::new(Some(a), Some(b), &rows, 0, PresencePolicy::Reported, &keys, true, &theme),
            Rect::new(0, 0, 100, 30),
        );
        let heap = text.lines().find(|l| l.contains("GC Heap")).expect("heap row");
        assert_eq!(heap.matches("N/A").count(), 3, "row was {heap:?}");
        assert!(text.contains("↓ 50.00% improved"));
        assert!(text.contains("presence: reported"));
    }
}
