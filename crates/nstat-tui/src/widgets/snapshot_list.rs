//! Snapshot list: the left pane, one row per loaded snapshot.
//!
//! Rows are marked `B` for the comparison baseline and `C` for the current
//! side. The cursor picks the snapshot shown on the dashboard and the target
//! of the baseline / current / delete keys.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use nstat_core::{SnapshotId, SnapshotStore};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SnapshotListState {
    /// Index into the store's insertion order.
    pub cursor: usize,
}

impl SnapshotListState {
    pub fn handle(&mut self, event: &AppEvent, len: usize) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::debug!(cursor = self.cursor, "snapshots: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
                tracing::debug!(cursor = self.cursor, "snapshots: cursor down");
            }
            _ => {}
        }
    }

    /// Keep the cursor on a valid row after the store shrinks.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Id of the snapshot under the cursor.
    pub fn selected(&self, store: &SnapshotStore) -> Option<SnapshotId> {
        store.at(self.cursor).map(|s| s.id)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SnapshotList<'a> {
    store: &'a SnapshotStore,
    state: &'a SnapshotListState,
    baseline: Option<SnapshotId>,
    current: Option<SnapshotId>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SnapshotList<'a> {
    pub fn new(
        store: &'a SnapshotStore,
        state: &'a SnapshotListState,
        baseline: Option<SnapshotId>,
        current: Option<SnapshotId>,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { store, state, baseline, current, focused, theme }
    }
}

impl Widget for SnapshotList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!("Snapshots ({})", self.store.len()))
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.store.is_empty() {
            Paragraph::new(vec![
                Line::styled("No snapshots.", self.theme.muted),
                Line::styled(":load <path>", self.theme.muted),
            ])
            .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .store
            .iter()
            .map(|snap| {
                let marker = |side: Option<SnapshotId>, ch: &'static str| {
                    if side == Some(snap.id) { ch } else { " " }
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker(self.baseline, "B"), self.theme.heading),
                    Span::styled(marker(self.current, "C"), self.theme.heading),
                    Span::raw(format!(" {} {}", snap.id, snap.name)),
                    Span::styled(
                        format!("  {}", snap.created_at.format("%H:%M:%S")),
                        self.theme.muted,
                    ),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(self.theme.selected);
        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
