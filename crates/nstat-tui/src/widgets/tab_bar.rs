//! Tab bar widget: the strip of views at the top of the screen.

use crate::app::View;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line view strip at the top of the screen.
///
/// The active view is highlighted. Keybinding hints (`q:quit  ?:help`) are
/// right-aligned in the same row.
pub struct TabBar<'a> {
    active: View,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: View, theme: &'a Theme) -> Self {
        Self { active, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = View::ALL
            .iter()
            .map(|view| Line::from(format!(" {} ", view.label())))
            .collect();
        let selected = View::ALL.iter().position(|v| *v == self.active);

        Tabs::new(labels)
            .select(selected)
            .highlight_style(self.theme.selected.add_modifier(Modifier::BOLD))
            .divider("")
            .render(area, buf);

        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(hint_x, area.y, hint, Style::default().add_modifier(Modifier::DIM));
    }
}
