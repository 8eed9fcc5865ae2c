//! Help popup: centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use nstat_core::config::KeybindingsConfig;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    theme: &'a Theme,
    keys: &'a KeybindingsConfig,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme, keys: &'a KeybindingsConfig) -> Self {
        Self { theme, keys }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, 22, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" nstat keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let bindings: Vec<(String, &str)> = vec![
            ("q  /  Ctrl+c".into(), "Quit"),
            ("Tab".into(), "Cycle focus: snapshots → view"),
            ("1  /  2".into(), "Dashboard / comparison view"),
            ("↑ k  /  ↓ j".into(), "Move cursor"),
            ("Enter".into(), "Show snapshot on the dashboard"),
            (self.keys.set_baseline.clone(), "Set baseline to snapshot under cursor"),
            (self.keys.set_current.clone(), "Set current to snapshot under cursor"),
            (self.keys.delete.clone(), "Delete snapshot under cursor"),
            ("PageUp  /  Ctrl+u".into(), "Scroll view up"),
            ("PageDown / Ctrl+d".into(), "Scroll view down"),
            (":".into(), "Command line"),
            (":load <path>".into(), "Add a snapshot from a stats file"),
            (":paste <json>".into(), "Add a snapshot from inline JSON"),
            (":rename <name>".into(), "Rename snapshot under cursor"),
            (":swap".into(), "Swap baseline and current"),
            (":presence <mode>".into(), "reported | typed"),
            (":theme <name>".into(), "default | gruvbox"),
            ("?".into(), "Toggle this help popup"),
        ];

        let lines: Vec<Line> = bindings
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {key:<22}"), self.theme.heading.add_modifier(Modifier::BOLD)),
                    Span::raw(desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
