//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. All state changes go
//! through [`AppState::handle`], which never touches the terminal.

use crate::{
    commands::Command,
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        comparison::Comparison,
        dashboard::Dashboard,
        help::HelpPopup,
        snapshot_list::{SnapshotList, SnapshotListState},
        tab_bar::TabBar,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nstat_core::{
    config::{Config, KeybindingsConfig},
    diff_with_policy,
    metrics::TRACKED_METRICS,
    source::Source,
    SnapshotId, SnapshotStore,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};

// ---------------------------------------------------------------------------
// Focus + view types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Snapshots,
    /// The dashboard or comparison pane.
    Main,
    /// Vim-style `:` command line is active.
    Command,
}

/// What the main pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Compare,
}

impl View {
    pub const ALL: [View; 2] = [View::Dashboard, View::Compare];

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "1:dashboard",
            View::Compare => "2:compare",
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: SnapshotStore,
    pub list: SnapshotListState,
    pub view: View,
    pub baseline: Option<SnapshotId>,
    pub current: Option<SnapshotId>,
    pub focus: Focus,
    /// Focus before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub dashboard_scroll: u16,
    /// Selected row of the comparison table.
    pub compare_cursor: usize,
    pub quit: bool,
}

impl AppState {
    pub fn new(store: SnapshotStore, config: Config, theme: Theme) -> Self {
        // Two snapshots on the command line open straight into a comparison.
        let ids: Vec<SnapshotId> = store.iter().map(|s| s.id).collect();
        let (baseline, current, view) = match ids.as_slice() {
            [.., a, b] => (Some(*a), Some(*b), View::Compare),
            [a] => (None, Some(*a), View::Dashboard),
            [] => (None, None, View::Dashboard),
        };

        Self {
            store,
            list: SnapshotListState::default(),
            view,
            baseline,
            current,
            focus: Focus::Snapshots,
            prev_focus: Focus::Snapshots,
            theme,
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            dashboard_scroll: 0,
            compare_cursor: 0,
            quit: false,
        }
    }

    /// Apply one event to the state.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.focus == Focus::Command {
            self.handle_command_mode(event);
            return;
        }

        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Snapshots => Focus::Main,
                    Focus::Main | Focus::Command => Focus::Snapshots,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }
            AppEvent::ShowDashboard => self.view = View::Dashboard,
            AppEvent::ShowCompare => self.view = View::Compare,
            AppEvent::ScrollUp => self.scroll(-10),
            AppEvent::ScrollDown => self.scroll(10),
            AppEvent::Enter if self.focus == Focus::Snapshots => {
                self.view = View::Dashboard;
                self.dashboard_scroll = 0;
            }
            AppEvent::Char(c) => self.handle_binding(c),
            AppEvent::Nav(dir) => match self.focus {
                Focus::Snapshots => {
                    let before = self.list.cursor;
                    self.list.handle(&AppEvent::Nav(dir), self.store.len());
                    if self.list.cursor != before {
                        self.dashboard_scroll = 0;
                    }
                }
                Focus::Main => self.nav_main(dir),
                Focus::Command => {}
            },
            _ => {}
        }
    }

    fn handle_command_mode(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Quit => self.quit = true,
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    if let Err(msg) = self.execute(cmd) {
                        // Reopen the bar to show what went wrong.
                        self.focus = Focus::Command;
                        self.command_bar.error = Some(msg);
                    }
                }
                Err(msg) if msg.is_empty() => {
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                Err(msg) => self.command_bar.error = Some(msg),
            },
            other => self.command_bar.handle(&other),
        }
    }

    /// Configured single-key actions on the snapshot under the cursor.
    fn handle_binding(&mut self, c: char) {
        let keys = &self.config.keybindings;
        let Some(id) = self.list.selected(&self.store) else {
            return;
        };
        if Some(c) == KeybindingsConfig::key(&keys.set_baseline) {
            tracing::debug!(%id, "baseline set");
            self.baseline = Some(id);
        } else if Some(c) == KeybindingsConfig::key(&keys.set_current) {
            tracing::debug!(%id, "current set");
            self.current = Some(id);
        } else if Some(c) == KeybindingsConfig::key(&keys.delete) {
            self.delete(id);
        }
    }

    fn nav_main(&mut self, dir: Direction) {
        match (self.view, dir) {
            (View::Dashboard, Direction::Up) => self.scroll(-1),
            (View::Dashboard, Direction::Down) => self.scroll(1),
            (View::Compare, Direction::Up) => {
                self.compare_cursor = self.compare_cursor.saturating_sub(1);
            }
            (View::Compare, Direction::Down) => {
                if self.compare_cursor + 1 < TRACKED_METRICS.len() {
                    self.compare_cursor += 1;
                }
            }
            _ => {}
        }
    }

    fn scroll(&mut self, by: i32) {
        match self.view {
            View::Dashboard => {
                self.dashboard_scroll = (i32::from(self.dashboard_scroll) + by).clamp(0, 2000) as u16;
            }
            View::Compare => {
                let max = TRACKED_METRICS.len() as i32 - 1;
                self.compare_cursor = (self.compare_cursor as i32 + by).clamp(0, max) as usize;
            }
        }
    }

    /// Execute a parsed [`Command`]. `Err` carries a message for the bar.
    fn execute(&mut self, cmd: Command) -> Result<(), String> {
        match cmd {
            Command::Quit => self.quit = true,
            Command::Help => self.show_help = !self.show_help,
            Command::Theme(name) => self.theme = Theme::by_name(&name),
            Command::Load(path) => self.load(Source::File(path))?,
            Command::Paste(text) => self.load(Source::Text(text))?,
            Command::Rename(name) => {
                let id = self.list.selected(&self.store).ok_or("no snapshot selected")?;
                self.store.rename(id, name);
            }
            Command::Baseline(id) => self.baseline = Some(self.known(id)?),
            Command::Current(id) => self.current = Some(self.known(id)?),
            Command::Delete(id) => {
                let id = match id {
                    Some(id) => self.known(id)?,
                    None => self.list.selected(&self.store).ok_or("no snapshot selected")?,
                };
                self.delete(id);
            }
            Command::Swap => std::mem::swap(&mut self.baseline, &mut self.current),
            Command::Presence(policy) => self.config.compare.presence = policy,
        }
        Ok(())
    }

    fn known(&self, id: SnapshotId) -> Result<SnapshotId, String> {
        self.store
            .get(id)
            .map(|s| s.id)
            .ok_or_else(|| format!("no snapshot {id}"))
    }

    fn load(&mut self, source: Source) -> Result<(), String> {
        let raw = source.read().map_err(|e| {
            tracing::debug!(error = %e, "load failed");
            e.to_string()
        })?;
        let id = self.store.add(source.label(), raw);
        // The newest snapshot becomes current; the previous current moves to baseline.
        if self.current.is_some() {
            self.baseline = self.current;
        }
        self.current = Some(id);
        self.list.cursor = self.store.len() - 1;
        self.dashboard_scroll = 0;
        Ok(())
    }

    fn delete(&mut self, id: SnapshotId) {
        if self.store.remove(id).is_none() {
            return;
        }
        if self.baseline == Some(id) {
            self.baseline = None;
        }
        if self.current == Some(id) {
            self.current = None;
        }
        self.list.clamp(self.store.len());
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(store: SnapshotStore, config: Config, theme: Theme) -> Self {
        App { state: AppState::new(store, config, theme) }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if self.state.focus == Focus::Command {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line tab bar | body
    let [tabs_area, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    let pct = state.config.ui.snapshot_pane_width_pct.min(80);
    let [list_area, main_area] =
        Layout::horizontal([Constraint::Percentage(pct), Constraint::Fill(1)]).areas(body);

    frame.render_widget(TabBar::new(state.view, &state.theme), tabs_area);
    frame.render_widget(
        SnapshotList::new(
            &state.store,
            &state.list,
            state.baseline,
            state.current,
            state.focus == Focus::Snapshots,
            &state.theme,
        ),
        list_area,
    );

    let main_focused = state.focus == Focus::Main;
    match state.view {
        View::Dashboard => {
            let snapshot = state.store.at(state.list.cursor);
            frame.render_widget(
                Dashboard::new(
                    snapshot,
                    state.dashboard_scroll,
                    state.config.ui.top_n,
                    main_focused,
                    &state.theme,
                ),
                main_area,
            );
        }
        View::Compare => {
            let baseline = state.baseline.and_then(|id| state.store.get(id));
            let current = state.current.and_then(|id| state.store.get(id));
            let rows = match (baseline, current) {
                (Some(b), Some(c)) => diff_with_policy(b, c, state.config.compare.presence),
                _ => Vec::new(),
            };
            frame.render_widget(
                Comparison::new(
                    baseline,
                    current,
                    &rows,
                    state.compare_cursor,
                    state.config.compare.presence,
                    &state.config.keybindings,
                    main_focused,
                    &state.theme,
                ),
                main_area,
            );
        }
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme, &state.config.keybindings), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
