//! Main application state and TUI event loop for the pickup dashboard.
//!
//! [`App`] owns the theme, the per-session state, keyboard focus, and the
//! [`Dashboard`] once the dataset has arrived. Key presses are translated into
//! the dashboard's handlers; every frame is drawn from the latest
//! [`RenderOutcome`].

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use pickup_core::models::HourBucket;
use pickup_core::session::Session;
use pickup_runtime::dashboard::{Dashboard, DashboardView, RenderOutcome};
use pickup_runtime::orchestrator::LoadEvent;

use crate::components::controls::{ClickButton, DatePicker, Endpoint, HourSelector};
use crate::components::header::Header;
use crate::themes::Theme;
use crate::{chart_view, map_view, table_view};

/// Rows moved by PageUp / PageDown.
const PAGE_SIZE: usize = 10;

/// Width of the sidebar holding the controls.
const SIDEBAR_WIDTH: u16 = 34;

// ── Focus ─────────────────────────────────────────────────────────────────────

/// Sidebar control receiving the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    StartDate,
    EndDate,
    HourBucket,
    Button,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::StartDate,
        Focus::EndDate,
        Focus::HourBucket,
        Focus::Button,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

// ── LoadStatus ────────────────────────────────────────────────────────────────

/// Progress of the initial dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Done,
    Failed(String),
}

impl LoadStatus {
    /// Status text shown in the header.
    pub fn text(&self) -> &str {
        match self {
            LoadStatus::Loading => "Loading data...",
            LoadStatus::Done => "Done!",
            LoadStatus::Failed(_) => "Load failed",
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the pickup dashboard TUI.
pub struct App {
    pub theme: Theme,
    /// Source shown in the header.
    pub source: String,
    /// Per-user state that outlives individual filter passes.
    pub session: Session,
    pub focus: Focus,
    pub status: LoadStatus,
    /// `None` until the dataset has been loaded.
    pub dashboard: Option<Dashboard>,
    /// First table row on screen.
    pub table_offset: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    initial_bucket: HourBucket,
}

impl App {
    pub fn new(theme_name: &str, source: String, initial_bucket: HourBucket) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            session: Session::new(),
            focus: Focus::default(),
            status: LoadStatus::Loading,
            dashboard: None,
            table_offset: 0,
            should_quit: false,
            initial_bucket,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard, receiving the loaded dataset from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// the terminal loop stays on the current thread while the load result
    /// arrives on the async channel via `try_recv`.
    pub async fn run(mut self, mut rx: mpsc::Receiver<LoadEvent>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut receiving = true;

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            while receiving {
                match rx.try_recv() {
                    Ok(event) => self.apply_load_event(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        if self.status == LoadStatus::Loading {
                            self.status =
                                LoadStatus::Failed("load task ended without a result".into());
                        }
                        receiving = false;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State updates ─────────────────────────────────────────────────────────

    /// Store the outcome of the background load.
    pub fn apply_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded(dataset) => {
                tracing::info!(rows = dataset.len(), "dashboard ready");
                self.dashboard = Some(Dashboard::new(dataset, self.initial_bucket));
                self.status = LoadStatus::Done;
                self.table_offset = 0;
            }
            LoadEvent::Failed(message) => {
                self.status = LoadStatus::Failed(message);
            }
        }
    }

    /// Translate one key press into state changes.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.click();
                return;
            }
            KeyCode::PageDown => {
                self.scroll_table(PAGE_SIZE as isize);
                return;
            }
            KeyCode::PageUp => {
                self.scroll_table(-(PAGE_SIZE as isize));
                return;
            }
            KeyCode::Enter | KeyCode::Char(' ') if self.focus == Focus::Button => {
                self.click();
                return;
            }
            _ => {}
        }

        let Some(dashboard) = self.dashboard.as_mut() else {
            return;
        };

        let changed = match (self.focus, key.code) {
            (Focus::StartDate, KeyCode::Left) => {
                dashboard.shift_start_date(-1);
                true
            }
            (Focus::StartDate, KeyCode::Right) => {
                dashboard.shift_start_date(1);
                true
            }
            (Focus::StartDate, KeyCode::Backspace | KeyCode::Delete) => {
                dashboard.clear_start_date();
                true
            }
            (Focus::EndDate, KeyCode::Left) => {
                dashboard.shift_end_date(-1);
                true
            }
            (Focus::EndDate, KeyCode::Right) => {
                dashboard.shift_end_date(1);
                true
            }
            (Focus::EndDate, KeyCode::Backspace | KeyCode::Delete) => {
                dashboard.clear_end_date();
                true
            }
            (Focus::HourBucket, KeyCode::Right | KeyCode::Down) => {
                let next = dashboard.hour_bucket().next();
                dashboard.select_hour_bucket(next);
                true
            }
            (Focus::HourBucket, KeyCode::Left | KeyCode::Up) => {
                let previous = dashboard.hour_bucket().previous();
                dashboard.select_hour_bucket(previous);
                true
            }
            _ => false,
        };

        if changed {
            self.table_offset = 0;
        }
    }

    /// Press the counter button.
    ///
    /// Ignored unless the last pass produced a view: a halted pass never
    /// reaches the button.
    pub fn click(&mut self) {
        if let Some(dashboard) = self.dashboard.as_ref() {
            if dashboard.outcome().view().is_some() {
                dashboard.on_click(&mut self.session);
            }
        }
    }

    fn scroll_table(&mut self, delta: isize) {
        let Some(view) = self.dashboard.as_ref().and_then(|d| d.outcome().view()) else {
            return;
        };
        let last = view.records.len().saturating_sub(1);
        self.table_offset = self.table_offset.saturating_add_signed(delta).min(last);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let header = Header::new(&self.source, self.status.text(), &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(chunks[1]);

        self.render_sidebar(frame, body[0]);
        self.render_main(frame, body[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let (selection, bounds, bucket, enabled) = match &self.dashboard {
            Some(d) => (
                d.selection(),
                d.date_bounds(),
                d.hour_bucket(),
                d.outcome().view().is_some(),
            ),
            None => (Default::default(), None, self.initial_bucket, false),
        };

        let focused_endpoint = match self.focus {
            Focus::StartDate => Some(Endpoint::Start),
            Focus::EndDate => Some(Endpoint::End),
            _ => None,
        };

        let mut lines = DatePicker {
            selection,
            bounds,
            focused: focused_endpoint,
            theme,
        }
        .to_lines();
        lines.push(Line::from(""));
        lines.extend(
            HourSelector {
                selected: bucket,
                focused: self.focus == Focus::HourBucket,
                theme,
            }
            .to_lines(),
        );
        lines.push(Line::from(""));
        lines.push(
            ClickButton {
                focused: self.focus == Focus::Button,
                enabled,
                theme,
            }
            .to_line(),
        );

        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(" Filters "),
            ),
            area,
        );
    }

    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let dashboard = match (&self.dashboard, &self.status) {
            (Some(d), _) => d,
            (None, LoadStatus::Failed(message)) => {
                table_view::render_message(frame, area, message, theme.error, theme);
                return;
            }
            (None, _) => {
                table_view::render_message(frame, area, "Loading data...", theme.info, theme);
                return;
            }
        };

        match dashboard.outcome() {
            RenderOutcome::Halted(warning) => {
                table_view::render_message(frame, area, warning.message(), theme.warning, theme);
            }
            RenderOutcome::Failed(message) => {
                table_view::render_message(frame, area, message, theme.error, theme);
            }
            RenderOutcome::Ready(view) => self.render_view(frame, area, dashboard, view),
        }
    }

    fn render_view(
        &self,
        frame: &mut Frame,
        area: Rect,
        dashboard: &Dashboard,
        view: &DashboardView,
    ) {
        let theme = &self.theme;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(40),
                Constraint::Min(6),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(view.caption.clone(), theme.info),
                Span::styled(format!("  ({})", view.date_range), theme.dim),
            ])),
            rows[0],
        );

        table_view::render_records_table(
            frame,
            rows[1],
            &view.records,
            dashboard.dataset().len(),
            self.table_offset,
            theme,
        );

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);

        chart_view::render_minute_chart(frame, charts[0], &view.histogram, view.hour_bucket, theme);
        map_view::render_hex_map(
            frame,
            charts[1],
            &view.hexagons,
            dashboard.layer(),
            dashboard.view_state(),
            theme,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let mut spans = Vec::new();
        let ready = self
            .dashboard
            .as_ref()
            .is_some_and(|d| d.outcome().view().is_some());
        if ready {
            spans.push(Span::styled(self.session.counter.message(), theme.success));
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            "Tab focus · ←/→ change · ⌫ clear · c click · PgUp/PgDn scroll · q quit",
            theme.dim,
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
