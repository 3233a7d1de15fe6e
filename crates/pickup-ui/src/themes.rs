use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. If the variable is
/// absent or unparseable, `BackgroundType::Unknown` is returned.
pub fn detect_background() -> BackgroundType {
    match std::env::var("COLORFGBG") {
        Ok(val) => background_from_colorfgbg(&val),
        Err(_) => BackgroundType::Unknown,
    }
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().map(str::parse::<u8>) {
        Some(Ok(bg)) if bg <= 6 => BackgroundType::Dark,
        Some(Ok(_)) => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Every style used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Sidebar controls ─────────────────────────────────────────────────────
    /// Border of the control that has keyboard focus.
    pub focus: Style,
    pub button: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    // ── Chart ────────────────────────────────────────────────────────────────
    pub chart_bar: Style,
    pub chart_value: Style,

    // ── Map ──────────────────────────────────────────────────────────────────
    /// Hexagons below a third of the tallest column.
    pub map_low: Style,
    pub map_medium: Style,
    /// Hexagons at or above two thirds of the tallest column.
    pub map_high: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            focus: Style::default().fg(Color::Yellow),
            button: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            chart_bar: Style::default().fg(Color::Cyan),
            chart_value: Style::default().fg(Color::Black).bg(Color::Cyan),

            map_low: Style::default().fg(Color::Yellow),
            map_medium: Style::default().fg(Color::LightRed),
            map_high: Style::default().fg(Color::Red),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            focus: Style::default().fg(Color::Magenta),
            button: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            chart_bar: Style::default().fg(Color::Blue),
            chart_value: Style::default().fg(Color::White).bg(Color::Blue),

            map_low: Style::default().fg(Color::Green),
            map_medium: Style::default().fg(Color::Magenta),
            map_high: Style::default().fg(Color::Red),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focus: Style::default().fg(Color::Yellow),
            button: Style::default().fg(Color::Black).bg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            chart_bar: Style::default().fg(Color::Green),
            chart_value: Style::default().fg(Color::Black).bg(Color::Green),

            map_low: Style::default().fg(Color::Green),
            map_medium: Style::default().fg(Color::Yellow),
            map_high: Style::default().fg(Color::Red),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names and `"auto"` detect.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Map style for a hexagon whose elevation is `ratio` of the maximum.
    ///
    /// * `< 1/3`   → `map_low`
    /// * `1/3–2/3` → `map_medium`
    /// * `≥ 2/3`   → `map_high`
    pub fn map_style(&self, ratio: f64) -> Style {
        if ratio >= 2.0 / 3.0 {
            self.map_high
        } else if ratio >= 1.0 / 3.0 {
            self.map_medium
        } else {
            self.map_low
        }
    }

    /// Foreground colour of [`Self::map_style`], for canvas shapes.
    pub fn map_color(&self, ratio: f64) -> Color {
        self.map_style(ratio).fg.unwrap_or(Color::Reset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
