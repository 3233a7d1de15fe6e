use chrono::NaiveDate;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use pickup_core::models::{DateSelection, HourBucket};

use crate::themes::Theme;

/// Marker shown before the focused control.
const FOCUS_MARKER: &str = "▶ ";
const BLANK_MARKER: &str = "  ";

/// Which endpoint of the date picker a line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

fn marker(focused: bool, theme: &Theme) -> Span<'static> {
    if focused {
        Span::styled(FOCUS_MARKER, theme.focus)
    } else {
        Span::raw(BLANK_MARKER)
    }
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|| "----/--/--".to_string())
}

// ── DatePicker ────────────────────────────────────────────────────────────────

/// Start and end fields of the date range filter.
pub struct DatePicker<'a> {
    pub selection: DateSelection,
    /// Earliest and latest selectable dates, if the dataset has any rows.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    /// Endpoint with keyboard focus, if any.
    pub focused: Option<Endpoint>,
    pub theme: &'a Theme,
}

impl<'a> DatePicker<'a> {
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let theme = self.theme;
        let field = |endpoint: Endpoint, label: &'static str, date: Option<NaiveDate>| {
            let focused = self.focused == Some(endpoint);
            let value_style = match (date, focused) {
                (None, _) => theme.warning,
                (Some(_), true) => theme.focus,
                (Some(_), false) => theme.value,
            };
            Line::from(vec![
                marker(focused, theme),
                Span::styled(label, theme.label),
                Span::styled(date_text(date), value_style),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled("Filter by date range", theme.header)),
            Line::from(Span::styled("Choose a date range", theme.dim)),
            field(Endpoint::Start, "From  ", self.selection.start),
            field(Endpoint::End, "To    ", self.selection.end),
        ];
        if let Some((min, max)) = self.bounds {
            lines.push(Line::from(Span::styled(
                format!("  {} – {}", min.format("%m/%d"), max.format("%m/%d")),
                theme.dim,
            )));
        }
        lines
    }
}

// ── HourSelector ──────────────────────────────────────────────────────────────

/// Drop-down replacement listing the five hour buckets.
pub struct HourSelector<'a> {
    pub selected: HourBucket,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl<'a> HourSelector<'a> {
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let theme = self.theme;
        let mut lines = vec![
            Line::from(Span::styled("Select Hour Range", theme.header)),
            Line::from(Span::styled("Choose hour range", theme.dim)),
        ];
        for bucket in HourBucket::ALL {
            let chosen = bucket == self.selected;
            let style: Style = match (chosen, self.focused) {
                (true, true) => theme.focus,
                (true, false) => theme.value,
                _ => theme.dim,
            };
            lines.push(Line::from(vec![
                marker(chosen && self.focused, theme),
                Span::styled(if chosen { "(•) " } else { "( ) " }, style),
                Span::styled(bucket.label(), style),
            ]));
        }
        lines
    }
}

// ── ClickButton ───────────────────────────────────────────────────────────────

/// The counter button.
pub struct ClickButton<'a> {
    pub focused: bool,
    /// Greyed out while the dashboard is halted or loading.
    pub enabled: bool,
    pub theme: &'a Theme,
}

impl<'a> ClickButton<'a> {
    pub const LABEL: &'static str = " Click me! ";

    pub fn to_line(&self) -> Line<'a> {
        let style = if self.enabled {
            self.theme.button
        } else {
            self.theme.dim
        };
        Line::from(vec![
            marker(self.focused, self.theme),
            Span::styled(Self::LABEL, style),
            Span::styled(" (c)", self.theme.dim),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 9, d).unwrap()
    }

    #[test]
    fn test_date_picker_fields() {
        let theme = Theme::dark();
        let picker = DatePicker {
            selection: DateSelection::new(Some(day(1)), None),
            bounds: Some((day(1), day(30))),
            focused: Some(Endpoint::Start),
            theme: &theme,
        };
        let lines = picker.to_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(text(&lines[2]), "▶ From  2014/09/01");
        assert_eq!(text(&lines[3]), "  To    ----/--/--");
        // An unset endpoint is highlighted as a warning.
        assert_eq!(lines[3].spans[2].style, theme.warning);
    }

    #[test]
    fn test_date_picker_without_bounds() {
        let theme = Theme::dark();
        let picker = DatePicker {
            selection: DateSelection::default(),
            bounds: None,
            focused: None,
            theme: &theme,
        };
        assert_eq!(picker.to_lines().len(), 4);
    }

    #[test]
    fn test_hour_selector_marks_selection() {
        let theme = Theme::dark();
        let selector = HourSelector {
            selected: HourBucket::Afternoon,
            focused: true,
            theme: &theme,
        };
        let lines = selector.to_lines();
        assert_eq!(lines.len(), 2 + HourBucket::ALL.len());

        let chosen: Vec<String> = lines[2..]
            .iter()
            .map(text)
            .filter(|t| t.contains("(•)"))
            .collect();
        assert_eq!(chosen.len(), 1);
        assert!(chosen[0].starts_with(FOCUS_MARKER));
        assert!(chosen[0].contains(HourBucket::Afternoon.label()));
    }

    #[test]
    fn test_click_button_disabled_style() {
        let theme = Theme::dark();
        let line = ClickButton {
            focused: false,
            enabled: false,
            theme: &theme,
        }
        .to_line();
        assert_eq!(line.spans[1].style, theme.dim);
        assert!(text(&line).contains("Click me!"));
    }
}
