use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Width of the `=` rule under the title.
const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering three lines:
///
/// 1. Application title with decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source and load status in `[ source | status ]` format.
pub struct Header<'a> {
    /// Where the dataset comes from, as given on the command line.
    pub source: &'a str,
    /// Load status text, e.g. "Loading data..." or "Done!".
    pub status: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, status: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            status,
            theme,
        }
    }

    /// Render the header as exactly three lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" UBER PICKUPS NYC ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(source_name(self.source), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.status, self.theme.info),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

/// Last path segment of a URL or path, or the whole string if it has none.
fn source_name(source: &str) -> &str {
    source
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(source)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count() {
        let theme = Theme::dark();
        let header = Header::new("pickups.csv", "Done!", &theme);
        assert_eq!(header.to_lines().len(), 3);
    }

    #[test]
    fn test_header_title() {
        let theme = Theme::dark();
        let lines = Header::new("pickups.csv", "Done!", &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("UBER PICKUPS NYC"), "got: {title}");
        assert!(title.starts_with(ACCENT) && title.ends_with(ACCENT));
    }

    #[test]
    fn test_header_separator() {
        let theme = Theme::dark();
        let lines = Header::new("x", "y", &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line_shows_file_name() {
        let theme = Theme::dark();
        let lines = Header::new(
            "https://s3-us-west-2.amazonaws.com/streamlit-demo-data/uber-raw-data-sep14.csv.gz",
            "Loading data...",
            &theme,
        )
        .to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ uber-raw-data-sep14.csv.gz | Loading data... ]"
        );
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name("/tmp/data/pickups.csv"), "pickups.csv");
        assert_eq!(source_name("pickups.csv"), "pickups.csv");
        assert_eq!(source_name("https://host/dir/"), "dir");
        assert_eq!(source_name(""), "");
    }
}
