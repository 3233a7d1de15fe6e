//! Raw records table for the filtered pickups.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with the timestamp,
//! coordinates, and any passthrough columns, starting at a scroll offset.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use pickup_core::formatting;
use pickup_core::models::Dataset;

use crate::themes::Theme;

/// Display width of a passthrough column.
const PASSTHROUGH_WIDTH: u16 = 14;

/// Rows hidden by the border and header line.
const TABLE_CHROME_ROWS: u16 = 3;

/// Number of records that fit into a table drawn in an area `height` tall.
pub fn visible_rows(height: u16) -> usize {
    height.saturating_sub(TABLE_CHROME_ROWS) as usize
}

/// Cut `text` to at most `width` display columns, ending with `…` if cut.
fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Render `records` into `area`, skipping the first `offset` rows.
///
/// `total` is the size of the unfiltered dataset; the title reports the share
/// of it that survived the filters.
pub fn render_records_table(
    frame: &mut Frame,
    area: Rect,
    records: &Dataset,
    total: usize,
    offset: usize,
    theme: &Theme,
) {
    let schema = records.schema();

    let mut headers = vec![
        schema.timestamp_column.clone(),
        schema.latitude_column.clone(),
        schema.longitude_column.clone(),
    ];
    headers.extend(schema.passthrough_columns.iter().cloned());
    let header = Row::new(
        headers
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    )
    .height(1);

    let page = visible_rows(area.height);
    let data_rows: Vec<Row> = records
        .iter()
        .enumerate()
        .skip(offset)
        .take(page)
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let mut cells = vec![
                Cell::from(record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                Cell::from(formatting::format_coordinate(record.latitude)),
                Cell::from(formatting::format_coordinate(record.longitude)),
            ];
            cells.extend(
                record
                    .passthrough
                    .iter()
                    .map(|v| Cell::from(fit_width(v, PASSTHROUGH_WIDTH as usize))),
            );
            Row::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(20),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    widths.extend(
        schema
            .passthrough_columns
            .iter()
            .map(|_| Constraint::Length(PASSTHROUGH_WIDTH)),
    );

    let first = if records.is_empty() { 0 } else { offset + 1 };
    let last = (offset + page).min(records.len());
    let title = format!(
        " {} · rows {}–{} ",
        formatting::share_summary(records.len(), total),
        formatting::format_count(first as u64),
        formatting::format_count(last as u64),
    );

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a bordered message in place of the main area.
///
/// Used for the pipeline warnings and the load status screens.
pub fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Uber Pickups NYC "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
