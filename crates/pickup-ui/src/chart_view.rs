//! Per-minute pickup histogram drawn as a [`BarChart`].

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use pickup_core::aggregator::MinuteHistogram;
use pickup_core::models::HourBucket;

use crate::themes::Theme;

/// Width and gap of each bar so that `bars` of them fit in `inner_width`.
///
/// Bars never get narrower than one column; if they still do not fit, the
/// chart simply clips on the right.
fn bar_geometry(bars: usize, inner_width: u16) -> (u16, u16) {
    if bars == 0 {
        return (1, 0);
    }
    let per_bar = (inner_width as usize / bars).max(1) as u16;
    match per_bar {
        1 => (1, 0),
        2 => (2, 0),
        n => (n - 1, 1),
    }
}

/// Title line above the chart, e.g. `"Number of pickups by minute at 06:00 - 11:59"`.
pub fn chart_title(bucket: HourBucket) -> String {
    format!("Number of pickups by minute at {}", bucket.label())
}

/// Render `histogram` into `area`.
///
/// One bar per minute that has at least one pickup; the x label is the minute,
/// the value is the number of pickups.
pub fn render_minute_chart(
    frame: &mut Frame,
    area: Rect,
    histogram: &MinuteHistogram,
    bucket: HourBucket,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Line::styled(format!(" {} ", chart_title(bucket)), theme.header))
        .title_bottom(Line::styled(" Pickups per minute · x: Minute ", theme.dim));

    let inner_width = area.width.saturating_sub(2);
    let (bar_width, bar_gap) = bar_geometry(histogram.len(), inner_width);

    let bars: Vec<Bar> = histogram
        .to_bars()
        .into_iter()
        .map(|(minute, count)| {
            let bar = Bar::default().value(count);
            if bar_width >= minute.len() as u16 {
                bar.label(Line::from(minute))
            } else {
                bar
            }
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(histogram.max_count().max(1))
        .bar_style(theme.chart_bar)
        .value_style(theme.chart_value)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
