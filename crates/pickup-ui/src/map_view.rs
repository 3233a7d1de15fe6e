//! Hexagon density map drawn on a braille [`Canvas`].
//!
//! Each non-empty hexagon is a point at its centre, coloured by its share of
//! the tallest column. When the layer is extruded, a vertical stroke whose
//! length follows the elevation and the camera pitch stands in for the 3D
//! column.

use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders,
    },
    Frame,
};

use pickup_core::formatting;
use pickup_data::hexbin::{densest, HexCell, HexagonLayerConfig, MapBounds, ViewState};

use crate::themes::Theme;

/// Fraction of the map height the tallest column may take at 90° pitch.
const MAX_COLUMN_SHARE: f64 = 0.25;

/// Geographic width/height ratio of a canvas `width` x `height` cells.
///
/// Terminal cells are roughly twice as tall as they are wide.
fn canvas_aspect(width: u16, height: u16) -> f64 {
    if height == 0 {
        return 1.0;
    }
    width as f64 / (height as f64 * 2.0)
}

/// Elevation of `cell` as a share of the highest possible elevation.
fn elevation_ratio(cell: &HexCell, config: &HexagonLayerConfig) -> f64 {
    let max = config.max_elevation();
    if max <= 0.0 {
        0.0
    } else {
        (cell.elevation / max).clamp(0.0, 1.0)
    }
}

/// Visible cells grouped by colour tier, as canvas coordinates.
fn tiered_points(
    cells: &[HexCell],
    config: &HexagonLayerConfig,
    bounds: &MapBounds,
    theme: &Theme,
) -> Vec<(Color, Vec<(f64, f64)>)> {
    let mut tiers: Vec<(Color, Vec<(f64, f64)>)> = Vec::new();
    for cell in cells {
        if !bounds.contains(cell.longitude, cell.latitude) {
            continue;
        }
        let color = theme.map_color(elevation_ratio(cell, config));
        let point = (cell.longitude, cell.latitude);
        match tiers.iter_mut().find(|(c, _)| *c == color) {
            Some((_, points)) => points.push(point),
            None => tiers.push((color, vec![point])),
        }
    }
    tiers
}

/// Footer text describing the densest hexagon, if any.
pub fn densest_summary(cells: &[HexCell]) -> String {
    match densest(cells) {
        Some(cell) => format!(
            "Densest hexagon: {} pickups at {}, {}",
            formatting::format_count(cell.count),
            formatting::format_coordinate(cell.latitude),
            formatting::format_coordinate(cell.longitude),
        ),
        None => "No pickups to map".to_string(),
    }
}

/// Render the hexagon layer into `area`.
pub fn render_hex_map(
    frame: &mut Frame,
    area: Rect,
    cells: &[HexCell],
    config: &HexagonLayerConfig,
    view: &ViewState,
    theme: &Theme,
) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let bounds = view.bounds(canvas_aspect(inner_width, inner_height));

    let tiers = tiered_points(cells, config, &bounds, theme);
    let column_scale =
        (bounds.north - bounds.south) * MAX_COLUMN_SHARE * view.pitch.to_radians().sin().max(0.0);

    let title = format!(
        " 3D Map of pickups · pitch {}° zoom {} ",
        view.pitch, view.zoom
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Line::styled(title, theme.header))
        .title_bottom(Line::styled(format!(" {} ", densest_summary(cells)), theme.dim));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            if config.extruded && column_scale > 0.0 {
                for cell in cells {
                    if !bounds.contains(cell.longitude, cell.latitude) {
                        continue;
                    }
                    let ratio = elevation_ratio(cell, config);
                    if ratio <= 0.0 {
                        continue;
                    }
                    ctx.draw(&CanvasLine {
                        x1: cell.longitude,
                        y1: cell.latitude,
                        x2: cell.longitude,
                        y2: cell.latitude + ratio * column_scale,
                        color: theme.map_color(ratio),
                    });
                }
                ctx.layer();
            }
            for (color, coords) in &tiers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        });

    frame.render_widget(canvas, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
