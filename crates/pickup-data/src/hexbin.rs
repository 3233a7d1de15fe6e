//! Hexagon binning of pickups for the density map.
//!
//! Points are projected to local metres around the view centre
//! (equirectangular, fine at city scale) and assigned to pointy-top hexagons
//! of circumradius `radius_m` using axial coordinates with cube rounding.
//! Each non-empty hexagon gets an elevation proportional to its count.

use std::collections::BTreeMap;

use pickup_core::models::Dataset;

/// Metres per degree of latitude (and of longitude at the equator).
const METRES_PER_DEGREE: f64 = 111_320.0;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Parameters of the hexagon layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HexagonLayerConfig {
    /// Hexagon circumradius in metres.
    pub radius_m: f64,
    /// Multiplier applied to the interpolated elevation.
    pub elevation_scale: f64,
    /// Elevation assigned to the emptiest and the fullest hexagon.
    pub elevation_range: (f64, f64),
    /// Draw hexagons as columns rather than flat cells.
    pub extruded: bool,
    /// Allow inspecting a hexagon's count.
    pub pickable: bool,
}

impl Default for HexagonLayerConfig {
    fn default() -> Self {
        Self {
            radius_m: 100.0,
            elevation_scale: 4.0,
            elevation_range: (0.0, 1000.0),
            extruded: true,
            pickable: true,
        }
    }
}

impl HexagonLayerConfig {
    /// Highest elevation any hexagon can reach.
    pub fn max_elevation(&self) -> f64 {
        self.elevation_range.1 * self.elevation_scale
    }
}

/// Initial camera of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    /// Camera tilt in degrees.
    pub pitch: f64,
}

impl Default for ViewState {
    /// Lower Manhattan.
    fn default() -> Self {
        Self {
            latitude: 40.7128,
            longitude: -74.0060,
            zoom: 11.0,
            pitch: 50.0,
        }
    }
}

/// Longitude/latitude window of the visible map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl MapBounds {
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.west..=self.east).contains(&longitude) && (self.south..=self.north).contains(&latitude)
    }
}

impl ViewState {
    /// Visible window for a viewport `aspect` (width / height) wide.
    ///
    /// Zoom follows web-mercator tiles: one 256 px tile spans `360 / 2^zoom`
    /// degrees, and the viewport is taken to be four tiles wide.
    pub fn bounds(&self, aspect: f64) -> MapBounds {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let lon_span = 4.0 * 360.0 / 2f64.powf(self.zoom);
        let lat_span = lon_span * self.latitude.to_radians().cos() / aspect;
        MapBounds {
            west: self.longitude - lon_span / 2.0,
            east: self.longitude + lon_span / 2.0,
            south: self.latitude - lat_span / 2.0,
            north: self.latitude + lat_span / 2.0,
        }
    }
}

// ── HexCell ───────────────────────────────────────────────────────────────────

/// One non-empty hexagon.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    /// Axial column.
    pub q: i32,
    /// Axial row.
    pub r: i32,
    pub longitude: f64,
    pub latitude: f64,
    pub count: u64,
    pub elevation: f64,
}

/// Bin every record of `dataset` into hexagons.
///
/// Cells are ordered by `(q, r)`; their counts sum to `dataset.len()`.
pub fn aggregate_hexagons(
    dataset: &Dataset,
    config: &HexagonLayerConfig,
    view: &ViewState,
) -> Vec<HexCell> {
    let projection = Projection::new(view, config.radius_m);

    let mut bins: BTreeMap<(i32, i32), u64> = BTreeMap::new();
    for record in dataset {
        let key = projection.hex_of(record.longitude, record.latitude);
        *bins.entry(key).or_default() += 1;
    }

    let max_count = bins.values().copied().max().unwrap_or(0);
    let (low, high) = config.elevation_range;

    bins.into_iter()
        .map(|((q, r), count)| {
            let (longitude, latitude) = projection.centre_of(q, r);
            let t = if max_count == 0 {
                0.0
            } else {
                count as f64 / max_count as f64
            };
            HexCell {
                q,
                r,
                longitude,
                latitude,
                count,
                elevation: (low + (high - low) * t) * config.elevation_scale,
            }
        })
        .collect()
}

/// The hexagon with the highest count; ties go to the first in `(q, r)` order.
pub fn densest(cells: &[HexCell]) -> Option<&HexCell> {
    cells
        .iter()
        .reduce(|best, cell| if cell.count > best.count { cell } else { best })
}

// ── Projection ────────────────────────────────────────────────────────────────

struct Projection {
    origin_lon: f64,
    origin_lat: f64,
    metres_per_lon: f64,
    metres_per_lat: f64,
    size: f64,
}

impl Projection {
    fn new(view: &ViewState, radius_m: f64) -> Self {
        Self {
            origin_lon: view.longitude,
            origin_lat: view.latitude,
            metres_per_lon: METRES_PER_DEGREE * view.latitude.to_radians().cos(),
            metres_per_lat: METRES_PER_DEGREE,
            size: radius_m.max(1.0),
        }
    }

    fn hex_of(&self, longitude: f64, latitude: f64) -> (i32, i32) {
        let x = (longitude - self.origin_lon) * self.metres_per_lon;
        let y = (latitude - self.origin_lat) * self.metres_per_lat;
        let q = (SQRT_3 / 3.0 * x - y / 3.0) / self.size;
        let r = (2.0 / 3.0 * y) / self.size;
        cube_round(q, r)
    }

    fn centre_of(&self, q: i32, r: i32) -> (f64, f64) {
        let (q, r) = (q as f64, r as f64);
        let x = self.size * (SQRT_3 * q + SQRT_3 / 2.0 * r);
        let y = self.size * (1.5 * r);
        (
            self.origin_lon + x / self.metres_per_lon,
            self.origin_lat + y / self.metres_per_lat,
        )
    }
}

/// Round fractional axial coordinates to the containing hexagon.
fn cube_round(q: f64, r: f64) -> (i32, i32) {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i32, rr as i32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
