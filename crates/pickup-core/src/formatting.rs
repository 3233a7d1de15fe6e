use crate::models::HourBucket;

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use pickup_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a coordinate in decimal degrees with four decimals (~11 m).
///
/// # Examples
///
/// ```
/// use pickup_core::formatting::format_coordinate;
///
/// assert_eq!(format_coordinate(40.7128), "40.7128");
/// assert_eq!(format_coordinate(-74.006), "-74.0060");
/// ```
pub fn format_coordinate(degrees: f64) -> String {
    format!("{:.4}", degrees)
}

/// Caption describing the hours covered by `bucket`.
///
/// # Examples
///
/// ```
/// use pickup_core::formatting::hour_span_caption;
/// use pickup_core::models::HourBucket;
///
/// assert_eq!(
///     hour_span_caption(HourBucket::Morning),
///     "Showing data from 06:00 to 11:59"
/// );
/// ```
pub fn hour_span_caption(bucket: HourBucket) -> String {
    let (start, end) = bucket.hours();
    format!("Showing data from {:02}:00 to {:02}:59", start, end)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// `"1,234 of 10,000 pickups (12.3%)"`.
pub fn share_summary(shown: usize, total: usize) -> String {
    format!(
        "{} of {} pickups ({:.1}%)",
        format_count(shown as u64),
        format_count(total as u64),
        percentage(shown as f64, total as f64, 1)
    )
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
