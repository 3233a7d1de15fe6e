//! Timestamp parsing for pickup tables.
//!
//! Source tables carry naive local timestamps in a handful of layouts; the
//! NYC dataset uses `9/1/2014 0:01:00`. Times are kept naive since every
//! filter works on wall-clock date and hour.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::error::{PickupError, Result};

/// Layouts tried in order by [`parse_pickup_timestamp`].
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp cell into a [`NaiveDateTime`].
pub fn parse_pickup_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PickupError::TimestampParse(raw.to_string()));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| PickupError::TimestampParse(raw.to_string()))
}

/// Shift `date` by `days` (negative moves back), clamped to `[min, max]`.
pub fn shift_date_clamped(date: NaiveDate, days: i64, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_us_layout() {
        let ts = parse_pickup_timestamp("9/1/2014 0:01:00").unwrap();
        assert_eq!(ts.date(), date(2014, 9, 1));
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.minute(), 1);
    }

    #[test]
    fn test_parse_us_layout_without_seconds() {
        let ts = parse_pickup_timestamp("09/30/2014 22:57").unwrap();
        assert_eq!(ts.date(), date(2014, 9, 30));
        assert_eq!(ts.hour(), 22);
        assert_eq!(ts.minute(), 57);
    }

    #[test]
    fn test_parse_iso_layouts() {
        let a = parse_pickup_timestamp("2014-09-02 08:00:00").unwrap();
        let b = parse_pickup_timestamp("2014-09-02T08:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hour(), 8);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(parse_pickup_timestamp("  9/1/2014 0:01:00 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_pickup_timestamp("yesterday"),
            Err(PickupError::TimestampParse(_))
        ));
        assert!(parse_pickup_timestamp("").is_err());
        assert!(parse_pickup_timestamp("13/45/2014 0:00:00").is_err());
    }

    #[test]
    fn test_shift_date_clamped() {
        let min = date(2014, 9, 1);
        let max = date(2014, 9, 30);
        assert_eq!(shift_date_clamped(date(2014, 9, 10), 1, min, max), date(2014, 9, 11));
        assert_eq!(shift_date_clamped(date(2014, 9, 10), -3, min, max), date(2014, 9, 7));
        assert_eq!(shift_date_clamped(date(2014, 9, 1), -1, min, max), min);
        assert_eq!(shift_date_clamped(date(2014, 9, 30), 5, min, max), max);
    }
}
