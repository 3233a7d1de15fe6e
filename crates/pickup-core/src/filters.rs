//! Date and hour-of-day filters over a [`Dataset`].
//!
//! Both filters are pure: they return a new dataset and never touch their
//! input. The dashboard always applies them in the same order, date first,
//! via [`apply_filters`].

use tracing::debug;

use crate::error::{PickupError, Result};
use crate::models::{Dataset, DateRange, HourBucket};

/// Keep the records whose calendar date lies within `range` (inclusive).
pub fn filter_by_date(dataset: &Dataset, range: DateRange) -> Dataset {
    dataset.filtered(|r| range.contains(r.date()))
}

/// Keep the records whose hour lies within `bucket` (inclusive).
pub fn filter_by_hour(dataset: &Dataset, bucket: HourBucket) -> Dataset {
    dataset.filtered(|r| bucket.contains(r.hour()))
}

/// Date filter followed by hour filter.
///
/// Fails with [`PickupError::NoDataForRange`] when the date filter alone
/// leaves nothing; an empty result after the hour filter is returned as-is.
pub fn apply_filters(dataset: &Dataset, range: DateRange, bucket: HourBucket) -> Result<Dataset> {
    let by_date = filter_by_date(dataset, range);
    if by_date.is_empty() {
        debug!("date filter {} matched no records", range);
        return Err(PickupError::NoDataForRange {
            start: range.start(),
            end: range.end(),
        });
    }

    let by_hour = filter_by_hour(&by_date, bucket);
    debug!(
        total = dataset.len(),
        by_date = by_date.len(),
        by_hour = by_hour.len(),
        "filters applied for {} / {}",
        range,
        bucket.label()
    );
    Ok(by_hour)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PickupRecord;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: u32, h: u32, min: u32) -> PickupRecord {
        let ts = date(2014, 9, d).and_hms_opt(h, min, 0).unwrap();
        PickupRecord::new(ts, 40.75, -73.98)
    }

    /// One record for every (day, hour) over the first five days of the month.
    fn grid() -> Dataset {
        let mut records = Vec::new();
        for d in 1..=5 {
            for h in 0..24 {
                records.push(record(d, h, (d * h) % 60));
            }
        }
        Dataset::from_records(records)
    }

    // ── filter_by_date ────────────────────────────────────────────────────────

    #[test]
    fn test_date_filter_keeps_exactly_matching_records() {
        let ds = grid();
        let range = DateRange::new(date(2014, 9, 2), date(2014, 9, 3)).unwrap();
        let out = filter_by_date(&ds, range);

        assert!(out.iter().all(|r| range.contains(r.date())));
        let expected = ds.iter().filter(|r| range.contains(r.date())).count();
        assert_eq!(out.len(), expected);
        assert_eq!(out.len(), 48);
    }

    #[test]
    fn test_date_filter_preserves_order_without_duplicates() {
        let ds = grid();
        let range = DateRange::new(date(2014, 9, 1), date(2014, 9, 5)).unwrap();
        let out = filter_by_date(&ds, range);
        assert_eq!(out, ds);
    }

    #[test]
    fn test_date_filter_outside_data_is_empty() {
        let ds = grid();
        let range = DateRange::new(date(2014, 10, 1), date(2014, 10, 31)).unwrap();
        assert!(filter_by_date(&ds, range).is_empty());
    }

    // ── filter_by_hour ────────────────────────────────────────────────────────

    #[test]
    fn test_hour_filter_every_bucket() {
        let ds = grid();
        for bucket in HourBucket::ALL {
            let out = filter_by_hour(&ds, bucket);
            let (start, end) = bucket.hours();
            assert!(out.len() <= ds.len());
            assert!(out.iter().all(|r| r.hour() >= start && r.hour() <= end));
            assert_eq!(out.len(), 5 * (end - start + 1) as usize);
        }
    }

    #[test]
    fn test_hour_filter_all_day_keeps_everything() {
        let ds = grid();
        assert_eq!(filter_by_hour(&ds, HourBucket::AllDay).len(), ds.len());
    }

    // ── apply_filters ─────────────────────────────────────────────────────────

    #[test]
    fn test_apply_filters_worked_example() {
        let ds = Dataset::from_records(vec![record(1, 0, 2), record(1, 0, 2), record(2, 8, 0)]);
        let range = DateRange::single_day(date(2014, 9, 1));
        let out = apply_filters(&ds, range, HourBucket::Night).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_apply_filters_composes_date_then_hour() {
        let ds = grid();
        let range = DateRange::single_day(date(2014, 9, 4));
        let out = apply_filters(&ds, range, HourBucket::Evening).unwrap();
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|r| r.date() == date(2014, 9, 4) && r.hour() >= 18));
    }

    #[test]
    fn test_apply_filters_no_data_for_range() {
        let ds = grid();
        let range = DateRange::new(date(2014, 9, 20), date(2014, 9, 21)).unwrap();
        let err = apply_filters(&ds, range, HourBucket::AllDay).unwrap_err();
        assert!(matches!(err, PickupError::NoDataForRange { .. }));
    }

    #[test]
    fn test_apply_filters_empty_hour_result_is_not_an_error() {
        let ds = Dataset::from_records(vec![record(1, 8, 0)]);
        let range = DateRange::single_day(date(2014, 9, 1));
        let out = apply_filters(&ds, range, HourBucket::Night).unwrap();
        assert!(out.is_empty());
    }
}
