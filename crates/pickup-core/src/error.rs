use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the pickup dashboard core.
#[derive(Error, Debug)]
pub enum PickupError {
    /// One or both ends of the date selection are missing.
    #[error("Incomplete date range: both a start and an end date are required")]
    IncompleteDateRange,

    /// The start date lies after the end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Filtering by date left nothing to show.
    #[error("No data available between {start} and {end}")]
    NoDataForRange { start: NaiveDate, end: NaiveDate },

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A label or key did not name one of the fixed hour buckets.
    #[error("Unknown hour bucket: {0}")]
    UnknownHourBucket(String),

    /// Reading or writing the persisted settings file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PickupError {
    /// `true` for the errors produced by an unusable date selection.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            PickupError::IncompleteDateRange | PickupError::InvalidDateRange { .. }
        )
    }
}

/// Convenience alias used throughout the pickup crates.
pub type Result<T> = std::result::Result<T, PickupError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_error_display_invalid_range() {
        let err = PickupError::InvalidDateRange {
            start: date(2014, 9, 5),
            end: date(2014, 9, 1),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2014-09-05 is after 2014-09-01"
        );
    }

    #[test]
    fn test_error_display_no_data() {
        let err = PickupError::NoDataForRange {
            start: date(2014, 10, 1),
            end: date(2014, 10, 2),
        };
        assert_eq!(
            err.to_string(),
            "No data available between 2014-10-01 and 2014-10-02"
        );
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = PickupError::TimestampParse("not-a-timestamp".to_string());
        assert_eq!(err.to_string(), "Invalid timestamp format: not-a-timestamp");
    }

    #[test]
    fn test_is_range_error() {
        assert!(PickupError::IncompleteDateRange.is_range_error());
        assert!(PickupError::InvalidDateRange {
            start: date(2014, 9, 2),
            end: date(2014, 9, 1),
        }
        .is_range_error());
        assert!(!PickupError::NoDataForRange {
            start: date(2014, 9, 1),
            end: date(2014, 9, 1),
        }
        .is_range_error());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PickupError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
