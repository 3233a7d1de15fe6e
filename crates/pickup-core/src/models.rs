use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PickupError, Result};

/// A single pickup event read from the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupRecord {
    /// Local wall-clock time of the pickup.
    pub timestamp: NaiveDateTime,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Values of the remaining columns, ordered like
    /// [`DatasetSchema::passthrough_columns`].
    pub passthrough: Vec<String>,
}

impl PickupRecord {
    /// Build a record with no passthrough columns.
    pub fn new(timestamp: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            passthrough: Vec::new(),
        }
    }

    /// Calendar date component of the timestamp.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour-of-day component of the timestamp (0–23).
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Minute-of-hour component of the timestamp (0–59).
    pub fn minute(&self) -> u32 {
        self.timestamp.minute()
    }
}

// ── DatasetSchema ─────────────────────────────────────────────────────────────

/// Lowercased column layout of a loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    /// Every column name in source order, lowercased.
    pub columns: Vec<String>,
    /// Column the timestamps were parsed from.
    pub timestamp_column: String,
    /// Column the latitudes were parsed from.
    pub latitude_column: String,
    /// Column the longitudes were parsed from.
    pub longitude_column: String,
    /// Columns carried through untouched, in source order.
    pub passthrough_columns: Vec<String>,
}

impl DatasetSchema {
    /// Schema for the stock `date/time, lat, lon` layout with no extra columns.
    pub fn basic() -> Self {
        Self {
            columns: vec!["date/time".into(), "lat".into(), "lon".into()],
            timestamp_column: "date/time".into(),
            latitude_column: "lat".into(),
            longitude_column: "lon".into(),
            passthrough_columns: Vec::new(),
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// An ordered, immutable sequence of pickup records.
///
/// Filtering never mutates a dataset; [`Dataset::filtered`] returns a new one
/// sharing the same schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Arc<DatasetSchema>,
    records: Vec<PickupRecord>,
}

impl Dataset {
    pub fn new(schema: DatasetSchema, records: Vec<PickupRecord>) -> Self {
        Self {
            schema: Arc::new(schema),
            records,
        }
    }

    /// Build a dataset with the [`DatasetSchema::basic`] layout.
    pub fn from_records(records: Vec<PickupRecord>) -> Self {
        Self::new(DatasetSchema::basic(), records)
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn records(&self) -> &[PickupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PickupRecord> {
        self.records.iter()
    }

    /// Return a new dataset holding the records for which `keep` is true, in
    /// their original order.
    pub fn filtered(&self, keep: impl Fn(&PickupRecord) -> bool) -> Dataset {
        Dataset {
            schema: Arc::clone(&self.schema),
            records: self.records.iter().filter(|r| keep(*r)).cloned().collect(),
        }
    }

    /// Sorted, de-duplicated calendar dates present in the data.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.records.iter().map(PickupRecord::date).collect();
        dates.into_iter().collect()
    }

    /// Earliest and latest calendar dates, or `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(PickupRecord::date).min()?;
        let max = self.records.iter().map(PickupRecord::date).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a PickupRecord;
    type IntoIter = std::slice::Iter<'a, PickupRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── DateRange / DateSelection ─────────────────────────────────────────────────

/// Inclusive pair of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PickupError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `true` when `date` lies within the range, both ends included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// What the date picker currently holds. Either end may be unset while the
/// user is editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSelection {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Selection spanning the whole of `range`.
    pub fn covering(range: DateRange) -> Self {
        Self {
            start: Some(range.start),
            end: Some(range.end),
        }
    }

    /// Validate the selection into a [`DateRange`].
    pub fn to_range(&self) -> Result<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => Err(PickupError::IncompleteDateRange),
        }
    }
}

// ── HourBucket ────────────────────────────────────────────────────────────────

/// One of the five fixed hour-of-day ranges offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HourBucket {
    /// 00:00 – 05:59
    #[default]
    Night,
    /// 06:00 – 11:59
    Morning,
    /// 12:00 – 17:59
    Afternoon,
    /// 18:00 – 23:59
    Evening,
    /// 00:00 – 23:59
    AllDay,
}

impl HourBucket {
    /// Every bucket in selector order.
    pub const ALL: [HourBucket; 5] = [
        HourBucket::Night,
        HourBucket::Morning,
        HourBucket::Afternoon,
        HourBucket::Evening,
        HourBucket::AllDay,
    ];

    /// Label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            HourBucket::Night => "00:00 - 05:59",
            HourBucket::Morning => "06:00 - 11:59",
            HourBucket::Afternoon => "12:00 - 17:59",
            HourBucket::Evening => "18:00 - 23:59",
            HourBucket::AllDay => "All Day (00:00 - 23:59)",
        }
    }

    /// Short key accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            HourBucket::Night => "night",
            HourBucket::Morning => "morning",
            HourBucket::Afternoon => "afternoon",
            HourBucket::Evening => "evening",
            HourBucket::AllDay => "all-day",
        }
    }

    /// Inclusive `(start_hour, end_hour)` pair.
    pub fn hours(self) -> (u32, u32) {
        match self {
            HourBucket::Night => (0, 5),
            HourBucket::Morning => (6, 11),
            HourBucket::Afternoon => (12, 17),
            HourBucket::Evening => (18, 23),
            HourBucket::AllDay => (0, 23),
        }
    }

    /// `true` when `hour` falls inside the bucket.
    pub fn contains(self, hour: u32) -> bool {
        let (start, end) = self.hours();
        start <= hour && hour <= end
    }

    /// Next bucket in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous bucket in selector order, wrapping around.
    pub fn previous(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Position of the bucket in [`HourBucket::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|b| *b == self).unwrap_or(0)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HourBucket {
    type Err = PickupError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.key().eq_ignore_ascii_case(needle) || b.label() == needle)
            .ok_or_else(|| PickupError::UnknownHourBucket(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
