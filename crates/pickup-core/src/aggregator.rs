//! Per-minute pickup counts for the bar chart.

use std::collections::BTreeMap;

use crate::models::Dataset;

/// Count of records per minute-of-hour, ascending by minute.
///
/// Only minutes that occur in the aggregated data are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinuteHistogram {
    counts: BTreeMap<u32, u64>,
}

impl MinuteHistogram {
    /// Number of records counted for `minute`, or `None` if it never occurs.
    pub fn get(&self, minute: u32) -> Option<u64> {
        self.counts.get(&minute).copied()
    }

    /// `(minute, count)` pairs in ascending minute order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().map(|(m, c)| (*m, *c))
    }

    /// Number of distinct minutes present.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the number of aggregated records.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Largest single count, `0` when empty.
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Label/value pairs ready for a bar chart, labels being the minute.
    pub fn to_bars(&self) -> Vec<(String, u64)> {
        self.iter().map(|(m, c)| (m.to_string(), c)).collect()
    }
}

/// Group the records of `dataset` by minute-of-hour and count each group.
pub fn minute_histogram(dataset: &Dataset) -> MinuteHistogram {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for record in dataset {
        *counts.entry(record.minute()).or_default() += 1;
    }
    MinuteHistogram { counts }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
