//! Dashboard controller.
//!
//! [`Dashboard`] holds the loaded dataset and the current control values, and
//! exposes one handler per UI control. Filter handlers re-run the pure
//! pipeline from `pickup_core` and replace the stored [`RenderOutcome`]; the
//! click handler only touches the [`Session`] it is given.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use pickup_core::aggregator::{minute_histogram, MinuteHistogram};
use pickup_core::error::PickupError;
use pickup_core::filters::apply_filters;
use pickup_core::formatting::hour_span_caption;
use pickup_core::models::{Dataset, DateRange, DateSelection, HourBucket};
use pickup_core::session::Session;
use pickup_core::time_utils::shift_date_clamped;
use pickup_data::hexbin::{aggregate_hexagons, HexCell, HexagonLayerConfig, ViewState};

// ── Public types ──────────────────────────────────────────────────────────────

/// Reason a pass stopped before producing any output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// A date endpoint is missing or the start lies after the end.
    InvalidDateRange,
    /// No record falls inside the selected dates.
    NoDataForRange,
}

impl Warning {
    /// The warning a filter error halts the pass with, if it is one the
    /// user can fix from the controls.
    pub fn from_error(err: &PickupError) -> Option<Warning> {
        match err {
            PickupError::NoDataForRange { .. } => Some(Warning::NoDataForRange),
            e if e.is_range_error() => Some(Warning::InvalidDateRange),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Warning::InvalidDateRange => "Please select a valid date range.",
            Warning::NoDataForRange => "No data available for the selected date range.",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the presentation layer needs for one successful pass.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub date_range: DateRange,
    pub hour_bucket: HourBucket,
    /// Rows surviving both filters.
    pub records: Dataset,
    pub histogram: MinuteHistogram,
    pub hexagons: Vec<HexCell>,
    /// `"Showing data from HH:00 to HH:59"`.
    pub caption: String,
}

/// Result of the most recent filter pass.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Ready(DashboardView),
    Halted(Warning),
    /// The pass hit an error that is not a user-facing warning.
    Failed(String),
}

impl RenderOutcome {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            RenderOutcome::Ready(view) => Some(view),
            RenderOutcome::Halted(_) | RenderOutcome::Failed(_) => None,
        }
    }

    pub fn warning(&self) -> Option<Warning> {
        match self {
            RenderOutcome::Ready(_) | RenderOutcome::Failed(_) => None,
            RenderOutcome::Halted(w) => Some(*w),
        }
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Controller owning the dataset and the current filter controls.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    /// Earliest and latest dates in the dataset; `None` when it is empty.
    date_bounds: Option<(NaiveDate, NaiveDate)>,
    selection: DateSelection,
    hour_bucket: HourBucket,
    layer: HexagonLayerConfig,
    view_state: ViewState,
    outcome: RenderOutcome,
}

impl Dashboard {
    /// Build a controller selecting the full date span of `dataset` and
    /// `hour_bucket`, and run the first pass.
    pub fn new(dataset: Arc<Dataset>, hour_bucket: HourBucket) -> Self {
        Self::with_layer(
            dataset,
            hour_bucket,
            HexagonLayerConfig::default(),
            ViewState::default(),
        )
    }

    /// Like [`Dashboard::new`] with explicit map settings.
    pub fn with_layer(
        dataset: Arc<Dataset>,
        hour_bucket: HourBucket,
        layer: HexagonLayerConfig,
        view_state: ViewState,
    ) -> Self {
        let date_bounds = dataset.date_bounds();
        let selection = match date_bounds {
            Some((min, max)) => DateSelection::new(Some(min), Some(max)),
            None => DateSelection::default(),
        };

        let mut dashboard = Self {
            dataset,
            date_bounds,
            selection,
            hour_bucket,
            layer,
            view_state,
            outcome: RenderOutcome::Halted(Warning::InvalidDateRange),
        };
        dashboard.recompute();
        dashboard
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }

    pub fn selection(&self) -> DateSelection {
        self.selection
    }

    pub fn hour_bucket(&self) -> HourBucket {
        self.hour_bucket
    }

    pub fn layer(&self) -> &HexagonLayerConfig {
        &self.layer
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn outcome(&self) -> &RenderOutcome {
        &self.outcome
    }

    // ── Date picker handlers ──────────────────────────────────────────────

    /// Replace both endpoints at once.
    pub fn set_date_selection(&mut self, selection: DateSelection) -> &RenderOutcome {
        self.selection = selection;
        self.recompute()
    }

    pub fn set_start_date(&mut self, start: NaiveDate) -> &RenderOutcome {
        self.selection.start = Some(start);
        self.recompute()
    }

    pub fn set_end_date(&mut self, end: NaiveDate) -> &RenderOutcome {
        self.selection.end = Some(end);
        self.recompute()
    }

    pub fn clear_start_date(&mut self) -> &RenderOutcome {
        self.selection.start = None;
        self.recompute()
    }

    pub fn clear_end_date(&mut self) -> &RenderOutcome {
        self.selection.end = None;
        self.recompute()
    }

    /// Move the start date by `days`, staying within the dataset's dates.
    /// An unset start is restored to the earliest date first.
    pub fn shift_start_date(&mut self, days: i64) -> &RenderOutcome {
        if let Some((min, max)) = self.date_bounds {
            let shifted = match self.selection.start {
                Some(start) => shift_date_clamped(start, days, min, max),
                None => min,
            };
            self.selection.start = Some(shifted);
        }
        self.recompute()
    }

    /// Move the end date by `days`, staying within the dataset's dates.
    /// An unset end is restored to the latest date first.
    pub fn shift_end_date(&mut self, days: i64) -> &RenderOutcome {
        if let Some((min, max)) = self.date_bounds {
            let shifted = match self.selection.end {
                Some(end) => shift_date_clamped(end, days, min, max),
                None => max,
            };
            self.selection.end = Some(shifted);
        }
        self.recompute()
    }

    // ── Hour selector handler ─────────────────────────────────────────────

    pub fn select_hour_bucket(&mut self, bucket: HourBucket) -> &RenderOutcome {
        self.hour_bucket = bucket;
        self.recompute()
    }

    // ── Button handler ────────────────────────────────────────────────────

    /// Count a button press. Filtered outputs are left as they are.
    pub fn on_click(&self, session: &mut Session) -> u64 {
        let count = session.counter.increment();
        tracing::debug!(count, "counter button pressed");
        count
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn recompute(&mut self) -> &RenderOutcome {
        self.outcome = match self.run_pipeline() {
            Ok(view) => RenderOutcome::Ready(view),
            Err(err) => match Warning::from_error(&err) {
                Some(warning) => {
                    tracing::info!(?warning, selection = ?self.selection, "render pass halted");
                    RenderOutcome::Halted(warning)
                }
                None => {
                    tracing::error!(error = %err, "render pass failed");
                    RenderOutcome::Failed(err.to_string())
                }
            },
        };
        &self.outcome
    }

    fn run_pipeline(&self) -> pickup_core::error::Result<DashboardView> {
        let range = self.selection.to_range()?;
        let records = apply_filters(&self.dataset, range, self.hour_bucket)?;

        let histogram = minute_histogram(&records);
        let hexagons = aggregate_hexagons(&records, &self.layer, &self.view_state);

        Ok(DashboardView {
            date_range: range,
            hour_bucket: self.hour_bucket,
            caption: hour_span_caption(self.hour_bucket),
            records,
            histogram,
            hexagons,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
