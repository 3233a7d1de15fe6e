//! Background dataset loading.
//!
//! [`LoadOrchestrator`] runs the fetch in a tokio task and reports the result
//! through an `mpsc` channel, so the TUI loop can keep drawing the
//! "Loading data..." state without blocking.

use std::sync::Arc;

use pickup_core::models::Dataset;
use pickup_data::cache::DatasetLoader;
use pickup_data::error::LoadError;
use tokio::sync::{mpsc, Mutex};

// ── Public types ──────────────────────────────────────────────────────────────

/// Message sent from the load task to the UI.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    Loaded(Arc<Dataset>),
    Failed(String),
}

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// URL or local path of the CSV table.
    pub source: String,
    /// Maximum number of data rows to read.
    pub row_limit: u64,
}

/// One [`DatasetLoader`] shared by every load in the process, so its cache
/// survives across requests.
pub type SharedLoader = Arc<Mutex<DatasetLoader>>;

/// Build the process-wide loader for tables keyed on `date_column`.
pub fn shared_loader(date_column: impl Into<String>) -> Result<SharedLoader, LoadError> {
    Ok(Arc::new(Mutex::new(DatasetLoader::new(date_column)?)))
}

// ── LoadOrchestrator ──────────────────────────────────────────────────────────

/// Runs a [`LoadRequest`] in the background.
pub struct LoadOrchestrator {
    loader: SharedLoader,
    request: LoadRequest,
}

impl LoadOrchestrator {
    pub fn new(loader: SharedLoader, request: LoadRequest) -> Self {
        Self { loader, request }
    }

    /// Spawn the load task.
    ///
    /// Returns the receiving end of the event channel and a handle that can
    /// abort the task. Exactly one [`LoadEvent`] is sent before the channel
    /// closes.
    pub fn start(self) -> (mpsc::Receiver<LoadEvent>, LoadHandle) {
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let event = self.run().await;
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "failed to deliver load result; receiver dropped");
            }
        });

        (rx, LoadHandle { handle })
    }

    /// Load the requested table and wrap the outcome in a [`LoadEvent`].
    pub async fn run(&self) -> LoadEvent {
        let request = &self.request;
        let mut loader = self.loader.lock().await;

        match loader.load(&request.source, request.row_limit).await {
            Ok(dataset) => {
                tracing::info!(
                    rows = dataset.len(),
                    source = %request.source,
                    "dataset loaded"
                );
                LoadEvent::Loaded(dataset)
            }
            Err(e) => {
                tracing::error!(error = %e, source = %request.source, "dataset load failed");
                LoadEvent::Failed(e.to_string())
            }
        }
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// A handle to the background load task.
pub struct LoadHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl LoadHandle {
    /// Immediately abort the load.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the task has delivered its result or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
