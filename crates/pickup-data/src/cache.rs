//! Process-lifetime cache of loaded datasets.
//!
//! [`DatasetLoader`] owns the HTTP client and a map keyed by
//! `(source, row_limit)`. Entries are never evicted or refreshed: a key that
//! has been loaded once is served from memory for the rest of the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pickup_core::models::Dataset;
use tracing::debug;

use crate::error::LoadError;
use crate::loader::{load_dataset, DataSource, ParseOptions};

/// Connect timeout for HTTP sources. The download itself is not bounded.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Cache key: the source location as given and the requested row limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub row_limit: u64,
}

/// Loads pickup tables and memoises them by [`CacheKey`].
///
/// # Example
/// ```no_run
/// # async fn run() -> Result<(), pickup_data::error::LoadError> {
/// use pickup_data::cache::DatasetLoader;
///
/// let mut loader = DatasetLoader::new("date/time")?;
/// let dataset = loader.load("pickups.csv.gz", 10_000).await?;
/// println!("{} rows", dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct DatasetLoader {
    client: reqwest::Client,
    /// Timestamp column used for every table this loader parses.
    date_column: String,
    cache: HashMap<CacheKey, Arc<Dataset>>,
}

impl DatasetLoader {
    /// Create a loader that parses timestamps from `date_column`.
    pub fn new(date_column: impl Into<String>) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("pickup-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(LoadError::Client)?;

        Ok(Self {
            client,
            date_column: date_column.into(),
            cache: HashMap::new(),
        })
    }

    /// Return the dataset for `(source, row_limit)`, loading it on first use.
    pub async fn load(&mut self, source: &str, row_limit: u64) -> Result<Arc<Dataset>, LoadError> {
        let key = CacheKey {
            source: source.to_string(),
            row_limit,
        };

        if let Some(hit) = self.cache.get(&key) {
            debug!("dataset cache hit for {} ({} rows)", source, row_limit);
            return Ok(Arc::clone(hit));
        }

        debug!("dataset cache miss for {} ({} rows)", source, row_limit);
        let options = ParseOptions::new(row_limit, self.date_column.clone());
        let dataset = Arc::new(load_dataset(&self.client, &DataSource::parse(source), &options).await?);

        self.cache.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// `true` when `(source, row_limit)` is already cached.
    pub fn is_cached(&self, source: &str, row_limit: u64) -> bool {
        self.cache.contains_key(&CacheKey {
            source: source.to_string(),
            row_limit,
        })
    }

    /// Number of cached tables.
    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
