use std::path::PathBuf;

use pickup_core::error::PickupError;
use thiserror::Error;

/// Errors raised while fetching or parsing a pickup table.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or its body could not be read.
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Request for {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// A local source file could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid CSV (or not valid gzip).
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent after lowercasing the header.
    #[error("Missing column: expected one of [{0}]")]
    MissingColumn(String),

    /// A timestamp cell could not be parsed.
    #[error("Row {row}: {source}")]
    Timestamp {
        row: usize,
        #[source]
        source: PickupError,
    },

    /// A latitude or longitude cell is not a number.
    #[error("Row {row}: invalid {column} value '{value}'")]
    Coordinate {
        row: usize,
        column: String,
        value: String,
    },

    /// A row limit of zero was requested.
    #[error("Row limit must be at least 1")]
    ZeroRowLimit,
}
