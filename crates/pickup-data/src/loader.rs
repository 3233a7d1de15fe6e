//! Fetching and parsing of pickup tables.
//!
//! A source is either an `http(s)://` URL, a `file://` URL or a plain path.
//! Payloads starting with the gzip magic bytes are decompressed on the fly,
//! whatever their extension. Only the first `row_limit` data rows are parsed.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use pickup_core::models::{Dataset, DatasetSchema, PickupRecord};
use pickup_core::time_utils::parse_pickup_timestamp;
use tracing::{debug, info};

use crate::error::LoadError;

/// Column names accepted for latitude, in preference order.
pub const LATITUDE_COLUMNS: &[&str] = &["lat", "latitude"];

/// Column names accepted for longitude, in preference order.
pub const LONGITUDE_COLUMNS: &[&str] = &["lon", "lng", "longitude"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ── DataSource ────────────────────────────────────────────────────────────────

/// Where a pickup table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
}

impl DataSource {
    /// Classify a user-supplied location string.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Http(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            DataSource::File(PathBuf::from(path))
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Http(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── ParseOptions ──────────────────────────────────────────────────────────────

/// How to interpret a fetched table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of data rows to read.
    pub row_limit: u64,
    /// Timestamp column name, compared after lowercasing.
    pub date_column: String,
}

impl ParseOptions {
    pub fn new(row_limit: u64, date_column: impl Into<String>) -> Self {
        Self {
            row_limit,
            date_column: date_column.into(),
        }
    }
}

// ── Fetching ──────────────────────────────────────────────────────────────────

/// Download or read the raw bytes of `source`.
pub async fn fetch_source(
    client: &reqwest::Client,
    source: &DataSource,
) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::Http(url) => {
            info!("Fetching {}", url);
            let response = client.get(url).send().await.map_err(|e| LoadError::Http {
                url: url.clone(),
                source: e,
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| LoadError::Http {
                url: url.clone(),
                source: e,
            })?;
            debug!("Downloaded {} bytes from {}", body.len(), url);
            Ok(body.to_vec())
        }
        DataSource::File(path) => {
            info!("Reading {}", path.display());
            tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::FileRead {
                    path: path.clone(),
                    source: e,
                })
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// `true` when `bytes` starts with the gzip magic number.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= GZIP_MAGIC.len() && bytes[..2] == GZIP_MAGIC
}

/// Parse a (possibly gzipped) CSV payload into a [`Dataset`].
pub fn parse_dataset(bytes: &[u8], options: &ParseOptions) -> Result<Dataset, LoadError> {
    if is_gzip(bytes) {
        debug!("Source is gzip-compressed");
        parse_csv(GzDecoder::new(bytes), options)
    } else {
        parse_csv(bytes, options)
    }
}

/// Parse CSV text from `reader`.
///
/// Header names are trimmed and lowercased. The timestamp, latitude and
/// longitude columns are resolved by name; every other column is kept as
/// passthrough text exactly as it appears in the file.
pub fn parse_csv<R: Read>(reader: R, options: &ParseOptions) -> Result<Dataset, LoadError> {
    if options.row_limit == 0 {
        return Err(LoadError::ZeroRowLimit);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_lowercase).collect();

    let date_column = options.date_column.to_lowercase();
    let ts_idx = find_column(&columns, &[date_column.as_str()])?;
    let lat_idx = find_column(&columns, LATITUDE_COLUMNS)?;
    let lon_idx = find_column(&columns, LONGITUDE_COLUMNS)?;

    let passthrough_idx: Vec<usize> = (0..columns.len())
        .filter(|i| ![ts_idx, lat_idx, lon_idx].contains(i))
        .collect();

    let schema = DatasetSchema {
        timestamp_column: columns[ts_idx].clone(),
        latitude_column: columns[lat_idx].clone(),
        longitude_column: columns[lon_idx].clone(),
        passthrough_columns: passthrough_idx.iter().map(|&i| columns[i].clone()).collect(),
        columns,
    };

    let limit = usize::try_from(options.row_limit).unwrap_or(usize::MAX);
    let mut records = Vec::with_capacity(limit.min(100_000));

    for (i, result) in rdr.records().take(limit).enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let timestamp = parse_pickup_timestamp(cell(ts_idx))
            .map_err(|source| LoadError::Timestamp { row, source })?;
        let latitude = parse_coordinate(cell(lat_idx), row, &schema.latitude_column)?;
        let longitude = parse_coordinate(cell(lon_idx), row, &schema.longitude_column)?;

        records.push(PickupRecord {
            timestamp,
            latitude,
            longitude,
            passthrough: passthrough_idx.iter().map(|&idx| cell(idx).to_string()).collect(),
        });
    }

    debug!(
        "Parsed {} rows ({} columns, limit {})",
        records.len(),
        schema.columns.len(),
        options.row_limit
    );

    Ok(Dataset::new(schema, records))
}

/// Fetch `source` and parse it with `options`.
pub async fn load_dataset(
    client: &reqwest::Client,
    source: &DataSource,
    options: &ParseOptions,
) -> Result<Dataset, LoadError> {
    let bytes = fetch_source(client, source).await?;
    let dataset = parse_dataset(&bytes, options)?;
    info!("Loaded {} pickups from {}", dataset.len(), source);
    Ok(dataset)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Index of the first of `candidates` present in `columns`.
fn find_column(columns: &[String], candidates: &[&str]) -> Result<usize, LoadError> {
    candidates
        .iter()
        .find_map(|name| columns.iter().position(|c| c == name))
        .ok_or_else(|| LoadError::MissingColumn(candidates.join(", ")))
}

fn parse_coordinate(raw: &str, row: usize, column: &str) -> Result<f64, LoadError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::Coordinate {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE: &str = "\
Date/Time,Lat,Lon,Base
9/1/2014 0:01:00,40.2201,-74.0021,B02512
9/1/2014 0:01:00,40.7500,-74.0027,B02512
9/1/2014 0:03:00,40.7559,-73.9864,B02512
9/2/2014 8:00:00,40.7450,-73.9889,B02598
";

    fn options(rows: u64) -> ParseOptions {
        ParseOptions::new(rows, "date/time")
    }

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    // ── DataSource ────────────────────────────────────────────────────────────

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/a.csv.gz"),
            DataSource::Http("https://example.com/a.csv.gz".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.com/a.csv"),
            DataSource::Http("HTTP://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("file:///tmp/a.csv"),
            DataSource::File(PathBuf::from("/tmp/a.csv"))
        );
        assert_eq!(
            DataSource::parse("data/a.csv"),
            DataSource::File(PathBuf::from("data/a.csv"))
        );
    }

    // ── parse_csv ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_lowercases_columns() {
        let ds = parse_dataset(SAMPLE.as_bytes(), &options(100)).unwrap();
        let schema = ds.schema();
        assert_eq!(schema.columns, vec!["date/time", "lat", "lon", "base"]);
        assert_eq!(schema.timestamp_column, "date/time");
        assert_eq!(schema.latitude_column, "lat");
        assert_eq!(schema.longitude_column, "lon");
        assert_eq!(schema.passthrough_columns, vec!["base"]);
    }

    #[test]
    fn test_parse_records() {
        let ds = parse_dataset(SAMPLE.as_bytes(), &options(100)).unwrap();
        assert_eq!(ds.len(), 4);

        let first = &ds.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2014, 9, 1).unwrap());
        assert_eq!(first.timestamp.minute(), 1);
        assert!((first.latitude - 40.2201).abs() < 1e-9);
        assert!((first.longitude + 74.0021).abs() < 1e-9);
        assert_eq!(first.passthrough, vec!["B02512"]);

        assert_eq!(ds.records()[3].hour(), 8);
    }

    #[test]
    fn test_parse_respects_row_limit() {
        let ds = parse_dataset(SAMPLE.as_bytes(), &options(2)).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_parse_zero_row_limit_rejected() {
        let err = parse_dataset(SAMPLE.as_bytes(), &options(0)).unwrap_err();
        assert!(matches!(err, LoadError::ZeroRowLimit));
    }

    #[test]
    fn test_parse_keeps_passthrough_whitespace() {
        let text = " Date/Time , Lat , Lon , Base \n9/1/2014 0:01:00 , 40.7 , -74.0 , B02512 \n";
        let ds = parse_dataset(text.as_bytes(), &options(10)).unwrap();
        assert_eq!(ds.schema().columns, vec!["date/time", "lat", "lon", "base"]);

        let record = &ds.records()[0];
        assert!((record.latitude - 40.7).abs() < 1e-9);
        assert!((record.longitude + 74.0).abs() < 1e-9);
        assert_eq!(record.passthrough, vec![" B02512 "]);
    }

    #[test]
    fn test_parse_gzip_detected_by_magic() {
        let bytes = gzip(SAMPLE);
        assert!(is_gzip(&bytes));
        assert!(!is_gzip(SAMPLE.as_bytes()));

        let ds = parse_dataset(&bytes, &options(100)).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.schema().passthrough_columns, vec!["base"]);
    }

    #[test]
    fn test_parse_alternative_coordinate_names() {
        let text = "PICKUP_TIME,Longitude,Latitude\n2014-09-01 10:15:00,-73.99,40.73\n";
        let ds = parse_dataset(text.as_bytes(), &ParseOptions::new(10, "Pickup_Time")).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.schema().latitude_column, "latitude");
        assert_eq!(ds.schema().longitude_column, "longitude");
        assert!((ds.records()[0].latitude - 40.73).abs() < 1e-9);
        assert!(ds.schema().passthrough_columns.is_empty());
    }

    #[test]
    fn test_parse_missing_column() {
        let text = "Date/Time,Lat\n9/1/2014 0:01:00,40.7\n";
        let err = parse_dataset(text.as_bytes(), &options(10)).unwrap_err();
        match err {
            LoadError::MissingColumn(names) => assert!(names.contains("lon")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_bad_timestamp_reports_row() {
        let text = "Date/Time,Lat,Lon\n9/1/2014 0:01:00,40.7,-74.0\nlater,40.7,-74.0\n";
        let err = parse_dataset(text.as_bytes(), &options(10)).unwrap_err();
        assert!(matches!(err, LoadError::Timestamp { row: 2, .. }));
    }

    #[test]
    fn test_parse_bad_coordinate_reports_column() {
        let text = "Date/Time,Lat,Lon\n9/1/2014 0:01:00,north,-74.0\n";
        let err = parse_dataset(text.as_bytes(), &options(10)).unwrap_err();
        match err {
            LoadError::Coordinate { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "lat");
                assert_eq!(value, "north");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_bad_row_beyond_limit_is_ignored() {
        let text = "Date/Time,Lat,Lon\n9/1/2014 0:01:00,40.7,-74.0\ngarbage,x,y\n";
        let ds = parse_dataset(text.as_bytes(), &options(1)).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_parse_ragged_row_is_malformed() {
        let text = "Date/Time,Lat,Lon\n9/1/2014 0:01:00,40.7\n";
        let err = parse_dataset(text.as_bytes(), &options(10)).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_dataset_from_gzip_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pickups.csv.gz");
        std::fs::write(&path, gzip(SAMPLE)).unwrap();

        let client = reqwest::Client::new();
        let source = DataSource::parse(path.to_str().unwrap());
        let ds = load_dataset(&client, &source, &options(3)).await.unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[tokio::test]
    async fn test_load_dataset_zero_row_limit_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pickups.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let client = reqwest::Client::new();
        let source = DataSource::File(path);
        let err = load_dataset(&client, &source, &options(0)).await.unwrap_err();
        assert!(matches!(err, LoadError::ZeroRowLimit));
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = DataSource::File(dir.path().join("absent.csv"));

        let client = reqwest::Client::new();
        let err = load_dataset(&client, &source, &options(10)).await.unwrap_err();
        assert!(matches!(err, LoadError::FileRead { .. }));
    }
}
