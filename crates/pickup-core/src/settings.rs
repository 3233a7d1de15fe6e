use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::models::HourBucket;

/// Public NYC pickup sample for September 2014.
pub const DEFAULT_SOURCE: &str =
    "https://s3-us-west-2.amazonaws.com/streamlit-demo-data/uber-raw-data-sep14.csv.gz";

/// Rows read from the source unless `--rows` says otherwise.
pub const DEFAULT_ROW_LIMIT: u64 = 10_000;

/// Lowercased name of the timestamp column in the default source.
pub const DEFAULT_DATE_COLUMN: &str = "date/time";

/// Directory under `$HOME` holding logs and persisted settings.
pub const APP_DIR_NAME: &str = ".pickup-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive terminal dashboard for taxi pickup data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pickup-dashboard",
    about = "Interactive terminal dashboard for taxi pickup data",
    version
)]
pub struct Settings {
    /// CSV source: an http(s) URL, a file:// URL or a local path (gzip allowed)
    #[arg(long, env = "PICKUP_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Number of data rows to read from the source
    #[arg(long, env = "PICKUP_ROWS", default_value_t = DEFAULT_ROW_LIMIT,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub rows: u64,

    /// Name of the timestamp column (matched after lowercasing)
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Initial hour bucket (night, morning, afternoon, evening, all-day)
    #[arg(long)]
    pub hour_bucket: Option<HourBucket>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.pickup-dashboard/logs/pickup-dashboard.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// Hour bucket to start with, falling back to the first bucket.
    pub fn initial_hour_bucket(&self) -> HourBucket {
        self.hour_bucket.unwrap_or_default()
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.pickup-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_bucket: Option<HourBucket>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::debug!("ignoring unreadable {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "hour_bucket") && settings.hour_bucket.is_none() {
            settings.hour_bucket = last.hour_bucket;
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("could not persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            hour_bucket: s.hour_bucket,
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            hour_bucket: Some(HourBucket::Evening),
        };
        params.save_to(&path).expect("save");

        assert_eq!(LastUsedParams::load_from(&path), params);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_last_used_params_save_reports_io_error() {
        let tmp = TempDir::new().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("last_used.json");

        let err = LastUsedParams::default().save_to(&path).unwrap_err();
        assert!(matches!(err, crate::error::PickupError::Io(_)), "err = {err}");
    }

    #[test]
    fn test_last_used_params_clear_reports_io_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(&path).unwrap();

        let err = LastUsedParams::clear_at(&path).unwrap_err();
        assert!(matches!(err, crate::error::PickupError::Io(_)), "err = {err}");
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["pickup-dashboard"]);

        assert_eq!(settings.source, DEFAULT_SOURCE);
        assert_eq!(settings.rows, 10_000);
        assert_eq!(settings.date_column, "date/time");
        assert!(settings.hour_bucket.is_none());
        assert_eq!(settings.initial_hour_bucket(), HourBucket::Night);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_source_and_rows() {
        let settings = Settings::parse_from([
            "pickup-dashboard",
            "--source",
            "/tmp/pickups.csv",
            "--rows",
            "250",
        ]);
        assert_eq!(settings.source, "/tmp/pickups.csv");
        assert_eq!(settings.rows, 250);
    }

    #[test]
    fn test_settings_rejects_zero_rows() {
        let result = Settings::try_parse_from(["pickup-dashboard", "--rows", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_hour_bucket() {
        let settings = Settings::parse_from(["pickup-dashboard", "--hour-bucket", "afternoon"]);
        assert_eq!(settings.hour_bucket, Some(HourBucket::Afternoon));

        let bad = Settings::try_parse_from(["pickup-dashboard", "--hour-bucket", "brunch"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            hour_bucket: Some(HourBucket::Morning),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["pickup-dashboard".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.hour_bucket, Some(HourBucket::Morning));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            hour_bucket: Some(HourBucket::Morning),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "pickup-dashboard".into(),
                "--theme".into(),
                "light".into(),
                "--hour-bucket".into(),
                "all-day".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.hour_bucket, Some(HourBucket::AllDay));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["pickup-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["pickup-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "pickup-dashboard".into(),
                "--hour-bucket".into(),
                "evening".into(),
            ],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.hour_bucket, Some(HourBucket::Evening));
        assert_eq!(loaded.theme, Some("auto".to_string()));
    }
}
