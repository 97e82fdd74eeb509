//! Trip configuration module.
//!
//! Handles loading and validating `tripmap.toml`. Configuration is a single
//! flat file: stock defaults are overridden by the config file, which is in
//! turn overridden by command-line flags (resolution happens in `main`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! tracks_dir = "data/gpx"      # Directory of .gpx track files
//! images_dir = "data/images"   # Root of the photo directory tree
//! output = "tracks.json"       # Manifest path (overwritten on build)
//! base_dir = "."               # Anchor directory for manifest references
//! start_date = "2025-07-06"    # Calendar date assigned to track index 0
//! day_title = "Day {n}"        # {n} is replaced by the 1-based day number
//!
//! # Cyclic track colors, reused once exhausted
//! palette = [
//!     "#0000FF", "#FF0000", "#00FF00", "#FF00FF", "#00FFFF", "#FFFF00",
//!     "#FFA500", "#800080", "#008000", "#808000", "#800000", "#008080",
//! ]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only move the trip start
//! start_date = "2026-08-01"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Stock palette, twelve colors cycled across tracks.
const STOCK_PALETTE: &[&str] = &[
    "#0000FF", "#FF0000", "#00FF00", "#FF00FF", "#00FFFF", "#FFFF00",
    "#FFA500", "#800080", "#008000", "#808000", "#800000", "#008080",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trip configuration loaded from `tripmap.toml`.
///
/// All fields have stock defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TripConfig {
    /// Directory containing the `.gpx` track files.
    pub tracks_dir: String,
    /// Root of the photo directory tree (walked recursively).
    pub images_dir: String,
    /// Path of the manifest file written by `build`.
    pub output: String,
    /// Anchor directory: every file reference in the manifest is written
    /// relative to this directory, with forward slashes.
    pub base_dir: String,
    /// Calendar date (`YYYY-MM-DD`) assigned to the first track; track *i*
    /// gets this date plus *i* days.
    pub start_date: String,
    /// Day title template; `{n}` is replaced by the 1-based day number.
    pub day_title: String,
    /// Cyclic track colors as `#RRGGBB` strings.
    pub palette: Vec<String>,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            tracks_dir: "data/gpx".to_string(),
            images_dir: "data/images".to_string(),
            output: "tracks.json".to_string(),
            base_dir: ".".to_string(),
            start_date: "2025-07-06".to_string(),
            day_title: "Day {n}".to_string(),
            palette: STOCK_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TripConfig {
    /// Validate config values.
    ///
    /// Checks that the start date parses, the palette is non-empty and
    /// well-formed, and the title template actually contains `{n}`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if NaiveDate::parse_from_str(&self.start_date, DATE_FORMAT).is_err() {
            return Err(ConfigError::Validation(format!(
                "start_date must be YYYY-MM-DD, got '{}'",
                self.start_date
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Validation("palette must not be empty".into()));
        }
        for color in &self.palette {
            if !is_hex_color(color) {
                return Err(ConfigError::Validation(format!(
                    "palette entry '{color}' is not a #RRGGBB color"
                )));
            }
        }
        if !self.day_title.contains("{n}") {
            return Err(ConfigError::Validation(
                "day_title must contain the {n} placeholder".into(),
            ));
        }
        Ok(())
    }

    /// The parsed start date. Call after [`validate`](Self::validate);
    /// still returns an error rather than panicking on a bad value.
    pub fn start(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::parse_from_str(&self.start_date, DATE_FORMAT).map_err(|e| {
            ConfigError::Validation(format!("start_date '{}': {e}", self.start_date))
        })
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Load configuration from a `tripmap.toml` file.
///
/// Uses stock defaults if the file doesn't exist. The returned config is
/// not yet validated — callers apply CLI overrides first, then `validate()`.
pub fn load_config(path: &Path) -> Result<TripConfig, ConfigError> {
    if !path.exists() {
        return Ok(TripConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: TripConfig = toml::from_str(&content)?;
    Ok(config)
}

/// A stock `tripmap.toml` with every option present and documented,
/// printed by the `gen-config` command.
pub fn stock_config_toml() -> String {
    let defaults = TripConfig::default();
    format!(
        r##"# tripmap configuration
# All options are optional; the values below are the stock defaults.

# Directory of .gpx track files, one per trip day, sorted by filename.
tracks_dir = "{tracks_dir}"

# Root of the photo tree. Walked recursively; .jpg/.jpeg/.png (any case).
images_dir = "{images_dir}"

# Manifest path. Overwritten on every build.
output = "{output}"

# Anchor for file references in the manifest: gpxFile and image url values
# are written relative to this directory, always with forward slashes.
base_dir = "{base_dir}"

# Date of the first track. Track i is assigned start_date + i days; photos
# taken that calendar day are attached to it. Day assignment is positional,
# never read from track filenames or GPX content.
start_date = "{start_date}"

# Title template for each day entry; {{n}} becomes the 1-based day number.
day_title = "{day_title}"

# Track colors, assigned in order and cycled once exhausted.
palette = [
    "#0000FF", "#FF0000", "#00FF00", "#FF00FF", "#00FFFF", "#FFFF00",
    "#FFA500", "#800080", "#008000", "#808000", "#800000", "#008080",
]
"##,
        tracks_dir = defaults.tracks_dir,
        images_dir = defaults.images_dir,
        output = defaults.output,
        base_dir = defaults.base_dir,
        start_date = defaults.start_date,
        day_title = defaults.day_title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = TripConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_matches_stock_values() {
        let config = TripConfig::default();
        assert_eq!(config.tracks_dir, "data/gpx");
        assert_eq!(config.images_dir, "data/images");
        assert_eq!(config.output, "tracks.json");
        assert_eq!(config.start_date, "2025-07-06");
        assert_eq!(config.palette.len(), 12);
        assert_eq!(config.palette[0], "#0000FF");
    }

    #[test]
    fn start_parses_configured_date() {
        let config = TripConfig::default();
        let date = config.start().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());
    }

    #[test]
    fn load_returns_defaults_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("tripmap.toml")).unwrap();
        assert_eq!(config.output, "tracks.json");
    }

    #[test]
    fn load_merges_partial_file_over_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tripmap.toml");
        fs::write(&path, "start_date = \"2026-08-01\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.start_date, "2026-08-01");
        // Untouched fields keep their stock values
        assert_eq!(config.tracks_dir, "data/gpx");
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tripmap.toml");
        fs::write(&path, "start_dat = \"2026-08-01\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validate_rejects_bad_start_date() {
        let config = TripConfig {
            start_date: "06/07/2025".to_string(),
            ..TripConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_palette() {
        let config = TripConfig {
            palette: vec![],
            ..TripConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_malformed_color() {
        for bad in ["0000FF", "#00F", "#GG0000", "#0000FF00"] {
            let config = TripConfig {
                palette: vec![bad.to_string()],
                ..TripConfig::default()
            };
            assert!(config.validate().is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn validate_rejects_title_without_placeholder() {
        let config = TripConfig {
            day_title: "Day one".to_string(),
            ..TripConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_round_trips() {
        let parsed: TripConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.start_date, TripConfig::default().start_date);
        assert_eq!(parsed.palette, TripConfig::default().palette);
    }
}
