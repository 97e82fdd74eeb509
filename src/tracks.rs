//! Track enumeration and day assignment.
//!
//! Stage 2 of the tripmap pipeline. Lists the `.gpx` files of a trip and
//! assigns each one its day: track at sorted position *i* (0-based) gets
//! calendar date = start date + *i* days, the palette color at *i* modulo
//! the palette length, and a title generated from the `{n}` template with
//! the 1-based day number.
//!
//! ## Assignment is positional
//!
//! The date comes from the track's position in the filename sort, never
//! from the file's content or its name. Track filenames usually *do*
//! encode a day number (`HRP_J1.gpx`); that indicator is parsed via
//! [`naming::parse_day_indicator`] and kept on the [`Track`] purely so the
//! manifest builder can warn when name and position disagree — a renamed
//! export or a missing day file shifts every later track by one, and the
//! warning is the only signal.

use crate::naming;
use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("track directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A track file with its positional day assignment.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    /// 0-based enumeration position in filename sort order.
    pub index: usize,
    /// 1-based day number (`index + 1`).
    pub day_number: u32,
    /// Calendar date: start date + `index` days.
    pub date: NaiveDate,
    /// Palette color, cycled by index.
    pub color: String,
    /// Rendered day title.
    pub title: String,
    /// Day number the filename claims to carry, if any. Validation only.
    pub indicated_day: Option<u32>,
}

impl Track {
    /// The day number this track's filename claims, when it disagrees with
    /// the positional assignment.
    pub fn day_mismatch(&self) -> Option<u32> {
        self.indicated_day.filter(|&claimed| claimed != self.day_number)
    }

    /// Filename of the track file, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

const TRACK_EXTENSION: &str = "gpx";

/// Enumerate the track files in `dir` (non-recursive), sorted
/// lexicographically by filename, with dates, colors, and titles assigned
/// by position.
///
/// `palette` must be non-empty and `title_template` must contain `{n}` —
/// both are guaranteed by config validation.
pub fn enumerate(
    dir: &Path,
    start: NaiveDate,
    palette: &[String],
    title_template: &str,
) -> Result<Vec<Track>, TrackError> {
    if !dir.is_dir() {
        return Err(TrackError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_track(p))
        .collect();
    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    let tracks = paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let day_number = (index + 1) as u32;
            let indicated_day = path
                .file_stem()
                .map(|s| s.to_string_lossy())
                .and_then(|stem| naming::parse_day_indicator(&stem));
            Track {
                index,
                day_number,
                date: start + Duration::days(index as i64),
                color: palette[index % palette.len()].clone(),
                title: title_template.replace("{n}", &day_number.to_string()),
                indicated_day,
                path,
            }
        })
        .collect();

    Ok(tracks)
}

fn is_track(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(TRACK_EXTENSION))
        .unwrap_or(false)
}
