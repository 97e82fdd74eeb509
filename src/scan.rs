//! Photo collection and day grouping.
//!
//! Stage 1 of the tripmap pipeline. Walks the photo directory tree,
//! extracts one capture timestamp per image, and produces the day-keyed
//! groups the manifest builder joins against tracks.
//!
//! ## Ordering
//!
//! The photo list is sorted by `(capture timestamp, path)` ascending. The
//! path tie-break makes the order total: two photos taken in the same
//! second always come out in the same order, whatever order the filesystem
//! returned them in. Grouping preserves this global order inside each day,
//! so the manifest is reproducible byte-for-byte across runs and hosts.
//!
//! ## Single extraction pass
//!
//! Each file's timestamp is read exactly once and cached on its [`Photo`];
//! the sort and the grouping both consume the cached value. Each image
//! file is opened, read, and closed before the next is touched.
//!
//! ## Day keys
//!
//! Days are keyed `YYYY_MM_DD` (underscores — the key doubles as a
//! path-safe folder-style label). A day with zero photos simply has no
//! entry in the map; lookups for such days yield an empty list at the
//! join site, not an error.

use crate::metadata::{self, MetadataError};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("image directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("reading {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
}

/// A discovered photo with its cached capture timestamp.
///
/// Immutable once read; lives only for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub path: PathBuf,
    pub taken: NaiveDateTime,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Collect every image under `root`, recursively, sorted by
/// `(capture timestamp, path)` ascending.
///
/// Extension matching is case-insensitive. Any image whose capture
/// timestamp cannot be extracted aborts the scan — a photo without a date
/// cannot be placed on a day.
pub fn collect_photos(root: &Path) -> Result<Vec<Photo>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut photos = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if !is_image(&path) {
            continue;
        }
        let taken = metadata::capture_time(&path).map_err(|source| ScanError::Metadata {
            path: path.clone(),
            source,
        })?;
        photos.push(Photo { path, taken });
    }

    photos.sort_by(|a, b| (a.taken, &a.path).cmp(&(b.taken, &b.path)));
    Ok(photos)
}

/// Partition sorted photos into day buckets keyed `YYYY_MM_DD`.
///
/// Each photo lands in exactly one bucket, keyed by the date component of
/// its timestamp. The input order (the global sort) is preserved within
/// each bucket.
pub fn group_by_day(photos: &[Photo]) -> BTreeMap<String, Vec<Photo>> {
    let mut groups: BTreeMap<String, Vec<Photo>> = BTreeMap::new();
    for photo in photos {
        groups
            .entry(day_key(photo.taken.date()))
            .or_default()
            .push(photo.clone());
    }
    groups
}

/// Format a calendar date as a day-bucket key: `2025-07-06` → `"2025_07_06"`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y_%m_%d").to_string()
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
