//! Manifest assembly and serialization.
//!
//! Final stage of the tripmap pipeline. Joins the enumerated tracks with
//! the day-grouped photos and serializes the result as the JSON document
//! the map front end consumes:
//!
//! ```text
//! [ { "gpxFile": "data/gpx/HRP_J1.gpx",
//!     "dayTitle": "Day 1",
//!     "color": "#0000FF",
//!     "dayDescription": "",
//!     "images": [ { "url": "data/images/2025_07_06/PXL_0001.jpg" }, ... ] },
//!   ... ]
//! ```
//!
//! One entry per track, in track-enumeration order. An entry's images are
//! the day group whose key matches the track's assigned date; a day with
//! no photos gets an empty `images` array, never an absent key.
//!
//! ## Path normalization
//!
//! Every file reference is rewritten relative to a configured anchor
//! directory, joined with forward slashes on every host (the manifest is
//! consumed by a web page, where the separator is always `/`). References
//! outside the anchor get `..` components, matching what a relative URL
//! needs.
//!
//! ## Validation
//!
//! Tracks whose filename day indicator disagrees with their positional day
//! produce a [`Warning::DayMismatch`]. Warnings ride on the built
//! [`Manifest`] and are surfaced by the CLI; they never fail the build —
//! assignment stays positional either way.
//!
//! Serialization preserves struct field order, indents for human
//! readability, and leaves non-ASCII text unescaped. Writing overwrites
//! any existing file at the output path; nothing is written on failure
//! (the document is fully serialized in memory first).

use crate::metadata;
use crate::scan::{self, Photo};
use crate::tracks::Track;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot resolve {path} against the anchor directory: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single image reference in a manifest entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
}

/// One manifest entry: a track with its day title, color, description,
/// and ordered image list. Field order is the wire order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEntry {
    pub gpx_file: String,
    pub day_title: String,
    pub color: String,
    pub day_description: String,
    pub images: Vec<ImageRef>,
}

/// A non-fatal finding surfaced during manifest assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A track filename claims a day number that differs from the
    /// positional assignment.
    DayMismatch {
        file: String,
        indicated: u32,
        positional: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DayMismatch {
                file,
                indicated,
                positional,
            } => write!(
                f,
                "{file} is named as day {indicated} but sits at day {positional}; \
                 dates are assigned by position"
            ),
        }
    }
}

/// The built manifest: serializable entries plus assembly warnings.
#[derive(Debug)]
pub struct Manifest {
    pub entries: Vec<TrackEntry>,
    pub warnings: Vec<Warning>,
}

impl Manifest {
    /// Serialize the entries as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Write the manifest to `path`, overwriting any existing file.
    ///
    /// The document is serialized in full before the file is touched, so a
    /// failed build never leaves partial output behind.
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Join tracks with day groups into a manifest.
///
/// Entries come out in track-enumeration order. Day descriptions are
/// resolved from sidecar `.txt` files next to each track, defaulting to an
/// empty string. All file references are relativized against `base_dir`.
pub fn build(
    tracks: &[Track],
    day_groups: &BTreeMap<String, Vec<Photo>>,
    base_dir: &Path,
) -> Result<Manifest, ManifestError> {
    let mut entries = Vec::with_capacity(tracks.len());
    let mut warnings = Vec::new();

    for track in tracks {
        if let Some(indicated) = track.day_mismatch() {
            warnings.push(Warning::DayMismatch {
                file: track.file_name(),
                indicated,
                positional: track.day_number,
            });
        }

        let mut images = Vec::new();
        if let Some(photos) = day_groups.get(&scan::day_key(track.date)) {
            for photo in photos {
                images.push(ImageRef {
                    url: relative_url(&photo.path, base_dir)?,
                });
            }
        }

        entries.push(TrackEntry {
            gpx_file: relative_url(&track.path, base_dir)?,
            day_title: track.title.clone(),
            color: track.color.clone(),
            day_description: metadata::read_sidecar(&track.path).unwrap_or_default(),
            images,
        });
    }

    Ok(Manifest { entries, warnings })
}

/// Rewrite `target` relative to `base`, forward-slash separated.
///
/// Both paths are canonicalized first so the comparison is unaffected by
/// how the caller spelled them (relative vs absolute, symlinked temp
/// dirs). Targets outside `base` get leading `..` components.
fn relative_url(target: &Path, base: &Path) -> Result<String, ManifestError> {
    let target = fs::canonicalize(target).map_err(|source| ManifestError::Resolve {
        path: target.to_path_buf(),
        source,
    })?;
    let base = fs::canonicalize(base).map_err(|source| ManifestError::Resolve {
        path: base.to_path_buf(),
        source,
    })?;

    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(t, b)| t == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        segments.push("..".to_string());
    }
    for component in &target_parts[common..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }
    Ok(segments.join("/"))
}
