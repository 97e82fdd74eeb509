//! Image metadata extraction.
//!
//! Every photo's place in the trip is determined by one embedded field:
//! EXIF `DateTimeOriginal`, the capture timestamp written by the camera.
//! It is read once per file and reused as both the sort key and the
//! day-bucket key.
//!
//! ## The fixed format
//!
//! EXIF encodes the timestamp as ASCII `"YYYY:MM:DD HH:MM:SS"` — colons in
//! the date part, naive local time, no timezone. [`parse_exif_datetime`]
//! parses exactly that shape and nothing else.
//!
//! ## Failure is fatal
//!
//! A photo without a readable `DateTimeOriginal` cannot be placed on any
//! day, so extraction errors are typed and propagate to abort the run:
//! there is no fallback date and no partial manifest. The variants
//! distinguish "no EXIF container at all" ([`MetadataError::Exif`]) from
//! "container present, field absent" ([`MetadataError::MissingDateTime`])
//! from "field present, unparseable" ([`MetadataError::Malformed`]) so the
//! message names the actual defect in the actual file.
//!
//! Only the metadata section of the file is read; pixels are never decoded.
//!
//! ## Sidecar descriptions
//!
//! Day descriptions follow the sidecar convention: a `.txt` file sharing
//! the stem of a track file (`HRP_J1.txt` next to `HRP_J1.gpx`) supplies
//! the `dayDescription` for that day. No sidecar means an empty string in
//! the manifest.

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no EXIF metadata in {path}: {source}")]
    Exif {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },
    #[error("no DateTimeOriginal field in {0}")]
    MissingDateTime(PathBuf),
    #[error("malformed DateTimeOriginal '{value}' in {path}")]
    Malformed { path: PathBuf, value: String },
}

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read the capture timestamp of an image file.
///
/// Opens the file, reads its EXIF container, and parses the
/// `DateTimeOriginal` field. The file handle is dropped before returning,
/// so callers iterating a photo tree hold one file open at a time.
pub fn capture_time(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|source| MetadataError::Exif {
            path: path.to_path_buf(),
            source,
        })?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or_else(|| MetadataError::MissingDateTime(path.to_path_buf()))?;

    let raw = match &field.value {
        Value::Ascii(strings) if !strings.is_empty() => {
            String::from_utf8_lossy(&strings[0]).into_owned()
        }
        other => {
            return Err(MetadataError::Malformed {
                path: path.to_path_buf(),
                value: format!("{other:?}"),
            });
        }
    };

    parse_exif_datetime(&raw).ok_or_else(|| MetadataError::Malformed {
        path: path.to_path_buf(),
        value: raw,
    })
}

/// Parse the fixed EXIF timestamp format `"YYYY:MM:DD HH:MM:SS"`.
///
/// Tolerates surrounding whitespace and a trailing NUL (some writers pad
/// the ASCII field); anything else returns `None`.
pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(char::from(0)).trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT).ok()
}

/// Read a sidecar `.txt` file for a track.
///
/// Given a path like `data/gpx/HRP_J1.gpx`, looks for `data/gpx/HRP_J1.txt`
/// and returns its trimmed contents. Returns `None` if the file doesn't
/// exist or is empty.
pub fn read_sidecar(track_path: &Path) -> Option<String> {
    let sidecar = track_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_photo, write_photo_without_datetime};
    use chrono::{NaiveDate, Timelike};
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // parse_exif_datetime() tests
    // =========================================================================

    #[test]
    fn parse_standard_exif_timestamp() {
        let dt = parse_exif_datetime("2025:07:06 16:01:16").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (16, 1, 16));
    }

    #[test]
    fn parse_tolerates_trailing_nul_and_whitespace() {
        assert!(parse_exif_datetime("2025:07:06 16:01:16\0").is_some());
        assert!(parse_exif_datetime("  2025:07:06 16:01:16  ").is_some());
    }

    #[test]
    fn parse_rejects_other_separators() {
        assert!(parse_exif_datetime("2025-07-06 16:01:16").is_none());
        assert!(parse_exif_datetime("2025/07/06 16:01:16").is_none());
    }

    #[test]
    fn parse_rejects_date_only() {
        assert!(parse_exif_datetime("2025:07:06").is_none());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_exif_datetime("").is_none());
        assert!(parse_exif_datetime("not a timestamp").is_none());
        assert!(parse_exif_datetime("2025:13:40 99:99:99").is_none());
    }

    // =========================================================================
    // capture_time() tests
    // =========================================================================

    #[test]
    fn capture_time_reads_datetime_original() {
        let tmp = TempDir::new().unwrap();
        let photo = tmp.path().join("IMG_0001.jpg");
        write_photo(&photo, "2025:07:06 10:30:00");

        let dt = capture_time(&photo).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());
        assert_eq!((dt.hour(), dt.minute()), (10, 30));
    }

    #[test]
    fn capture_time_fails_without_exif_container() {
        let tmp = TempDir::new().unwrap();
        let photo = tmp.path().join("plain.jpg");
        fs::write(&photo, b"not an image at all").unwrap();

        assert!(matches!(
            capture_time(&photo),
            Err(MetadataError::Exif { .. })
        ));
    }

    #[test]
    fn capture_time_fails_when_field_absent() {
        let tmp = TempDir::new().unwrap();
        let photo = tmp.path().join("no-date.jpg");
        write_photo_without_datetime(&photo);

        assert!(matches!(
            capture_time(&photo),
            Err(MetadataError::MissingDateTime(_))
        ));
    }

    #[test]
    fn capture_time_fails_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            capture_time(&tmp.path().join("absent.jpg")),
            Err(MetadataError::Io(_))
        ));
    }

    // =========================================================================
    // read_sidecar() tests
    // =========================================================================

    #[test]
    fn read_sidecar_finds_matching_txt() {
        let dir = TempDir::new().unwrap();
        let gpx = dir.path().join("HRP_J1.gpx");
        let txt = dir.path().join("HRP_J1.txt");
        fs::write(&gpx, b"<gpx/>").unwrap();
        fs::write(&txt, "Col du Somport to Candanchu").unwrap();

        assert_eq!(
            read_sidecar(&gpx),
            Some("Col du Somport to Candanchu".to_string())
        );
    }

    #[test]
    fn read_sidecar_returns_none_when_no_file() {
        let dir = TempDir::new().unwrap();
        let gpx = dir.path().join("HRP_J1.gpx");
        assert_eq!(read_sidecar(&gpx), None);
    }

    #[test]
    fn read_sidecar_returns_none_for_empty_file() {
        let dir = TempDir::new().unwrap();
        let gpx = dir.path().join("HRP_J1.gpx");
        let txt = dir.path().join("HRP_J1.txt");
        fs::write(&gpx, b"<gpx/>").unwrap();
        fs::write(&txt, "   \n  \t  ").unwrap();
        assert_eq!(read_sidecar(&gpx), None);
    }

    #[test]
    fn read_sidecar_trims_content() {
        let dir = TempDir::new().unwrap();
        let gpx = dir.path().join("HRP_J1.gpx");
        let txt = dir.path().join("HRP_J1.txt");
        fs::write(&gpx, b"<gpx/>").unwrap();
        fs::write(&txt, "\n  Rest day in Lescun  \n").unwrap();

        assert_eq!(read_sidecar(&gpx), Some("Rest day in Lescun".to_string()));
    }
}
