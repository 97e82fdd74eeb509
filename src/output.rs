//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is day-centric, not file-centric: the primary line for each
//! entry is its positional index and day title, with the track file and
//! assigned date as indented context lines. The listing reads as a trip
//! itinerary while still letting users trace every entry back to a file.
//!
//! ```text
//! Days
//! 001 Day 1 (3 photos)
//!     Source: HRP_J1.gpx
//!     Date: 2025-07-06
//! 002 Day 2 (no photos)
//!     Source: HRP_J2.gpx
//!     Date: 2025-07-07
//!
//! Warnings
//!     HRP_J5.gpx is named as day 5 but sits at day 1; dates are assigned by position
//!
//! Manifest: tracks.json (2 days, 3 photos)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::manifest::{Manifest, Warning};
use crate::tracks::Track;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photo_count(n: usize) -> String {
    match n {
        0 => "no photos".to_string(),
        1 => "1 photo".to_string(),
        n => format!("{n} photos"),
    }
}

/// Format the day listing. `tracks` and `manifest.entries` are parallel,
/// both in enumeration order.
fn format_days(tracks: &[Track], manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Days".to_string()];
    for (track, entry) in tracks.iter().zip(&manifest.entries) {
        lines.push(format!(
            "{} {} ({})",
            format_index(track.day_number as usize),
            entry.day_title,
            photo_count(entry.images.len())
        ));
        lines.push(format!("{}Source: {}", indent(1), track.file_name()));
        lines.push(format!("{}Date: {}", indent(1), track.date));
        if !entry.day_description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                track.path.with_extension("txt").file_name().map_or_else(
                    String::new,
                    |n| n.to_string_lossy().to_string()
                )
            ));
        }
    }
    lines
}

fn format_warnings(warnings: &[Warning]) -> Vec<String> {
    if warnings.is_empty() {
        return vec![];
    }
    let mut lines = vec![String::new(), "Warnings".to_string()];
    for warning in warnings {
        lines.push(format!("{}{warning}", indent(1)));
    }
    lines
}

/// Format the `build` report: day listing, warnings, manifest summary.
pub fn format_build_output(tracks: &[Track], manifest: &Manifest, output: &Path) -> Vec<String> {
    let mut lines = format_days(tracks, manifest);
    lines.extend(format_warnings(&manifest.warnings));
    let photos: usize = manifest.entries.iter().map(|e| e.images.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Manifest: {} ({}, {})",
        output.display(),
        days_count(manifest.entries.len()),
        photo_count(photos)
    ));
    lines
}

/// Format the `check` report: same listing, validity summary, no file.
pub fn format_check_output(tracks: &[Track], manifest: &Manifest) -> Vec<String> {
    let mut lines = format_days(tracks, manifest);
    lines.extend(format_warnings(&manifest.warnings));
    lines.push(String::new());
    if manifest.warnings.is_empty() {
        lines.push("Inputs are valid".to_string());
    } else {
        lines.push(format!(
            "Inputs are valid ({})",
            warning_count(manifest.warnings.len())
        ));
    }
    lines
}

fn warning_count(n: usize) -> String {
    if n == 1 {
        "1 warning".to_string()
    } else {
        format!("{n} warnings")
    }
}

fn days_count(n: usize) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

pub fn print_build_output(tracks: &[Track], manifest: &Manifest, output: &Path) {
    for line in format_build_output(tracks, manifest, output) {
        println!("{line}");
    }
}

pub fn print_check_output(tracks: &[Track], manifest: &Manifest) {
    for line in format_check_output(tracks, manifest) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ImageRef, TrackEntry};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn track(day: u32, name: &str, indicated: Option<u32>) -> Track {
        Track {
            path: PathBuf::from(format!("data/gpx/{name}")),
            index: (day - 1) as usize,
            day_number: day,
            date: NaiveDate::from_ymd_opt(2025, 7, 6).unwrap()
                + chrono::Duration::days((day - 1) as i64),
            color: "#0000FF".to_string(),
            title: format!("Day {day}"),
            indicated_day: indicated,
        }
    }

    fn entry(title: &str, description: &str, image_count: usize) -> TrackEntry {
        TrackEntry {
            gpx_file: "data/gpx/x.gpx".to_string(),
            day_title: title.to_string(),
            color: "#0000FF".to_string(),
            day_description: description.to_string(),
            images: (0..image_count)
                .map(|i| ImageRef {
                    url: format!("data/images/{i}.jpg"),
                })
                .collect(),
        }
    }

    #[test]
    fn day_lines_show_index_title_and_count() {
        let tracks = vec![track(1, "HRP_J1.gpx", Some(1))];
        let manifest = Manifest {
            entries: vec![entry("Day 1", "", 3)],
            warnings: vec![],
        };

        let lines = format_build_output(&tracks, &manifest, Path::new("tracks.json"));
        assert_eq!(lines[0], "Days");
        assert_eq!(lines[1], "001 Day 1 (3 photos)");
        assert_eq!(lines[2], "    Source: HRP_J1.gpx");
        assert_eq!(lines[3], "    Date: 2025-07-06");
    }

    #[test]
    fn zero_photos_displayed_as_no_photos() {
        let tracks = vec![track(1, "HRP_J1.gpx", None)];
        let manifest = Manifest {
            entries: vec![entry("Day 1", "", 0)],
            warnings: vec![],
        };

        let lines = format_check_output(&tracks, &manifest);
        assert!(lines.contains(&"001 Day 1 (no photos)".to_string()));
    }

    #[test]
    fn description_line_only_when_present() {
        let tracks = vec![track(1, "HRP_J1.gpx", None), track(2, "HRP_J2.gpx", None)];
        let manifest = Manifest {
            entries: vec![entry("Day 1", "A description", 0), entry("Day 2", "", 0)],
            warnings: vec![],
        };

        let lines = format_check_output(&tracks, &manifest);
        let described: Vec<_> = lines
            .iter()
            .filter(|l| l.contains("Description:"))
            .collect();
        assert_eq!(described, vec!["    Description: HRP_J1.txt"]);
    }

    #[test]
    fn warnings_section_appears_when_non_empty() {
        let tracks = vec![track(1, "HRP_J5.gpx", Some(5))];
        let manifest = Manifest {
            entries: vec![entry("Day 1", "", 0)],
            warnings: vec![Warning::DayMismatch {
                file: "HRP_J5.gpx".to_string(),
                indicated: 5,
                positional: 1,
            }],
        };

        let lines = format_check_output(&tracks, &manifest);
        assert!(lines.contains(&"Warnings".to_string()));
        assert!(lines.iter().any(|l| l.contains("named as day 5")));
        assert!(lines.last().unwrap().contains("1 warning"));
    }

    #[test]
    fn build_summary_totals_days_and_photos() {
        let tracks = vec![track(1, "a.gpx", None), track(2, "b.gpx", None)];
        let manifest = Manifest {
            entries: vec![entry("Day 1", "", 2), entry("Day 2", "", 1)],
            warnings: vec![],
        };

        let lines = format_build_output(&tracks, &manifest, Path::new("out/tracks.json"));
        assert_eq!(
            lines.last().unwrap(),
            "Manifest: out/tracks.json (2 days, 3 photos)"
        );
    }
}
