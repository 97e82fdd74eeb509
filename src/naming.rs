//! Centralized filename parsing for the track day-indicator convention.
//!
//! Trip track files conventionally encode their day number in the filename:
//! `HRP_J1.gpx`, `HRP_J2.gpx`, ... (`J` for *jour*; `D1`-style names work
//! the same way). The indicator is informational only — day assignment is
//! positional, by sort order from the configured start date — but parsing
//! it lets the pipeline flag files whose name disagrees with their
//! position instead of silently ignoring the discrepancy.
//!
//! ## Recognized shape
//!
//! The stem is split on `_` and `-`; the first segment that is a single
//! ASCII letter followed by one to three digits yields the day number:
//! - `"HRP_J1"` → Some(1)
//! - `"HRP_J12"` → Some(12)
//! - `"stage-d3"` → Some(3)
//! - `"J7"` → Some(7)
//! - `"2025_07_06"` → None (bare digit runs are dates, not day markers)
//! - `"coastal_walk"` → None

/// Parse the day number a track filename stem claims to carry.
///
/// Returns `None` when no segment matches the indicator shape. Never used
/// for day assignment — validation only.
pub fn parse_day_indicator(stem: &str) -> Option<u32> {
    stem.split(['_', '-'])
        .find_map(|segment| {
            let mut chars = segment.chars();
            let first = chars.next()?;
            if !first.is_ascii_alphabetic() {
                return None;
            }
            let digits = chars.as_str();
            if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            digits.parse().ok()
        })
}
