//! Shared test utilities for the tripmap test suite.
//!
//! The pipeline's only metadata dependency is EXIF `DateTimeOriginal`, so
//! fixtures don't need real photographs — just files whose metadata
//! section parses. [`write_photo`] emits a minimal JPEG that is nothing
//! but an EXIF container: SOI, one APP1 segment holding a hand-laid-out
//! little-endian TIFF structure with the timestamp, EOI. No scan data, no
//! pixels.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::write_photo;
//!
//! let tmp = TempDir::new().unwrap();
//! write_photo(&tmp.path().join("x.jpg"), "2025:07:06 10:00:00");
//! let photos = scan::collect_photos(tmp.path()).unwrap();
//! ```

use std::fs;
use std::path::Path;

/// Write a minimal JPEG carrying only an EXIF `DateTimeOriginal` field.
///
/// `datetime` must be the exact EXIF shape `"YYYY:MM:DD HH:MM:SS"`.
pub fn write_photo(path: &Path, datetime: &str) {
    fs::write(path, exif_jpeg_bytes(Some(datetime))).unwrap();
}

/// Write a JPEG with a valid EXIF container but no `DateTimeOriginal`
/// (the primary IFD holds only an Orientation tag).
pub fn write_photo_without_datetime(path: &Path) {
    fs::write(path, exif_jpeg_bytes(None)).unwrap();
}

/// Build the JPEG bytes: `FFD8` + APP1("Exif\0\0" + TIFF) + `FFD9`.
fn exif_jpeg_bytes(datetime_original: Option<&str>) -> Vec<u8> {
    let tiff = match datetime_original {
        Some(dt) => tiff_with_datetime(dt),
        None => tiff_without_datetime(),
    };

    let mut jpeg = vec![0xFF, 0xD8]; // SOI
    jpeg.extend_from_slice(&[0xFF, 0xE1]); // APP1
    let segment_len = (2 + 6 + tiff.len()) as u16; // includes the length field itself
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]); // EOI
    jpeg
}

/// Little-endian TIFF: IFD0 → Exif sub-IFD → DateTimeOriginal (ASCII).
///
/// Layout (byte offsets from the TIFF header):
/// ```text
///  0  "II" 42, IFD0 offset = 8
///  8  IFD0: 1 entry [ExifIFDPointer 0x8769 = 26], next = 0
/// 26  ExifIFD: 1 entry [DateTimeOriginal 0x9003, ASCII x20 @ 44], next = 0
/// 44  "YYYY:MM:DD HH:MM:SS\0"
/// ```
fn tiff_with_datetime(datetime: &str) -> Vec<u8> {
    assert_eq!(
        datetime.len(),
        19,
        "EXIF timestamps are exactly 19 characters"
    );
    let mut tiff = tiff_header();
    // IFD0
    push_u16(&mut tiff, 1);
    push_entry(&mut tiff, 0x8769, 4, 1, 26); // ExifIFDPointer, LONG
    push_u32(&mut tiff, 0);
    // Exif IFD
    push_u16(&mut tiff, 1);
    push_entry(&mut tiff, 0x9003, 2, 20, 44); // DateTimeOriginal, ASCII
    push_u32(&mut tiff, 0);
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);
    tiff
}

/// TIFF whose IFD0 carries only Orientation = 1, inline value.
fn tiff_without_datetime() -> Vec<u8> {
    let mut tiff = tiff_header();
    push_u16(&mut tiff, 1);
    push_entry(&mut tiff, 0x0112, 3, 1, 1); // Orientation, SHORT, inline
    push_u32(&mut tiff, 0);
    tiff
}

fn tiff_header() -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    push_u16(&mut tiff, 42);
    push_u32(&mut tiff, 8);
    tiff
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// One 12-byte IFD entry: tag, field type, count, value-or-offset.
///
/// SHORT inline values occupy the low two bytes of the value word, which
/// `to_le_bytes` on the u32 already produces.
fn push_entry(buf: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    push_u16(buf, tag);
    push_u16(buf, field_type);
    push_u32(buf, count);
    push_u32(buf, value);
}
