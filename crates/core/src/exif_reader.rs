use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const CAPTURE_TIME_TAGS: &[&str] = &["DateTimeOriginal", "DateTimeDigitized", "DateTime"];

pub fn read_capture_time(path: &Path) -> Result<Option<DateTime<Local>>> {
    let file = File::open(path)
        .with_context(|| format!("could not open file for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("could not parse EXIF: {}", path.display()))?;

    for name in CAPTURE_TIME_TAGS {
        if let Some(date) = find_field_value(&exif, name).and_then(|raw| parse_date(&raw)) {
            return Ok(Some(date));
        }
    }

    Ok(None)
}

fn find_field_value(exif: &exif::Exif, name: &str) -> Option<String> {
    exif.fields().find_map(|field| {
        let tag_name = format!("{:?}", field.tag);
        if name.eq_ignore_ascii_case(&tag_name) {
            Some(field.display_value().to_string())
        } else {
            None
        }
    })
}

fn parse_date(input: &str) -> Option<DateTime<Local>> {
    let normalized = input.trim().trim_matches('"');

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%:z",
    ];

    for fmt in candidates {
        if let Ok(dt) = DateTime::parse_from_str(normalized, fmt) {
            return Some(dt.with_timezone(&Local));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                return Some(local);
            }
        }
    }

    None
}

/// A minimal big-endian JPEG whose IFD0 carries only a `DateTime` tag.
#[cfg(test)]
pub(crate) fn jpeg_with_date_time(date_time: &str) -> Vec<u8> {
    // ASCII value of 19 characters plus the NUL terminator.
    assert_eq!(date_time.len(), 19, "EXIF date layout is YYYY:MM:DD HH:MM:SS");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0132u16.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&20u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(date_time.as_bytes());
    tiff.push(0);

    let mut app1 = b"Exif\x00\x00".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}
