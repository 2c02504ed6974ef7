//! Cell-level parsing for the incident CSV.
//!
//! Null normalization, date token extraction, and the derived-field
//! computations (parsed date, inverted coordinates, point radius). Every
//! function here is pure and row-independent.

use std::sync::LazyLock;

use chrono::{NaiveDate, Weekday};
use missing_migrants_incident_models::LonLat;
use regex::Regex;

/// Cell values the source file uses to mean "no value".
pub const NULL_MARKERS: &[&str] = &["", "NA", " "];

/// Leading `"<weekday>, MM/DD/YYYY"` token of an incident date. Month and
/// day may be unpadded.
static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{3}, [0-9]{1,2}/[0-9]{1,2}/[0-9]{4}(?-u:\b)").expect("valid regex")
});

/// Returns `None` for null markers, the cell otherwise.
#[must_use]
pub fn normalize_null(cell: &str) -> Option<&str> {
    if NULL_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell)
    }
}

/// Keeps only the leading `"<weekday>, MM/DD/YYYY"` token of a raw date,
/// dropping trailing time-of-day or annotation text.
///
/// Text without that token is returned unchanged.
#[must_use]
pub fn extract_date_token(raw: &str) -> &str {
    DATE_TOKEN_RE.find(raw).map_or(raw, |m| m.as_str())
}

/// Parses an incident date with the fixed `"%a, %m/%d/%Y"` layout.
///
/// The weekday must be a valid abbreviation but is not cross-checked
/// against the calendar date.
#[must_use]
pub fn parse_incident_date(raw: &str) -> Option<NaiveDate> {
    let (weekday, date) = raw.split_once(", ")?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return None;
    }
    NaiveDate::parse_from_str(date, "%m/%d/%Y").ok()
}

/// Parses a stored `"<lat>, <lon>"` pair into `(lon, lat)` order.
///
/// Returns `None` unless the text splits into exactly two finite floats.
#[must_use]
pub fn parse_coordinates(raw: &str) -> Option<LonLat> {
    let mut parts = raw.split(',');
    let lat = parse_finite(parts.next()?)?;
    let lon = parse_finite(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(LonLat::new(lon, lat))
}

fn parse_finite(part: &str) -> Option<f64> {
    part.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Relative point-size weight for a map layer.
#[must_use]
pub fn radius(total_dead_and_missing: u32) -> f64 {
    f64::from(total_dead_and_missing).sqrt()
}

/// Parses a non-negative count, accepting float-formatted integers
/// such as `"3.0"`.
#[must_use]
pub fn parse_count(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<u32>() {
        return Some(value);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u32)
}

/// Parses a year, accepting float-formatted integers such as `"2014.0"`.
#[must_use]
pub fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<i32>() {
        return Some(value);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.fract() != 0.0 || !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(value as i32)
}
