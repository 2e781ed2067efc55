//! Lenient calendar-date parsing.
//!
//! Source files carry dates in a handful of layouts (plain ISO dates,
//! timestamped exports, slash-separated spreadsheets). Coercion is always
//! graceful: an unparsable value yields `None`, never an error, so callers
//! can null out bad cells and let the validators report on them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a calendar date out of `raw`, trying plain dates first, then
/// timestamps (RFC 3339 and naive). Empty and unparsable input yield `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    if let Ok(stamped) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamped.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(stamp.date());
        }
    }
    None
}

/// Signed whole-day span from `start` to `end` (negative when `end` precedes).
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Canonical ISO `YYYY-MM-DD` rendering.
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
