//! Conversions between Polars `AnyValue` cells and plain Rust values.
//!
//! Canonical frames mix typed and string columns, so per-row logic funnels
//! every cell through these helpers instead of matching `AnyValue` variants
//! at each call site.

use polars::prelude::AnyValue;

/// Renders a cell as text. `Null` becomes the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// True when the cell is null or blank text.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Numeric view of a cell; string cells are parsed, everything else that is
/// not a number yields `None`.
pub fn any_to_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s.as_str()),
        _ => None,
    }
}

/// Integer view of a cell; floats are truncated, strings parsed.
pub fn any_to_i64(value: &AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int64(v) => Some(*v),
        AnyValue::Int32(v) => Some(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v).ok(),
        AnyValue::UInt32(v) => Some(i64::from(*v)),
        AnyValue::Float64(v) => Some(*v as i64),
        AnyValue::Float32(v) => Some(*v as i64),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(s.as_str()),
        _ => None,
    }
}

/// Parses trimmed text as `f64`; blank or invalid input yields `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses trimmed text as `i64`, falling back to truncating a float literal
/// ("3.0" is an acceptable stay length in a spreadsheet export).
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    trimmed.parse::<f64>().ok().map(|parsed| parsed as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_rendering() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(42)), "42");
        assert_eq!(any_to_string(AnyValue::String("CHEO")), "CHEO");
    }

    #[test]
    fn missing_detection() {
        assert!(is_missing(&AnyValue::Null));
        assert!(is_missing(&AnyValue::String("  ")));
        assert!(!is_missing(&AnyValue::String("M")));
        assert!(!is_missing(&AnyValue::Int64(0)));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(any_to_f64(&AnyValue::Float64(11.2)), Some(11.2));
        assert_eq!(any_to_f64(&AnyValue::String("2.5")), Some(2.5));
        assert_eq!(any_to_f64(&AnyValue::String("n/a")), None);
        assert_eq!(any_to_i64(&AnyValue::Float64(3.9)), Some(3));
        assert_eq!(any_to_i64(&AnyValue::String("7")), Some(7));
        assert_eq!(any_to_i64(&AnyValue::Null), None);
    }

    #[test]
    fn float_literal_stay_lengths_parse_as_integers() {
        assert_eq!(parse_i64("3.0"), Some(3));
        assert_eq!(parse_i64(" 4 "), Some(4));
        assert_eq!(parse_i64(""), None);
    }
}
