//! Rule validators, one per concern.

mod age;
mod dates;
mod diagnosis;
mod gender;
mod lab_range;
mod stay;

pub use age::AgeCheck;
pub use dates::DateCheck;
pub use diagnosis::DiagnosisCodeCheck;
pub use gender::GenderCheck;
pub use lab_range::{LabRangeCheck, reference_range};
pub use stay::StayConsistencyCheck;

use chrono::NaiveDate;
use polars::prelude::{AnyValue, Column, DataFrame};

use hdq_model::{CaseInsensitiveLookup, any_to_f64, any_to_i64, any_to_string, is_missing, parse_date};

/// Resolves a column through the case-insensitive lookup.
pub(crate) fn resolve_column<'a>(
    frame: &'a DataFrame,
    columns: &CaseInsensitiveLookup,
    name: &str,
) -> Option<&'a Column> {
    columns
        .get(name)
        .and_then(|resolved| frame.column(resolved).ok())
}

pub(crate) fn f64_at(column: &Column, idx: usize) -> Option<f64> {
    any_to_f64(&column.get(idx).unwrap_or(AnyValue::Null))
}

pub(crate) fn i64_at(column: &Column, idx: usize) -> Option<i64> {
    any_to_i64(&column.get(idx).unwrap_or(AnyValue::Null))
}

/// Trimmed non-empty text at a cell.
pub(crate) fn text_at(column: &Column, idx: usize) -> Option<String> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    if is_missing(&value) {
        return None;
    }
    Some(any_to_string(value).trim().to_string())
}

/// Calendar date at a cell, null-coercing unparsable text.
pub(crate) fn date_at(column: &Column, idx: usize) -> Option<NaiveDate> {
    parse_date(&any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
}

#[cfg(test)]
pub(crate) mod testing {
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    /// Builds a string-typed frame from (name, cells) pairs; empty cells
    /// become null. Mirrors how canonical frames carry optional text.
    pub(crate) fn make_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| Series::new(name.into(), values).into())
            .collect();
        DataFrame::new(cols).unwrap()
    }
}
