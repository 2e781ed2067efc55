//! Structural statistics over one table.
//!
//! The profiler is pure: it never mutates or reorders the frame it reads,
//! and it never fails — a zero-row table simply profiles to zeros.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

use hdq_model::any_to_string;

/// Structural profile of a single table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: usize,
    /// Null cells per column.
    pub missing_counts: BTreeMap<String, usize>,
    /// Null cells per column as a percentage of the row count, rounded to
    /// two decimals; a zero-row table yields 0.0 everywhere.
    pub missing_percentages: BTreeMap<String, f64>,
    /// Rows that duplicate an earlier row, all columns considered.
    pub duplicate_rows: usize,
    /// Declared dtype per column.
    pub data_types: BTreeMap<String, String>,
    /// Estimated in-memory size in bytes.
    pub memory_bytes: usize,
}

/// Profiles one frame.
pub fn profile_table(frame: &DataFrame) -> TableProfile {
    let rows = frame.height();
    let mut missing_counts = BTreeMap::new();
    let mut missing_percentages = BTreeMap::new();
    let mut data_types = BTreeMap::new();

    for column in frame.get_columns() {
        let name = column.name().to_string();
        let nulls = column.null_count();
        missing_counts.insert(name.clone(), nulls);
        missing_percentages.insert(name.clone(), percentage(nulls, rows));
        data_types.insert(name, column.dtype().to_string());
    }

    TableProfile {
        rows,
        columns: frame.width(),
        missing_counts,
        missing_percentages,
        duplicate_rows: duplicate_rows(frame),
        data_types,
        memory_bytes: frame.estimated_size(),
    }
}

/// Percentage rounded to two decimals; guards the zero-row division.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Counts rows identical to an earlier row (occurrences after the first).
fn duplicate_rows(frame: &DataFrame) -> usize {
    let columns = frame.get_columns();
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(frame.height());
    let mut duplicates = 0;
    for idx in 0..frame.height() {
        let key: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    fn sample_frame() -> DataFrame {
        let id: Column = Series::new("PatientID".into(), vec![Some(1i64), Some(2), Some(2), None]).into();
        let site: Column = Series::new(
            "HospitalSite".into(),
            vec![Some("CHEO"), Some("HSC"), Some("HSC"), None],
        )
        .into();
        DataFrame::new(vec![id, site]).unwrap()
    }

    #[test]
    fn shape_missingness_and_types() {
        let profile = profile_table(&sample_frame());

        assert_eq!(profile.rows, 4);
        assert_eq!(profile.columns, 2);
        assert_eq!(profile.missing_counts["PatientID"], 1);
        assert_eq!(profile.missing_percentages["PatientID"], 25.0);
        assert_eq!(profile.data_types["PatientID"], "i64");
        assert_eq!(profile.data_types["HospitalSite"], "str");
        assert!(profile.memory_bytes > 0);
    }

    #[test]
    fn duplicates_count_occurrences_after_the_first() {
        let profile = profile_table(&sample_frame());
        assert_eq!(profile.duplicate_rows, 1);
    }

    #[test]
    fn percentages_stay_in_range_and_round() {
        let id: Column = Series::new("X".into(), vec![None::<i64>, None, Some(1)]).into();
        let frame = DataFrame::new(vec![id]).unwrap();
        let profile = profile_table(&frame);
        assert_eq!(profile.missing_percentages["X"], 66.67);
    }

    #[test]
    fn zero_row_table_profiles_to_zeros() {
        let id: Column = Series::new("PatientID".into(), Vec::<i64>::new()).into();
        let frame = DataFrame::new(vec![id]).unwrap();
        let profile = profile_table(&frame);

        assert_eq!(profile.rows, 0);
        assert_eq!(profile.missing_counts["PatientID"], 0);
        assert_eq!(profile.missing_percentages["PatientID"], 0.0);
        assert_eq!(profile.duplicate_rows, 0);
    }
}
