//! Lab values against fixed reference ranges.

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns};

use super::{f64_at, resolve_column, text_at};
use crate::engine::Validator;

/// Reference bounds by test name. Units follow the source convention:
/// Glucose and Sodium in mmol/L, Hemoglobin in g/L.
pub fn reference_range(test: &str) -> Option<(f64, f64)> {
    match test {
        "Glucose" => Some((2.8, 11.1)),
        "Sodium" => Some((136.0, 145.0)),
        "Hemoglobin" => Some((110.0, 160.0)),
        _ => None,
    }
}

/// Flags values outside their test's reference range and test names the
/// range table does not know. An unmatched test has undefined bounds, so it
/// can never trip the range flags — only `unknown_test`.
#[derive(Debug, Clone)]
pub struct LabRangeCheck {
    pub name_column: String,
    pub value_column: String,
}

impl Default for LabRangeCheck {
    fn default() -> Self {
        Self {
            name_column: columns::LAB_TEST_NAME.to_string(),
            value_column: columns::TEST_RESULT_VALUE.to_string(),
        }
    }
}

impl Validator for LabRangeCheck {
    fn name(&self) -> &'static str {
        "lab_reference_range"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.name_column.clone(), self.value_column.clone()]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let (Some(names), Some(values)) = (
            resolve_column(frame, columns, &self.name_column),
            resolve_column(frame, columns, &self.value_column),
        ) else {
            return flags;
        };

        let mut below = Vec::with_capacity(frame.height());
        let mut above = Vec::with_capacity(frame.height());
        let mut unknown = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let range = text_at(names, idx).as_deref().and_then(reference_range);
            let value = f64_at(values, idx);
            below.push(matches!((range, value), (Some((low, _)), Some(v)) if v < low));
            above.push(matches!((range, value), (Some((_, high)), Some(v)) if v > high));
            unknown.push(range.is_none());
        }

        flags.push_column("below_range", below);
        flags.push_column("above_range", above);
        flags.push_column("unknown_test", unknown);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::make_df;
    use crate::engine::run;

    fn labs(rows: Vec<(Option<&str>, Option<&str>)>) -> DataFrame {
        let (names, values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        make_df(vec![("LabTestName", names), ("TestResultValue", values)])
    }

    #[test]
    fn flags_out_of_range_values() {
        let frame = labs(vec![
            (Some("Glucose"), Some("5.0")),
            (Some("Glucose"), Some("12.0")),
            (Some("Sodium"), Some("131")),
            (Some("Hemoglobin"), Some("140")),
        ]);
        let outcome = run(&LabRangeCheck::default(), &frame);
        let flags = outcome.flags().unwrap();

        assert_eq!(flags.column("below_range").unwrap(), &[false, false, true, false]);
        assert_eq!(flags.column("above_range").unwrap(), &[false, true, false, false]);
        assert_eq!(flags.true_count("unknown_test"), Some(0));
    }

    #[test]
    fn unmatched_test_never_trips_range_flags() {
        let frame = labs(vec![(Some("Ferritin"), Some("9999")), (None, Some("1.0"))]);
        let flags_outcome = run(&LabRangeCheck::default(), &frame);
        let flags = flags_outcome.flags().unwrap();

        assert_eq!(flags.column("below_range").unwrap(), &[false, false]);
        assert_eq!(flags.column("above_range").unwrap(), &[false, false]);
        assert_eq!(flags.column("unknown_test").unwrap(), &[true, true]);
    }

    #[test]
    fn null_values_are_not_out_of_range() {
        let frame = labs(vec![(Some("Glucose"), None)]);
        let outcome = run(&LabRangeCheck::default(), &frame);
        let flags = outcome.flags().unwrap();
        assert_eq!(flags.column("below_range").unwrap(), &[false]);
        assert_eq!(flags.column("above_range").unwrap(), &[false]);
    }
}
