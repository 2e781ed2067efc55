//! Row-aligned boolean flag tables produced by validators.

use std::collections::BTreeMap;

use serde::Serialize;

/// A set of named boolean columns, all the same length as the table that was
/// validated. Flags are independent predicates: several may be true for one
/// row, and a flag table never mutates or filters the rows it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagTable {
    rows: usize,
    columns: Vec<(String, Vec<bool>)>,
}

impl FlagTable {
    /// An empty flag table aligned to `rows` input rows.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    /// Adds a flag column. `values` must be aligned row-for-row with the
    /// validated table; misalignment is a caller bug.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<bool>) {
        assert_eq!(
            values.len(),
            self.rows,
            "flag column must align with the validated table"
        );
        self.columns.push((name.into(), values));
    }

    /// Number of rows in the validated table.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of flag columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[bool]> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Count of set flags in one column, `None` when the column is absent.
    pub fn true_count(&self, name: &str) -> Option<usize> {
        self.column(name)
            .map(|values| values.iter().filter(|flag| **flag).count())
    }

    /// Set-flag counts for every column, in insertion-independent order.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.columns
            .iter()
            .map(|(name, values)| {
                (
                    name.clone(),
                    values.iter().filter(|flag| **flag).count(),
                )
            })
            .collect()
    }

    /// True when at least one flag is set anywhere in the table.
    pub fn any_flagged(&self) -> bool {
        self.columns
            .iter()
            .any(|(_, values)| values.iter().any(|flag| *flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_lookup() {
        let mut flags = FlagTable::new(3);
        flags.push_column("negative_age", vec![false, true, false]);
        flags.push_column("adult_age", vec![false, false, false]);

        assert_eq!(flags.rows(), 3);
        assert_eq!(flags.column_count(), 2);
        assert_eq!(flags.true_count("negative_age"), Some(1));
        assert_eq!(flags.true_count("adult_age"), Some(0));
        assert_eq!(flags.true_count("missing"), None);
        assert!(flags.any_flagged());
        assert_eq!(flags.counts().get("negative_age"), Some(&1));
    }

    #[test]
    fn zero_columns_is_distinct_from_zero_flags() {
        let empty = FlagTable::new(5);
        assert_eq!(empty.column_count(), 0);
        assert!(!empty.any_flagged());
    }

    #[test]
    #[should_panic(expected = "align")]
    fn misaligned_column_panics() {
        let mut flags = FlagTable::new(2);
        flags.push_column("oops", vec![true]);
    }
}
