//! Gender codes against an allowed set.

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns};

use super::{resolve_column, text_at};
use crate::engine::Validator;

/// Flags absent gender codes and codes outside the allowed set. The set
/// defaults to {M, F} and is overridable for sources with richer coding.
#[derive(Debug, Clone)]
pub struct GenderCheck {
    pub gender_column: String,
    pub allowed: Vec<String>,
}

impl Default for GenderCheck {
    fn default() -> Self {
        Self {
            gender_column: columns::GENDER.to_string(),
            allowed: vec!["M".to_string(), "F".to_string()],
        }
    }
}

impl Validator for GenderCheck {
    fn name(&self) -> &'static str {
        "gender_codes"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.gender_column.clone()]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let Some(genders) = resolve_column(frame, columns, &self.gender_column) else {
            return flags;
        };

        let mut missing = Vec::with_capacity(frame.height());
        let mut invalid = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            match text_at(genders, idx) {
                Some(code) => {
                    missing.push(false);
                    invalid.push(!self.allowed.contains(&code));
                }
                None => {
                    missing.push(true);
                    invalid.push(false);
                }
            }
        }

        flags.push_column("gender_missing", missing);
        flags.push_column("gender_invalid", invalid);
        flags
    }
}
