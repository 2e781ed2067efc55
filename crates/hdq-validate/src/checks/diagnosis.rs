//! Structural ICD-10 code format check. Not a clinical validation: only the
//! shape of the code is examined.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns};

use super::{resolve_column, text_at};
use crate::engine::Validator;

/// Letter in A-T or V-Z (U is reserved), a digit, a digit or A/B, then
/// optionally a dot and 1-4 alphanumerics. Valid: J45, J45.901, S52.5.
static ICD10_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-TV-Z][0-9][0-9AB](\.[0-9A-TV-Z]{1,4})?$").expect("valid pattern")
});

/// Flags absent diagnosis codes and codes that do not match the ICD-10
/// structural pattern. The two flags are independent: a missing code is not
/// also malformed.
#[derive(Debug, Clone)]
pub struct DiagnosisCodeCheck {
    pub code_column: String,
}

impl Default for DiagnosisCodeCheck {
    fn default() -> Self {
        Self {
            code_column: columns::DIAGNOSIS_CODE.to_string(),
        }
    }
}

impl Validator for DiagnosisCodeCheck {
    fn name(&self) -> &'static str {
        "diagnosis_code_format"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.code_column.clone()]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let Some(codes) = resolve_column(frame, columns, &self.code_column) else {
            return flags;
        };

        let mut missing = Vec::with_capacity(frame.height());
        let mut malformed = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            match text_at(codes, idx) {
                Some(code) => {
                    missing.push(false);
                    malformed.push(!ICD10_PATTERN.is_match(&code));
                }
                None => {
                    missing.push(true);
                    malformed.push(false);
                }
            }
        }

        flags.push_column("icd10_missing", missing);
        flags.push_column("icd10_malformed", malformed);
        flags
    }
}
