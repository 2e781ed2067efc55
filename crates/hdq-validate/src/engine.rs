//! Validator applicability and dispatch.
//!
//! A validator declares the columns it needs; the engine resolves them
//! against the frame's schema before invoking it. A frame that lacks a
//! declared column yields a tagged [`Outcome::NotApplicable`] — deliberately
//! distinct from an evaluated flag table with zero set bits, so reporting can
//! tell "not checked" from "checked, clean".

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable};

/// A pure rule check over one table. Implementations never mutate the frame
/// and never fail: every rule reduces to per-row boolean predicates.
pub trait Validator {
    /// Stable identifier used in reports.
    fn name(&self) -> &'static str;

    /// Columns this validator needs, with any caller overrides applied.
    fn required_columns(&self) -> Vec<String>;

    /// Produces the flag table. Only called when every required column
    /// resolved; `columns` carries the case-insensitive resolution.
    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable;
}

/// Result of running one validator against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The validator ran; the flag table is row-aligned with the input.
    Evaluated(FlagTable),
    /// One or more declared columns were absent; the validator did not run.
    NotApplicable { missing: Vec<String> },
}

impl Outcome {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Evaluated(_))
    }

    pub fn flags(&self) -> Option<&FlagTable> {
        match self {
            Self::Evaluated(flags) => Some(flags),
            Self::NotApplicable { .. } => None,
        }
    }

    /// Total set flags, zero when not applicable.
    pub fn flagged_total(&self) -> usize {
        self.flags()
            .map(|flags| flags.counts().values().sum())
            .unwrap_or(0)
    }
}

/// Resolves the validator's declared columns and either runs it or reports
/// why it could not run.
pub fn run(validator: &dyn Validator, frame: &DataFrame) -> Outcome {
    let lookup = CaseInsensitiveLookup::new(frame.get_column_names_owned());
    let missing: Vec<String> = validator
        .required_columns()
        .into_iter()
        .filter(|column| !lookup.contains(column))
        .collect();
    if !missing.is_empty() {
        return Outcome::NotApplicable { missing };
    }
    Outcome::Evaluated(validator.evaluate(frame, &lookup))
}
