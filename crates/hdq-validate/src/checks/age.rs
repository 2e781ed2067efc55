//! Age plausibility for a pediatric population.

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns};

use super::{f64_at, resolve_column};
use crate::engine::Validator;

/// Flags implausible ages: negative values, adults in a pediatric cohort
/// (>= 18), and values past any plausible rounding slack (> 21).
#[derive(Debug, Clone)]
pub struct AgeCheck {
    pub age_column: String,
}

impl Default for AgeCheck {
    fn default() -> Self {
        Self {
            age_column: columns::AGE.to_string(),
        }
    }
}

const ADULT_AGE: f64 = 18.0;
const EXTREME_AGE: f64 = 21.0;

impl Validator for AgeCheck {
    fn name(&self) -> &'static str {
        "age_plausibility"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.age_column.clone()]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let Some(ages) = resolve_column(frame, columns, &self.age_column) else {
            return flags;
        };

        let mut negative = Vec::with_capacity(frame.height());
        let mut adult = Vec::with_capacity(frame.height());
        let mut extreme = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let age = f64_at(ages, idx);
            negative.push(age.is_some_and(|years| years < 0.0));
            adult.push(age.is_some_and(|years| years >= ADULT_AGE));
            extreme.push(age.is_some_and(|years| years > EXTREME_AGE));
        }

        flags.push_column("negative_age", negative);
        flags.push_column("adult_age", adult);
        flags.push_column("extreme_age", extreme);
        flags
    }
}
