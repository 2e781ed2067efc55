//! Stored length-of-stay versus the dates that should imply it.

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns, days_between};

use super::{date_at, i64_at, resolve_column};
use crate::engine::Validator;

/// Flags rows whose stored `LengthOfStay` disagrees with the admit/discharge
/// day span. Rows missing either date are undecidable, not wrong, and are
/// never flagged; a missing stored value with both dates present counts as a
/// mismatch.
#[derive(Debug, Clone)]
pub struct StayConsistencyCheck {
    pub admit_column: String,
    pub discharge_column: String,
    pub stay_column: String,
}

impl Default for StayConsistencyCheck {
    fn default() -> Self {
        Self {
            admit_column: columns::ADMISSION_DATE.to_string(),
            discharge_column: columns::DISCHARGE_DATE.to_string(),
            stay_column: columns::LENGTH_OF_STAY.to_string(),
        }
    }
}

impl Validator for StayConsistencyCheck {
    fn name(&self) -> &'static str {
        "length_of_stay_consistency"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![
            self.admit_column.clone(),
            self.discharge_column.clone(),
            self.stay_column.clone(),
        ]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let (Some(admits), Some(discharges), Some(stays)) = (
            resolve_column(frame, columns, &self.admit_column),
            resolve_column(frame, columns, &self.discharge_column),
            resolve_column(frame, columns, &self.stay_column),
        ) else {
            return flags;
        };

        let mut mismatch = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let flagged = match (date_at(admits, idx), date_at(discharges, idx)) {
                (Some(start), Some(stop)) => {
                    i64_at(stays, idx) != Some(days_between(start, stop))
                }
                _ => false,
            };
            mismatch.push(flagged);
        }

        flags.push_column("los_mismatch", mismatch);
        flags
    }
}
