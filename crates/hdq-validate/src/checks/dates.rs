//! Admission/discharge date sanity.

use polars::prelude::DataFrame;

use hdq_model::{CaseInsensitiveLookup, FlagTable, columns, days_between};

use super::{date_at, resolve_column};
use crate::engine::Validator;

const LONG_STAY_DAYS: i64 = 60;

/// Flags absent dates, discharge earlier than admission, and date spans past
/// sixty days. Span flags need both dates; a missing date is undecidable and
/// only trips its own missing flag.
#[derive(Debug, Clone)]
pub struct DateCheck {
    pub admit_column: String,
    pub discharge_column: String,
}

impl Default for DateCheck {
    fn default() -> Self {
        Self {
            admit_column: columns::ADMISSION_DATE.to_string(),
            discharge_column: columns::DISCHARGE_DATE.to_string(),
        }
    }
}

impl Validator for DateCheck {
    fn name(&self) -> &'static str {
        "date_sanity"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.admit_column.clone(), self.discharge_column.clone()]
    }

    fn evaluate(&self, frame: &DataFrame, columns: &CaseInsensitiveLookup) -> FlagTable {
        let mut flags = FlagTable::new(frame.height());
        let (Some(admits), Some(discharges)) = (
            resolve_column(frame, columns, &self.admit_column),
            resolve_column(frame, columns, &self.discharge_column),
        ) else {
            return flags;
        };

        let mut missing_admit = Vec::with_capacity(frame.height());
        let mut missing_discharge = Vec::with_capacity(frame.height());
        let mut reversed = Vec::with_capacity(frame.height());
        let mut long_stay = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let admit = date_at(admits, idx);
            let discharge = date_at(discharges, idx);
            missing_admit.push(admit.is_none());
            missing_discharge.push(discharge.is_none());
            match (admit, discharge) {
                (Some(start), Some(stop)) => {
                    reversed.push(stop < start);
                    long_stay.push(days_between(start, stop) > LONG_STAY_DAYS);
                }
                _ => {
                    reversed.push(false);
                    long_stay.push(false);
                }
            }
        }

        flags.push_column("missing_admit", missing_admit);
        flags.push_column("missing_discharge", missing_discharge);
        flags.push_column("discharge_before_admit", reversed);
        flags.push_column("long_stay_over_60d", long_stay);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::make_df;
    use crate::engine::run;

    fn admissions(rows: Vec<(Option<&str>, Option<&str>)>) -> DataFrame {
        let (admits, discharges): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        make_df(vec![
            ("AdmissionDate", admits),
            ("DischargeDate", discharges),
        ])
    }

    #[test]
    fn flags_reversed_and_long_stays() {
        let frame = admissions(vec![
            (Some("2024-01-10"), Some("2024-01-05")),
            (Some("2024-01-01"), Some("2024-03-15")),
            (Some("2024-01-01"), Some("2024-01-04")),
        ]);
        let outcome = run(&DateCheck::default(), &frame);
        let flags = outcome.flags().unwrap();

        assert_eq!(flags.column("discharge_before_admit").unwrap(), &[true, false, false]);
        assert_eq!(flags.column("long_stay_over_60d").unwrap(), &[false, true, false]);
    }

    #[test]
    fn missing_dates_flag_only_missingness() {
        let frame = admissions(vec![(None, Some("2024-01-05")), (Some("2024-01-05"), None)]);
        let outcome = run(&DateCheck::default(), &frame);
        let flags = outcome.flags().unwrap();

        assert_eq!(flags.column("missing_admit").unwrap(), &[true, false]);
        assert_eq!(flags.column("missing_discharge").unwrap(), &[false, true]);
        assert_eq!(flags.true_count("discharge_before_admit"), Some(0));
        assert_eq!(flags.true_count("long_stay_over_60d"), Some(0));
    }

    #[test]
    fn exactly_sixty_days_is_not_long() {
        let frame = admissions(vec![(Some("2024-01-01"), Some("2024-03-01"))]);
        let outcome = run(&DateCheck::default(), &frame);
        // 2024-01-01 to 2024-03-01 is exactly 60 days.
        assert_eq!(
            outcome.flags().unwrap().true_count("long_stay_over_60d"),
            Some(0)
        );
    }
}
