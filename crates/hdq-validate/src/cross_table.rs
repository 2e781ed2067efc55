//! Referential integrity of the patient identifier across the three tables.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

use hdq_model::{CanonicalTables, CaseInsensitiveLookup, any_to_i64, columns};

/// The four independent set-membership counts. An identifier column absent
/// from a table contributes zero to its counts, never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyCounts {
    /// Admission rows whose patient identifier is absent from the patient
    /// table (a null identifier counts as unknown).
    pub admissions_with_unknown_patient: u64,
    /// Lab rows whose patient identifier is absent from the patient table.
    pub labs_with_unknown_patient: u64,
    /// Patient identifiers with no admission rows at all.
    pub patients_missing_admissions: u64,
    /// Patient identifiers with no lab rows at all.
    pub patients_missing_labs: u64,
}

impl ConsistencyCounts {
    pub fn total(&self) -> u64 {
        self.admissions_with_unknown_patient
            + self.labs_with_unknown_patient
            + self.patients_missing_admissions
            + self.patients_missing_labs
    }
}

/// Checks the canonical triple on the canonical identifier column.
pub fn check_consistency(tables: &CanonicalTables) -> ConsistencyCounts {
    check_consistency_with(
        &tables.patients,
        &tables.admissions,
        &tables.labs,
        columns::PATIENT_ID,
    )
}

/// Checks three frames joined on `id_column` (case-insensitive).
pub fn check_consistency_with(
    patients: &DataFrame,
    admissions: &DataFrame,
    labs: &DataFrame,
    id_column: &str,
) -> ConsistencyCounts {
    let known = id_set(patients, id_column);
    let admission_ids = id_set(admissions, id_column);
    let lab_ids = id_set(labs, id_column);

    ConsistencyCounts {
        admissions_with_unknown_patient: unknown_rows(admissions, id_column, &known),
        labs_with_unknown_patient: unknown_rows(labs, id_column, &known),
        patients_missing_admissions: known.difference(&admission_ids).count() as u64,
        patients_missing_labs: known.difference(&lab_ids).count() as u64,
    }
}

/// Distinct non-null identifiers in one frame; empty when the column is
/// absent.
fn id_set(frame: &DataFrame, id_column: &str) -> BTreeSet<i64> {
    let lookup = CaseInsensitiveLookup::new(frame.get_column_names_owned());
    let Some(column) = lookup.get(id_column).and_then(|name| frame.column(name).ok()) else {
        return BTreeSet::new();
    };
    (0..frame.height())
        .filter_map(|idx| any_to_i64(&column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Rows whose identifier is null or outside `known`; zero when the column is
/// absent.
fn unknown_rows(frame: &DataFrame, id_column: &str, known: &BTreeSet<i64>) -> u64 {
    let lookup = CaseInsensitiveLookup::new(frame.get_column_names_owned());
    let Some(column) = lookup.get(id_column).and_then(|name| frame.column(name).ok()) else {
        return 0;
    };
    (0..frame.height())
        .filter(|idx| {
            match any_to_i64(&column.get(*idx).unwrap_or(AnyValue::Null)) {
                Some(id) => !known.contains(&id),
                None => true,
            }
        })
        .count() as u64
}
