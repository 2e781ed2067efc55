//! Identity adapter for directories that already carry the canonical schema.
//!
//! Known columns are typed (identifiers and stay lengths to integers, lab
//! values to floats, dates coerced to ISO-or-null); any extra source columns
//! ride along untouched as nullable text so downstream validators can still
//! reach them.

use std::path::Path;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use hdq_model::{CanonicalTables, columns, parse_date, parse_f64, parse_i64, to_iso_date};

use crate::error::Result;
use crate::table::{CsvTable, non_empty, read_csv_table};

pub const PATIENTS_FILE: &str = "patients.csv";
pub const ADMISSIONS_FILE: &str = "admissions.csv";
pub const LABS_FILE: &str = "labs.csv";

/// The canonical three-file set, all required for this adapter to run.
pub const CANONICAL_FILES: &[&str] = &[PATIENTS_FILE, ADMISSIONS_FILE, LABS_FILE];

/// How a known canonical column is typed when present in the source.
#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Int,
    /// Fractional at the source, floored to whole units (ages).
    FloorInt,
    Float,
    /// Coerced to ISO `YYYY-MM-DD`; unparsable values become null.
    Date,
    Text,
}

const PATIENT_SCHEMA: &[(&str, ColumnKind)] = &[
    (columns::PATIENT_ID, ColumnKind::Int),
    (columns::AGE, ColumnKind::FloorInt),
    (columns::GENDER, ColumnKind::Text),
    (columns::HOSPITAL_SITE, ColumnKind::Text),
    (columns::DIAGNOSIS_NAME, ColumnKind::Text),
];

const ADMISSION_SCHEMA: &[(&str, ColumnKind)] = &[
    (columns::PATIENT_ID, ColumnKind::Int),
    (columns::ADMISSION_DATE, ColumnKind::Date),
    (columns::DISCHARGE_DATE, ColumnKind::Date),
    (columns::LENGTH_OF_STAY, ColumnKind::Int),
    (columns::HOSPITAL_SITE, ColumnKind::Text),
    (columns::DIAGNOSIS_NAME, ColumnKind::Text),
];

const LAB_SCHEMA: &[(&str, ColumnKind)] = &[
    (columns::PATIENT_ID, ColumnKind::Int),
    (columns::LAB_TEST_NAME, ColumnKind::Text),
    (columns::TEST_RESULT_VALUE, ColumnKind::Float),
    (columns::COLLECTED_DATE, ColumnKind::Date),
];

/// Parses the canonical three-file set from `dir`.
pub fn load_canonical_dir(dir: &Path) -> Result<CanonicalTables> {
    let patients = build_frame(&read_csv_table(&dir.join(PATIENTS_FILE))?, PATIENT_SCHEMA)?;
    let admissions = build_frame(&read_csv_table(&dir.join(ADMISSIONS_FILE))?, ADMISSION_SCHEMA)?;
    let labs = build_frame(&read_csv_table(&dir.join(LABS_FILE))?, LAB_SCHEMA)?;
    debug!(
        patients = patients.height(),
        admissions = admissions.height(),
        labs = labs.height(),
        "parsed canonical csv set"
    );
    Ok(CanonicalTables::new(patients, admissions, labs))
}

fn build_frame(table: &CsvTable, schema: &[(&str, ColumnKind)]) -> Result<DataFrame> {
    let mut used = vec![false; table.headers.len()];
    let mut cols: Vec<Column> = Vec::new();

    for (name, kind) in schema {
        let Some(idx) = table.column_index(name) else {
            continue;
        };
        used[idx] = true;
        cols.push(typed_column(table, idx, name, *kind));
    }

    // Passthrough for source columns outside the canonical schema.
    for (idx, header) in table.headers.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let values: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| non_empty(&row[idx]))
            .collect();
        cols.push(Series::new(header.as_str().into(), values).into());
    }

    Ok(DataFrame::new(cols)?)
}

fn typed_column(table: &CsvTable, idx: usize, name: &str, kind: ColumnKind) -> Column {
    match kind {
        ColumnKind::Int => {
            let values: Vec<Option<i64>> =
                table.rows.iter().map(|row| parse_i64(&row[idx])).collect();
            Series::new(name.into(), values).into()
        }
        ColumnKind::FloorInt => {
            let values: Vec<Option<i64>> = table
                .rows
                .iter()
                .map(|row| parse_f64(&row[idx]).map(|value| value.floor() as i64))
                .collect();
            Series::new(name.into(), values).into()
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> =
                table.rows.iter().map(|row| parse_f64(&row[idx])).collect();
            Series::new(name.into(), values).into()
        }
        ColumnKind::Date => {
            let values: Vec<Option<String>> = table
                .rows
                .iter()
                .map(|row| parse_date(&row[idx]).map(to_iso_date))
                .collect();
            Series::new(name.into(), values).into()
        }
        ColumnKind::Text => {
            let values: Vec<Option<String>> = table
                .rows
                .iter()
                .map(|row| non_empty(&row[idx]))
                .collect();
            Series::new(name.into(), values).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdq_model::any_to_i64;
    use polars::prelude::AnyValue;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn types_known_columns_and_passes_extras_through() {
        let source = table(
            &["PatientID", "Age", "Gender", "Notes"],
            &[&["1", "6.8", "F", "seen twice"], &["2", "", "M", ""]],
        );
        let frame = build_frame(&source, PATIENT_SCHEMA).unwrap();

        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["PatientID", "Age", "Gender", "Notes"]);

        let age = frame.column("Age").unwrap();
        // Fractional source ages floor to whole years; blanks stay null.
        assert_eq!(any_to_i64(&age.get(0).unwrap()), Some(6));
        assert_eq!(age.get(1).unwrap(), AnyValue::Null);
        assert_eq!(frame.column("Notes").unwrap().get(1).unwrap(), AnyValue::Null);
    }

    #[test]
    fn unparsable_dates_become_null() {
        let source = table(
            &["PatientID", "AdmissionDate", "DischargeDate", "LengthOfStay"],
            &[
                &["1", "2024-01-10", "2024-01-12", "2"],
                &["2", "soon", "", "0"],
            ],
        );
        let frame = build_frame(&source, ADMISSION_SCHEMA).unwrap();
        let admit = frame.column("AdmissionDate").unwrap();

        assert_eq!(
            admit.get(0).unwrap(),
            AnyValue::String("2024-01-10")
        );
        assert_eq!(admit.get(1).unwrap(), AnyValue::Null);
    }
}
