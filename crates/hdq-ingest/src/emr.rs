//! Adapter for third-party EMR exports.
//!
//! The export carries three files: a patient demographics table (`Id`,
//! `BIRTHDATE`, `GENDER`), an encounter table (`PATIENT`, `START`, `STOP`,
//! `ORGANIZATION`, `REASONDESCRIPTION`, `DESCRIPTION`), and an observation
//! table (`PATIENT`, `DATE`, `DESCRIPTION`, `VALUE`). Column matching is
//! case-insensitive. Native string identifiers are remapped to dense positive
//! integers in first-appearance order, so a re-run over the same input always
//! yields the same mapping.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use hdq_model::{CanonicalTables, columns, days_between, parse_date, parse_f64, to_iso_date};

use crate::error::Result;
use crate::table::{CsvTable, non_empty, read_csv_table};

pub const PATIENTS_FILE: &str = "patients.csv";
pub const ENCOUNTERS_FILE: &str = "encounters.csv";
pub const OBSERVATIONS_FILE: &str = "observations.csv";

/// The EMR three-file set, all required for this adapter to run.
pub const EMR_FILES: &[&str] = &[PATIENTS_FILE, ENCOUNTERS_FILE, OBSERVATIONS_FILE];

/// Longest label carried into the canonical tables.
const TEXT_LIMIT: usize = 64;
/// Sentinel for absent site and diagnosis labels.
const UNKNOWN: &str = "Unknown";
/// Ages outside this band are clamped before flooring.
const MAX_AGE_YEARS: f64 = 120.0;

/// Reads the EMR three-file set from `dir` and adapts it, using the current
/// date as the age reference for patients without any encounter.
pub fn load_emr_dir(dir: &Path) -> Result<CanonicalTables> {
    let patients = read_csv_table(&dir.join(PATIENTS_FILE))?;
    let encounters = read_csv_table(&dir.join(ENCOUNTERS_FILE))?;
    let observations = read_csv_table(&dir.join(OBSERVATIONS_FILE))?;
    adapt_emr(&patients, &encounters, &observations, Utc::now().date_naive())
}

/// Stable bijection from native string identifiers to dense positive
/// integers, assigned in first-appearance order.
#[derive(Debug, Default)]
struct IdentifierMap {
    index: HashMap<String, i64>,
}

impl IdentifierMap {
    fn get_or_insert(&mut self, raw: &str) -> Option<i64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let next = self.index.len() as i64 + 1;
        Some(*self.index.entry(trimmed.to_string()).or_insert(next))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

struct AdmissionRow {
    patient: Option<i64>,
    admit: Option<NaiveDate>,
    discharge: Option<NaiveDate>,
    stay_days: i64,
    site: String,
    diagnosis: String,
}

struct LabRow {
    patient: Option<i64>,
    name: Option<String>,
    value: f64,
    collected: Option<NaiveDate>,
}

/// Maps the three EMR tables into canonical form. `today` is the age
/// reference for patients with no encounters; injecting it keeps the
/// adapter deterministic under test.
pub fn adapt_emr(
    patients: &CsvTable,
    encounters: &CsvTable,
    observations: &CsvTable,
    today: NaiveDate,
) -> Result<CanonicalTables> {
    let mut ids = IdentifierMap::default();

    // Identifier order is seeded from the patient table when it carries an
    // id column; otherwise the encounters' references define it.
    let patient_id_col = patients.column_index("Id");
    if let Some(idx) = patient_id_col {
        for row in &patients.rows {
            ids.get_or_insert(&row[idx]);
        }
    }

    let enc_patient = encounters.column_index("PATIENT");
    let enc_start = encounters.column_index("START");
    let enc_stop = encounters.column_index("STOP");
    let enc_org = encounters.column_index("ORGANIZATION");
    let enc_reason = encounters.column_index("REASONDESCRIPTION");
    let enc_desc = encounters.column_index("DESCRIPTION");

    let mut admissions: Vec<AdmissionRow> = Vec::with_capacity(encounters.height());
    let mut first_start: HashMap<i64, NaiveDate> = HashMap::new();
    for row in &encounters.rows {
        let patient = enc_patient.and_then(|idx| ids.get_or_insert(&row[idx]));
        let admit = enc_start.and_then(|idx| parse_date(&row[idx]));
        let discharge = enc_stop.and_then(|idx| parse_date(&row[idx]));
        let stay_days = match (admit, discharge) {
            (Some(start), Some(stop)) => days_between(start, stop).max(0),
            _ => 0,
        };
        let diagnosis =
            first_label(row, &[enc_reason, enc_desc]).unwrap_or_else(|| UNKNOWN.to_string());
        let site = first_label(row, &[enc_org]).unwrap_or_else(|| UNKNOWN.to_string());

        if let (Some(id), Some(start)) = (patient, admit) {
            first_start
                .entry(id)
                .and_modify(|earliest| {
                    if start < *earliest {
                        *earliest = start;
                    }
                })
                .or_insert(start);
        }

        admissions.push(AdmissionRow {
            patient,
            admit,
            discharge,
            stay_days,
            site,
            diagnosis,
        });
    }

    // Per-patient site/diagnosis vote lists, in encounter order.
    let mut site_votes: HashMap<i64, Vec<String>> = HashMap::new();
    let mut diagnosis_votes: HashMap<i64, Vec<String>> = HashMap::new();
    for admission in &admissions {
        if let Some(id) = admission.patient {
            site_votes.entry(id).or_default().push(admission.site.clone());
            diagnosis_votes
                .entry(id)
                .or_default()
                .push(admission.diagnosis.clone());
        }
    }

    let patient_rows = build_patient_rows(patients, patient_id_col, &mut ids, &first_start, today);

    let mut labs: Vec<LabRow> = Vec::new();
    let obs_patient = observations.column_index("PATIENT");
    let obs_date = observations.column_index("DATE");
    let obs_desc = observations.column_index("DESCRIPTION");
    let obs_value = observations.column_index("VALUE");
    for row in &observations.rows {
        // A lab without a usable numeric value carries no information.
        let Some(value) = obs_value.and_then(|idx| parse_f64(&row[idx])) else {
            continue;
        };
        labs.push(LabRow {
            patient: obs_patient.and_then(|idx| ids.get_or_insert(&row[idx])),
            name: obs_desc
                .and_then(|idx| non_empty(&row[idx]))
                .map(|label| truncate_label(&label)),
            value,
            collected: obs_date.and_then(|idx| parse_date(&row[idx])),
        });
    }

    debug!(
        identifiers = ids.len(),
        admissions = admissions.len(),
        labs = labs.len(),
        "adapted emr export"
    );

    let patients_frame = patients_frame(&patient_rows, &site_votes, &diagnosis_votes)?;
    let admissions_frame = admissions_frame(&admissions)?;
    let labs_frame = labs_frame(&labs)?;
    Ok(CanonicalTables::new(
        patients_frame,
        admissions_frame,
        labs_frame,
    ))
}

struct PatientRow {
    id: i64,
    age: Option<i64>,
    gender: Option<String>,
}

fn build_patient_rows(
    patients: &CsvTable,
    patient_id_col: Option<usize>,
    ids: &mut IdentifierMap,
    first_start: &HashMap<i64, NaiveDate>,
    today: NaiveDate,
) -> Vec<PatientRow> {
    if let Some(id_idx) = patient_id_col {
        let birth_idx = patients.column_index("BIRTHDATE");
        let gender_idx = patients.column_index("GENDER");
        let mut rows = Vec::with_capacity(patients.height());
        for row in &patients.rows {
            let Some(id) = ids.get_or_insert(&row[id_idx]) else {
                continue;
            };
            let reference = first_start.get(&id).copied().unwrap_or(today);
            let age = birth_idx
                .and_then(|idx| parse_date(&row[idx]))
                .map(|birth| age_in_years(birth, reference));
            rows.push(PatientRow {
                id,
                age,
                gender: gender_idx.and_then(|idx| non_empty(&row[idx])),
            });
        }
        return rows;
    }

    // No identifier column: patients are known only through encounter
    // references. Identifiers are dense, so the mapped range reproduces
    // first-appearance order.
    (1..=ids.len() as i64)
        .map(|id| PatientRow {
            id,
            age: None,
            gender: None,
        })
        .collect()
}

/// Whole years between birth and reference, clamped to a plausible band.
fn age_in_years(birth: NaiveDate, reference: NaiveDate) -> i64 {
    let days = days_between(birth, reference) as f64;
    (days / 365.25).clamp(0.0, MAX_AGE_YEARS).floor() as i64
}

/// First non-empty cell among candidate columns, truncated for storage.
fn first_label(row: &[String], candidates: &[Option<usize>]) -> Option<String> {
    candidates
        .iter()
        .copied()
        .flatten()
        .find_map(|idx| non_empty(&row[idx]))
        .map(|label| truncate_label(&label))
}

fn truncate_label(label: &str) -> String {
    label.chars().take(TEXT_LIMIT).collect()
}

/// Most frequent value; ties resolve to the earliest appearance.
fn mode_label(values: &[String]) -> Option<String> {
    let mut tally: HashMap<&String, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        let entry = tally.entry(value).or_insert((0, position));
        entry.0 += 1;
    }
    tally
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(value, _)| value.clone())
}

fn patients_frame(
    rows: &[PatientRow],
    site_votes: &HashMap<i64, Vec<String>>,
    diagnosis_votes: &HashMap<i64, Vec<String>>,
) -> Result<DataFrame> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let ages: Vec<Option<i64>> = rows.iter().map(|row| row.age).collect();
    let genders: Vec<Option<String>> = rows.iter().map(|row| row.gender.clone()).collect();
    let sites: Vec<String> = rows
        .iter()
        .map(|row| vote_result(site_votes.get(&row.id)))
        .collect();
    let diagnoses: Vec<String> = rows
        .iter()
        .map(|row| vote_result(diagnosis_votes.get(&row.id)))
        .collect();

    Ok(DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), ids).into(),
        Series::new(columns::AGE.into(), ages).into(),
        Series::new(columns::GENDER.into(), genders).into(),
        Series::new(columns::HOSPITAL_SITE.into(), sites).into(),
        Series::new(columns::DIAGNOSIS_NAME.into(), diagnoses).into(),
    ])?)
}

fn vote_result(votes: Option<&Vec<String>>) -> String {
    votes
        .and_then(|values| mode_label(values))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn admissions_frame(rows: &[AdmissionRow]) -> Result<DataFrame> {
    let patients: Vec<Option<i64>> = rows.iter().map(|row| row.patient).collect();
    let admits: Vec<Option<String>> = rows.iter().map(|row| row.admit.map(to_iso_date)).collect();
    let discharges: Vec<Option<String>> = rows
        .iter()
        .map(|row| row.discharge.map(to_iso_date))
        .collect();
    let stays: Vec<i64> = rows.iter().map(|row| row.stay_days).collect();
    let sites: Vec<String> = rows.iter().map(|row| row.site.clone()).collect();
    let diagnoses: Vec<String> = rows.iter().map(|row| row.diagnosis.clone()).collect();

    Ok(DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), patients).into(),
        Series::new(columns::ADMISSION_DATE.into(), admits).into(),
        Series::new(columns::DISCHARGE_DATE.into(), discharges).into(),
        Series::new(columns::LENGTH_OF_STAY.into(), stays).into(),
        Series::new(columns::HOSPITAL_SITE.into(), sites).into(),
        Series::new(columns::DIAGNOSIS_NAME.into(), diagnoses).into(),
    ])?)
}

fn labs_frame(rows: &[LabRow]) -> Result<DataFrame> {
    let patients: Vec<Option<i64>> = rows.iter().map(|row| row.patient).collect();
    let names: Vec<Option<String>> = rows.iter().map(|row| row.name.clone()).collect();
    let values: Vec<f64> = rows.iter().map(|row| row.value).collect();
    let dates: Vec<Option<String>> = rows
        .iter()
        .map(|row| row.collected.map(to_iso_date))
        .collect();

    Ok(DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), patients).into(),
        Series::new(columns::LAB_TEST_NAME.into(), names).into(),
        Series::new(columns::TEST_RESULT_VALUE.into(), values).into(),
        Series::new(columns::COLLECTED_DATE.into(), dates).into(),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn identifier_map_is_a_dense_bijection() {
        let mut ids = IdentifierMap::default();
        assert_eq!(ids.get_or_insert("abc"), Some(1));
        assert_eq!(ids.get_or_insert("def"), Some(2));
        assert_eq!(ids.get_or_insert("abc"), Some(1));
        assert_eq!(ids.get_or_insert("  "), None);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn age_floors_and_clamps() {
        assert_eq!(age_in_years(date(2010, 6, 1), date(2020, 5, 31)), 9);
        assert_eq!(age_in_years(date(2010, 6, 1), date(2020, 6, 2)), 10);
        // Birth after reference clamps to zero rather than going negative.
        assert_eq!(age_in_years(date(2030, 1, 1), date(2020, 1, 1)), 0);
        assert_eq!(age_in_years(date(1800, 1, 1), date(2020, 1, 1)), 120);
    }

    #[test]
    fn mode_prefers_count_then_first_appearance() {
        let values = owned(&["CHEO", "HSC", "HSC", "CHEO"]);
        assert_eq!(mode_label(&values), Some("CHEO".to_string()));
        let values = owned(&["LHSC", "HSC", "HSC"]);
        assert_eq!(mode_label(&values), Some("HSC".to_string()));
        assert_eq!(mode_label(&[]), None);
    }

    #[test]
    fn labels_truncate_but_respect_char_boundaries() {
        let long = "x".repeat(200);
        assert_eq!(truncate_label(&long).len(), TEXT_LIMIT);
        assert_eq!(truncate_label("short"), "short");
    }
}
