//! EMR-export adaptation: identifier remapping, derived fields, sentinels.

use chrono::NaiveDate;
use polars::prelude::AnyValue;

use hdq_ingest::{CsvTable, adapt_emr};
use hdq_model::{any_to_i64, any_to_string, columns};

fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
    CsvTable {
        headers: headers.iter().map(|h| (*h).to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn patients_fixture() -> CsvTable {
    table(
        &["Id", "BIRTHDATE", "GENDER"],
        &[
            &["u-aaa", "2015-03-01", "F"],
            &["u-bbb", "", "M"],
            &["u-ccc", "2010-01-01", "F"],
        ],
    )
}

fn encounters_fixture() -> CsvTable {
    table(
        &["PATIENT", "START", "STOP", "ORGANIZATION", "REASONDESCRIPTION", "DESCRIPTION"],
        &[
            // Normal two-day stay.
            &["u-aaa", "2024-01-10", "2024-01-12", "Site A", "Asthma", "Inpatient"],
            // Discharge precedes admission at the source: stay clamps to 0.
            &["u-aaa", "2024-03-10", "2024-03-05", "Site B", "", "Checkup"],
            // Open admission: stay defaults to 0, discharge stays null.
            &["u-bbb", "2024-02-01", "", "", "Fracture", ""],
        ],
    )
}

fn observations_fixture() -> CsvTable {
    table(
        &["PATIENT", "DATE", "DESCRIPTION", "VALUE"],
        &[
            &["u-aaa", "2024-01-11", "Glucose", "5.4"],
            &["u-bbb", "2024-02-02", "Sodium", "not-a-number"],
            &["u-zzz", "2024-04-01", "Hemoglobin", "128"],
        ],
    )
}

#[test]
fn identifiers_remap_densely_in_patient_table_order() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    let ids = tables.patients.column(columns::PATIENT_ID).unwrap();
    let mapped: Vec<i64> = (0..tables.patients.height())
        .map(|idx| any_to_i64(&ids.get(idx).unwrap()).unwrap())
        .collect();
    assert_eq!(mapped, vec![1, 2, 3]);
}

#[test]
fn remapping_is_deterministic_across_runs() {
    let run = || {
        adapt_emr(
            &patients_fixture(),
            &encounters_fixture(),
            &observations_fixture(),
            today(),
        )
        .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.patients.equals_missing(&second.patients));
    assert!(first.admissions.equals_missing(&second.admissions));
    assert!(first.labs.equals_missing(&second.labs));
}

#[test]
fn stay_length_clamps_and_defaults() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    let stay = tables.admissions.column(columns::LENGTH_OF_STAY).unwrap();
    assert_eq!(any_to_i64(&stay.get(0).unwrap()), Some(2));
    // Reversed dates clamp to zero, never negative.
    assert_eq!(any_to_i64(&stay.get(1).unwrap()), Some(0));
    // Missing discharge defaults to zero.
    assert_eq!(any_to_i64(&stay.get(2).unwrap()), Some(0));

    let discharge = tables.admissions.column(columns::DISCHARGE_DATE).unwrap();
    assert_eq!(discharge.get(2).unwrap(), AnyValue::Null);
}

#[test]
fn age_derives_from_earliest_encounter_and_missing_birthdate_stays_null() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    let age = tables.patients.column(columns::AGE).unwrap();
    // u-aaa: born 2015-03-01, earliest encounter 2024-01-10 -> 8 whole years.
    assert_eq!(any_to_i64(&age.get(0).unwrap()), Some(8));
    // u-bbb has no birth date: null, not zero.
    assert_eq!(age.get(1).unwrap(), AnyValue::Null);
    // u-ccc has no encounters: reference is the processing date.
    assert_eq!(any_to_i64(&age.get(2).unwrap()), Some(14));
}

#[test]
fn site_and_diagnosis_aggregate_by_mode_with_unknown_sentinel() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    let site = tables.patients.column(columns::HOSPITAL_SITE).unwrap();
    // u-aaa has Site A and Site B once each: first appearance wins the tie.
    assert_eq!(any_to_string(site.get(0).unwrap()), "Site A");
    // u-bbb's only encounter had no organization: sentinel, never null.
    assert_eq!(any_to_string(site.get(1).unwrap()), "Unknown");
    // u-ccc has no admissions at all.
    assert_eq!(any_to_string(site.get(2).unwrap()), "Unknown");

    let diagnosis = tables.patients.column(columns::DIAGNOSIS_NAME).unwrap();
    assert_eq!(any_to_string(diagnosis.get(0).unwrap()), "Asthma");
}

#[test]
fn encounter_diagnosis_prefers_reason_then_description() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    let diagnosis = tables.admissions.column(columns::DIAGNOSIS_NAME).unwrap();
    assert_eq!(any_to_string(diagnosis.get(0).unwrap()), "Asthma");
    // No reason recorded: encounter description stands in.
    assert_eq!(any_to_string(diagnosis.get(1).unwrap()), "Checkup");
}

#[test]
fn non_numeric_observations_are_dropped() {
    let tables = adapt_emr(
        &patients_fixture(),
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    // The "not-a-number" sodium row is excluded, not flagged.
    assert_eq!(tables.labs.height(), 2);
    let names = tables.labs.column(columns::LAB_TEST_NAME).unwrap();
    assert_eq!(any_to_string(names.get(0).unwrap()), "Glucose");
    assert_eq!(any_to_string(names.get(1).unwrap()), "Hemoglobin");

    // Its patient was unseen elsewhere, so the lab references an identifier
    // outside the patient table; cross-table checks surface that later.
    let ids = tables.labs.column(columns::PATIENT_ID).unwrap();
    assert_eq!(any_to_i64(&ids.get(1).unwrap()), Some(4));
}

#[test]
fn absent_patient_id_column_falls_back_to_encounter_references() {
    let patients = table(&["BIRTHDATE", "GENDER"], &[&["2015-03-01", "F"]]);
    let tables = adapt_emr(
        &patients,
        &encounters_fixture(),
        &observations_fixture(),
        today(),
    )
    .unwrap();

    // u-aaa and u-bbb are referenced by encounters, in that order.
    assert_eq!(tables.patients.height(), 2);
    let age = tables.patients.column(columns::AGE).unwrap();
    assert_eq!(age.get(0).unwrap(), AnyValue::Null);
}
