//! Deterministic synthetic data source.
//!
//! The loader's last-resort adapter: always succeeds, and for a fixed seed
//! always produces the same tables. Ages are pediatric (0-17), stay lengths
//! cluster around three days, and lab values cluster inside their reference
//! ranges so a default run flags only the occasional tail value.

use chrono::{Duration, NaiveDate};
use polars::prelude::{DataFrame, NamedFrom, Series};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use hdq_model::{CanonicalTables, columns, days_between};

use crate::error::Result;

pub const HOSPITAL_SITES: &[&str] = &[
    "HSC",
    "CHEO",
    "LHSC",
    "SickKids",
    "McMaster",
    "Hamilton",
    "OttawaGen",
];

pub const DIAGNOSES: &[&str] = &[
    "Asthma",
    "Bronchiolitis",
    "Fracture",
    "Gastroenteritis",
    "Sepsis",
    "Influenza",
];

pub const LAB_TESTS: &[&str] = &["Glucose", "Sodium", "Hemoglobin"];

const GENDERS: &[&str] = &["M", "F"];

/// Generation parameters, all with documented defaults.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Number of patients (default 1000).
    pub patients: usize,
    /// Mean admissions per patient, Poisson with a floor of one (default 1.5).
    pub admissions_mean: f64,
    /// Mean lab tests per patient, Poisson (default 5.0).
    pub labs_mean: f64,
    /// Earliest event date (default 2022-01-01).
    pub start_date: NaiveDate,
    /// Latest event date (default 2024-12-31).
    pub end_date: NaiveDate,
    /// RNG seed; a fixed seed reproduces the tables exactly (default 42).
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            patients: 1000,
            admissions_mean: 1.5,
            labs_mean: 5.0,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
            seed: 42,
        }
    }
}

/// Generates the canonical table triple from `config`.
pub fn generate(config: &SyntheticConfig) -> Result<CanonicalTables> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let span = days_between(config.start_date, config.end_date).max(0);

    let patient_count = config.patients;
    let mut ages: Vec<i64> = Vec::with_capacity(patient_count);
    let mut genders: Vec<&str> = Vec::with_capacity(patient_count);
    let mut sites: Vec<&str> = Vec::with_capacity(patient_count);
    let mut diagnoses: Vec<&str> = Vec::with_capacity(patient_count);
    for _ in 0..patient_count {
        ages.push(rng.random_range(0..18));
        genders.push(pick(&mut rng, GENDERS));
        sites.push(pick(&mut rng, HOSPITAL_SITES));
        diagnoses.push(pick(&mut rng, DIAGNOSES));
    }
    let ids: Vec<i64> = (1..=patient_count as i64).collect();

    let mut adm_patient: Vec<i64> = Vec::new();
    let mut adm_admit: Vec<NaiveDate> = Vec::new();
    let mut adm_discharge: Vec<NaiveDate> = Vec::new();
    let mut adm_stay: Vec<i64> = Vec::new();
    let mut adm_site: Vec<&str> = Vec::new();
    let mut adm_diagnosis: Vec<&str> = Vec::new();
    for id in &ids {
        let count = sample_poisson(&mut rng, config.admissions_mean).max(1);
        let mut admits: Vec<NaiveDate> = (0..count)
            .map(|_| random_date(&mut rng, config.start_date, span))
            .collect();
        admits.sort();
        for admit in admits {
            let stay = sample_normal(&mut rng, 3.0, 2.0).max(0.0) as i64;
            adm_patient.push(*id);
            adm_admit.push(admit);
            adm_discharge.push(admit + Duration::days(stay));
            adm_stay.push(stay);
            adm_site.push(pick(&mut rng, HOSPITAL_SITES));
            adm_diagnosis.push(pick(&mut rng, DIAGNOSES));
        }
    }

    let mut lab_patient: Vec<i64> = Vec::new();
    let mut lab_name: Vec<&str> = Vec::new();
    let mut lab_value: Vec<f64> = Vec::new();
    let mut lab_date: Vec<NaiveDate> = Vec::new();
    for id in &ids {
        let count = sample_poisson(&mut rng, config.labs_mean);
        for _ in 0..count {
            let test = pick(&mut rng, LAB_TESTS);
            let value = match test {
                "Glucose" => sample_normal(&mut rng, 5.5, 1.2),
                "Sodium" => sample_normal(&mut rng, 140.0, 3.0),
                _ => sample_normal(&mut rng, 130.0, 15.0),
            };
            lab_patient.push(*id);
            lab_name.push(test);
            lab_value.push((value * 10.0).round() / 10.0);
            lab_date.push(random_date(&mut rng, config.start_date, span));
        }
    }

    debug!(
        patients = patient_count,
        admissions = adm_patient.len(),
        labs = lab_patient.len(),
        seed = config.seed,
        "generated synthetic tables"
    );

    let patients = DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), ids).into(),
        Series::new(columns::AGE.into(), ages).into(),
        Series::new(columns::GENDER.into(), genders).into(),
        Series::new(columns::HOSPITAL_SITE.into(), sites).into(),
        Series::new(columns::DIAGNOSIS_NAME.into(), diagnoses).into(),
    ])?;

    let admissions = DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), adm_patient).into(),
        Series::new(
            columns::ADMISSION_DATE.into(),
            iso_strings(&adm_admit),
        )
        .into(),
        Series::new(
            columns::DISCHARGE_DATE.into(),
            iso_strings(&adm_discharge),
        )
        .into(),
        Series::new(columns::LENGTH_OF_STAY.into(), adm_stay).into(),
        Series::new(columns::HOSPITAL_SITE.into(), adm_site).into(),
        Series::new(columns::DIAGNOSIS_NAME.into(), adm_diagnosis).into(),
    ])?;

    let labs = DataFrame::new(vec![
        Series::new(columns::PATIENT_ID.into(), lab_patient).into(),
        Series::new(columns::LAB_TEST_NAME.into(), lab_name).into(),
        Series::new(columns::TEST_RESULT_VALUE.into(), lab_value).into(),
        Series::new(columns::COLLECTED_DATE.into(), iso_strings(&lab_date)).into(),
    ])?;

    Ok(CanonicalTables::new(patients, admissions, labs))
}

fn iso_strings(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|date| hdq_model::to_iso_date(*date)).collect()
}

fn pick<'a>(rng: &mut StdRng, options: &'a [&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

fn random_date(rng: &mut StdRng, start: NaiveDate, span_days: i64) -> NaiveDate {
    start + Duration::days(rng.random_range(0..=span_days))
}

/// Poisson sample by Knuth's product-of-uniforms method. Fine for the small
/// means used here.
fn sample_poisson(rng: &mut StdRng, mean: f64) -> u64 {
    if mean <= 0.0 {
        return 0;
    }
    let limit = (-mean).exp();
    let mut draws = 0u64;
    let mut product = 1.0f64;
    loop {
        product *= rng.random::<f64>();
        if product <= limit {
            return draws;
        }
        draws += 1;
    }
}

/// Normal sample via the Box-Muller transform.
fn sample_normal(rng: &mut StdRng, mean: f64, sd: f64) -> f64 {
    let u1 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + sd * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdq_model::{any_to_i64, parse_date};

    fn small_config() -> SyntheticConfig {
        SyntheticConfig {
            patients: 25,
            ..SyntheticConfig::default()
        }
    }

    #[test]
    fn fixed_seed_reproduces_tables() {
        let config = small_config();
        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();

        assert!(first.patients.equals_missing(&second.patients));
        assert!(first.admissions.equals_missing(&second.admissions));
        assert!(first.labs.equals_missing(&second.labs));
    }

    #[test]
    fn different_seeds_diverge() {
        let base = generate(&small_config()).unwrap();
        let other = generate(&SyntheticConfig {
            seed: 7,
            ..small_config()
        })
        .unwrap();
        assert!(!base.patients.equals_missing(&other.patients));
    }

    #[test]
    fn every_patient_has_at_least_one_admission() {
        let tables = generate(&small_config()).unwrap();
        let (patients, admissions, _) = tables.row_counts();
        assert_eq!(patients, 25);
        assert!(admissions >= patients);
    }

    #[test]
    fn stay_length_matches_generated_dates() {
        let tables = generate(&small_config()).unwrap();
        let admit = tables.admissions.column("AdmissionDate").unwrap();
        let discharge = tables.admissions.column("DischargeDate").unwrap();
        let stay = tables.admissions.column("LengthOfStay").unwrap();

        for idx in 0..tables.admissions.height() {
            let start = parse_date(&hdq_model::any_to_string(admit.get(idx).unwrap())).unwrap();
            let stop = parse_date(&hdq_model::any_to_string(discharge.get(idx).unwrap())).unwrap();
            let stored = any_to_i64(&stay.get(idx).unwrap()).unwrap();
            assert_eq!(stored, days_between(start, stop));
            assert!(stored >= 0);
        }
    }

    #[test]
    fn poisson_of_zero_mean_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_poisson(&mut rng, 0.0), 0);
    }
}
