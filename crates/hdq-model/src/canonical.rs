//! The canonical three-table schema all source adapters produce.
//!
//! Dates are carried as ISO `YYYY-MM-DD` strings (null when the source value
//! was absent or unparsable); identifiers and day counts are 64-bit integers;
//! lab values are floats. Every adapter must emit these column names exactly.

use polars::prelude::DataFrame;

/// Canonical column names, shared by adapters, validators, and the profiler.
pub mod columns {
    /// Unique positive patient identifier, the cross-table join key.
    pub const PATIENT_ID: &str = "PatientID";
    /// Integer age in years (nullable when the source carries no birth date).
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const HOSPITAL_SITE: &str = "HospitalSite";
    pub const DIAGNOSIS_NAME: &str = "DiagnosisName";
    /// Optional structured diagnosis code carried through from the source.
    pub const DIAGNOSIS_CODE: &str = "DiagnosisCode";

    pub const ADMISSION_DATE: &str = "AdmissionDate";
    pub const DISCHARGE_DATE: &str = "DischargeDate";
    /// Whole-day stay length, stored at the source or derived by an adapter.
    pub const LENGTH_OF_STAY: &str = "LengthOfStay";

    pub const LAB_TEST_NAME: &str = "LabTestName";
    pub const TEST_RESULT_VALUE: &str = "TestResultValue";
    pub const COLLECTED_DATE: &str = "CollectedDate";
}

/// The canonical table triple produced by exactly one adapter per load.
///
/// Tables are immutable once built: validators and the profiler take
/// read-only references and return fresh flag tables or profiles.
#[derive(Debug, Clone)]
pub struct CanonicalTables {
    pub patients: DataFrame,
    pub admissions: DataFrame,
    pub labs: DataFrame,
}

impl CanonicalTables {
    pub fn new(patients: DataFrame, admissions: DataFrame, labs: DataFrame) -> Self {
        Self {
            patients,
            admissions,
            labs,
        }
    }

    /// Row counts as (patients, admissions, labs).
    pub fn row_counts(&self) -> (usize, usize, usize) {
        (
            self.patients.height(),
            self.admissions.height(),
            self.labs.height(),
        )
    }
}
