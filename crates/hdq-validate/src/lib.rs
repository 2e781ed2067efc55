//! Data-quality validation over the canonical tables.
//!
//! Validators are independent rule checks producing row-aligned boolean flag
//! tables; the engine decides applicability from each validator's declared
//! columns before invoking it. The cross-table checker covers referential
//! integrity of the patient identifier.

pub mod checks;
pub mod cross_table;
pub mod engine;

pub use checks::{
    AgeCheck, DateCheck, DiagnosisCodeCheck, GenderCheck, LabRangeCheck, StayConsistencyCheck,
    reference_range,
};
pub use cross_table::{ConsistencyCounts, check_consistency, check_consistency_with};
pub use engine::{Outcome, Validator, run};

use polars::prelude::DataFrame;
use tracing::debug;

use hdq_model::CanonicalTables;

/// One validator's result against one table.
#[derive(Debug, Clone)]
pub struct ValidatorRun {
    pub validator: &'static str,
    pub outcome: Outcome,
}

/// Every validator run against one table.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: &'static str,
    pub rows: usize,
    pub runs: Vec<ValidatorRun>,
}

impl TableReport {
    /// Total set flags across all applicable validators.
    pub fn flagged_total(&self) -> usize {
        self.runs.iter().map(|run| run.outcome.flagged_total()).sum()
    }
}

/// The full diagnostic pass: per-table flag results plus the cross-table
/// consistency counts.
#[derive(Debug, Clone)]
pub struct ValidationSummary {
    pub tables: Vec<TableReport>,
    pub consistency: ConsistencyCounts,
}

impl ValidationSummary {
    pub fn flagged_total(&self) -> usize {
        self.tables.iter().map(TableReport::flagged_total).sum()
    }

    /// True when any flag is set or any consistency count is non-zero.
    pub fn any_findings(&self) -> bool {
        self.flagged_total() > 0 || self.consistency.total() > 0
    }
}

/// Runs the standard validator suite over the canonical triple.
pub fn validate_all(tables: &CanonicalTables) -> ValidationSummary {
    let patient_checks: Vec<Box<dyn Validator>> = vec![
        Box::new(AgeCheck::default()),
        Box::new(GenderCheck::default()),
        Box::new(DiagnosisCodeCheck::default()),
    ];
    let admission_checks: Vec<Box<dyn Validator>> = vec![
        Box::new(DateCheck::default()),
        Box::new(StayConsistencyCheck::default()),
    ];
    let lab_checks: Vec<Box<dyn Validator>> = vec![Box::new(LabRangeCheck::default())];

    let reports = vec![
        run_suite("patients", &tables.patients, &patient_checks),
        run_suite("admissions", &tables.admissions, &admission_checks),
        run_suite("labs", &tables.labs, &lab_checks),
    ];

    let consistency = check_consistency(tables);
    let summary = ValidationSummary {
        tables: reports,
        consistency,
    };
    debug!(
        flagged = summary.flagged_total(),
        consistency = consistency.total(),
        "validation pass complete"
    );
    summary
}

fn run_suite(
    table: &'static str,
    frame: &DataFrame,
    validators: &[Box<dyn Validator>],
) -> TableReport {
    let runs = validators
        .iter()
        .map(|validator| ValidatorRun {
            validator: validator.name(),
            outcome: run(validator.as_ref(), frame),
        })
        .collect();
    TableReport {
        table,
        rows: frame.height(),
        runs,
    }
}
