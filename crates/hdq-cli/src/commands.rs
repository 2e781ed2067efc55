//! Command implementations: thin orchestration over the library crates.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use hdq_ingest::{SyntheticConfig, generate, load_tables, write_canonical_dir};
use hdq_model::CanonicalTables;
use hdq_profile::{TableProfile, profile_table};
use hdq_validate::{ConsistencyCounts, Outcome, ValidationSummary, validate_all};

use crate::cli::{GenerateArgs, ProfileArgs, ValidateArgs};
use crate::summary;

const PROFILE_SCHEMA: &str = "hdq.profile-report";
const VALIDATION_SCHEMA: &str = "hdq.validation-report";
const SCHEMA_VERSION: u32 = 1;

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let tables = load_tables(args.data_dir.as_deref(), None)?;
    let profiles: Vec<(&'static str, TableProfile)> = vec![
        ("patients", profile_table(&tables.patients)),
        ("admissions", profile_table(&tables.admissions)),
        ("labs", profile_table(&tables.labs)),
    ];

    if args.json {
        let payload = ProfilePayload {
            schema: PROFILE_SCHEMA,
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            tables: profiles
                .iter()
                .map(|(name, profile)| (*name, profile))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        summary::print_profiles(&profiles);
    }
    Ok(())
}

/// Runs the validation suite; returns whether anything was flagged.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let tables = load_tables(args.data_dir.as_deref(), None)?;
    let report = validate_all(&tables);

    if args.json {
        let payload = validation_payload(&report);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        summary::print_validation(&report);
    }
    Ok(report.any_findings())
}

pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let defaults = SyntheticConfig::default();
    let config = SyntheticConfig {
        patients: args.patients,
        admissions_mean: args.admissions_mean,
        labs_mean: args.labs_mean,
        start_date: args.start_date.unwrap_or(defaults.start_date),
        end_date: args.end_date.unwrap_or(defaults.end_date),
        seed: args.seed,
    };
    let tables: CanonicalTables = generate(&config)?;
    write_canonical_dir(&tables, &args.out_dir)
        .with_context(|| format!("write fixture set: {}", args.out_dir.display()))?;

    let (patients, admissions, labs) = tables.row_counts();
    info!(patients, admissions, labs, "fixture set written");
    println!(
        "wrote {} patients, {} admissions, {} labs to {}",
        patients,
        admissions,
        labs,
        args.out_dir.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct ProfilePayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    tables: BTreeMap<&'static str, &'a TableProfile>,
}

#[derive(Serialize)]
struct ValidationPayload {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    tables: Vec<TableJson>,
    consistency: ConsistencyCounts,
}

#[derive(Serialize)]
struct TableJson {
    table: &'static str,
    rows: usize,
    validators: Vec<ValidatorJson>,
}

#[derive(Serialize)]
struct ValidatorJson {
    validator: &'static str,
    applicable: bool,
    /// Declared columns that were absent (empty when applicable).
    missing_columns: Vec<String>,
    /// Set-flag counts per flag column (empty when not applicable).
    flag_counts: BTreeMap<String, usize>,
}

fn validation_payload(report: &ValidationSummary) -> ValidationPayload {
    ValidationPayload {
        schema: VALIDATION_SCHEMA,
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        tables: report
            .tables
            .iter()
            .map(|table| TableJson {
                table: table.table,
                rows: table.rows,
                validators: table
                    .runs
                    .iter()
                    .map(|run| match &run.outcome {
                        Outcome::Evaluated(flags) => ValidatorJson {
                            validator: run.validator,
                            applicable: true,
                            missing_columns: Vec::new(),
                            flag_counts: flags.counts(),
                        },
                        Outcome::NotApplicable { missing } => ValidatorJson {
                            validator: run.validator,
                            applicable: false,
                            missing_columns: missing.clone(),
                            flag_counts: BTreeMap::new(),
                        },
                    })
                    .collect(),
            })
            .collect(),
        consistency: report.consistency,
    }
}
