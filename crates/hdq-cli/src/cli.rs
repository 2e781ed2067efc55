//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hdq",
    version,
    about = "Healthcare data quality - normalize tabular records and validate them",
    long_about = "Normalize heterogeneous healthcare CSV sets (canonical or EMR export) \n\
                  into the canonical patients/admissions/labs schema, then profile the \n\
                  tables and run rule-based data-quality validations over them.\n\
                  Directories with no recognized source set fall back to synthetic data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a data directory and print structural profiles of the three tables.
    Profile(ProfileArgs),

    /// Load a data directory and run the full validation suite.
    Validate(ValidateArgs),

    /// Generate a synthetic canonical CSV set for fixtures and demos.
    Generate(GenerateArgs),
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Directory holding a canonical or EMR CSV set (synthetic fallback when
    /// omitted or unrecognized).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Emit a machine-readable JSON payload instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Directory holding a canonical or EMR CSV set (synthetic fallback when
    /// omitted or unrecognized).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Emit a machine-readable JSON payload instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Exit non-zero when any flag is set or any consistency count is
    /// non-zero.
    #[arg(long = "fail-on-findings")]
    pub fail_on_findings: bool,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Output directory for the canonical CSV set.
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Number of patients.
    #[arg(long, default_value_t = 1000)]
    pub patients: usize,

    /// Mean admissions per patient (floored at one per patient).
    #[arg(long = "admissions-mean", default_value_t = 1.5)]
    pub admissions_mean: f64,

    /// Mean lab tests per patient.
    #[arg(long = "labs-mean", default_value_t = 5.0)]
    pub labs_mean: f64,

    /// Earliest event date (ISO).
    #[arg(long = "start-date")]
    pub start_date: Option<NaiveDate>,

    /// Latest event date (ISO).
    #[arg(long = "end-date")]
    pub end_date: Option<NaiveDate>,

    /// RNG seed; a fixed seed reproduces the set exactly.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
