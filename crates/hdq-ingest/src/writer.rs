//! Writes canonical tables back out as the canonical CSV set.
//!
//! Used by the fixture generator: a written directory is a valid input for
//! the loader's highest-priority path.

use std::path::Path;

use polars::prelude::AnyValue;
use tracing::info;

use hdq_model::{CanonicalTables, any_to_string};

use crate::canonical::{ADMISSIONS_FILE, LABS_FILE, PATIENTS_FILE};
use crate::error::{IngestError, Result};

/// Writes `patients.csv`, `admissions.csv`, and `labs.csv` under `dir`,
/// creating the directory if needed.
pub fn write_canonical_dir(tables: &CanonicalTables, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    write_frame(&tables.patients, &dir.join(PATIENTS_FILE))?;
    write_frame(&tables.admissions, &dir.join(ADMISSIONS_FILE))?;
    write_frame(&tables.labs, &dir.join(LABS_FILE))?;
    info!(path = %dir.display(), "wrote canonical csv set");
    Ok(())
}

fn write_frame(frame: &polars::prelude::DataFrame, path: &Path) -> Result<()> {
    let write_error = |source: csv::Error| IngestError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    let headers: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&headers).map_err(write_error)?;

    let columns = frame.get_columns();
    for idx in 0..frame.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&record).map_err(write_error)?;
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
