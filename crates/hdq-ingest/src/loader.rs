//! Adapter selection and dispatch.
//!
//! A priority list of (file-set predicate, adapter) pairs, evaluated once per
//! call; the first satisfied predicate wins and exactly one adapter runs.

use std::path::Path;

use tracing::{info, warn};

use hdq_model::CanonicalTables;

use crate::canonical::{self, CANONICAL_FILES};
use crate::emr::{self, EMR_FILES};
use crate::error::Result;
use crate::synthetic::{self, SyntheticConfig};

/// Produces the canonical table triple from `dir`, falling back to synthetic
/// generation when the directory holds no recognized source set (or no
/// directory was given). The fallback means this function only fails on a
/// structurally unreadable source file, never on an absent one.
pub fn load_tables(
    dir: Option<&Path>,
    config: Option<&SyntheticConfig>,
) -> Result<CanonicalTables> {
    if let Some(dir) = dir {
        if has_files(dir, CANONICAL_FILES) {
            info!(path = %dir.display(), "loading canonical csv set");
            return canonical::load_canonical_dir(dir);
        }
        if has_files(dir, EMR_FILES) {
            info!(path = %dir.display(), "loading emr export set");
            return emr::load_emr_dir(dir);
        }
        // Deliberate fall-through so a load never fails outright, but a
        // misspelled directory should still be visible in the logs.
        warn!(path = %dir.display(), "no recognized source set; generating synthetic data");
    }

    let default_config = SyntheticConfig::default();
    let config = config.unwrap_or(&default_config);
    info!(
        patients = config.patients,
        seed = config.seed,
        "generating synthetic tables"
    );
    synthetic::generate(config)
}

fn has_files(dir: &Path, names: &[&str]) -> bool {
    names.iter().all(|name| dir.join(name).is_file())
}
