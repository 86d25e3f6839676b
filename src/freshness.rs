//! Freshness check: are the committed pages what generation would produce?
//!
//! The whole pipeline runs into a scratch directory, then every file it
//! produced is compared byte-for-byte with the file of the same name in the
//! committed output directory. Nothing committed is ever written.
//!
//! The scratch directory is a [`TempDir`], removed when it drops, so it goes
//! away on success, on staleness, and on any error in between.
//!
//! Files that exist only in the committed directory are not reported; the
//! check is driven by what the mapping generates.

use crate::config::MappingConfig;
use crate::generate::{GenerateError, generate};
use crate::project::Diagnostic;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FreshnessError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot walk scratch directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Why a generated file does not match its committed counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The committed file differs.
    Stale,
    /// There is no committed file of that name.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
    /// Path relative to the output directory.
    pub name: String,
    pub kind: Staleness,
}

impl fmt::Display for StaleFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Staleness::Stale => write!(f, "{}", self.name),
            Staleness::Missing => write!(f, "{} (missing from committed output)", self.name),
        }
    }
}

/// Outcome of a freshness check.
#[derive(Debug)]
pub struct FreshnessReport {
    /// The committed directory compared against.
    pub committed_dir: PathBuf,
    /// Every generated file name, in sorted order.
    pub checked: Vec<String>,
    pub stale: Vec<StaleFile>,
    /// Diagnostics from the generation run.
    pub diagnostics: Vec<Diagnostic>,
}

impl FreshnessReport {
    pub fn is_fresh(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Generate into a scratch directory and compare with `config.output_dir`.
pub fn check_freshness(config: &MappingConfig) -> Result<FreshnessReport, FreshnessError> {
    check_freshness_in(config, &std::env::temp_dir())
}

/// [`check_freshness`] with the scratch directory created under `scratch_parent`.
pub fn check_freshness_in(
    config: &MappingConfig,
    scratch_parent: &Path,
) -> Result<FreshnessReport, FreshnessError> {
    let scratch = tempfile::Builder::new()
        .prefix("spec-freshness-")
        .tempdir_in(scratch_parent)?;
    let report = generate(config, scratch.path())?;
    let (checked, stale) = compare_dirs(scratch.path(), &config.output_dir)?;
    close_scratch(scratch);

    Ok(FreshnessReport {
        committed_dir: config.output_dir.clone(),
        checked,
        stale,
        diagnostics: report.diagnostics,
    })
}

fn close_scratch(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(err) = scratch.close() {
        debug!(path = %path.display(), %err, "scratch directory cleanup failed");
    }
}

/// Compare every file under `generated` with the same path under `committed`.
///
/// Returns the relative names checked and the ones that are stale or missing,
/// both sorted by name.
pub fn compare_dirs(
    generated: &Path,
    committed: &Path,
) -> Result<(Vec<String>, Vec<StaleFile>), FreshnessError> {
    let mut checked = Vec::new();
    let mut stale = Vec::new();

    for entry in WalkDir::new(generated).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(generated)
            .unwrap_or(entry.path());
        let name = relative.to_string_lossy().into_owned();

        let fresh = fs::read(entry.path())?;
        match fs::read(committed.join(relative)) {
            Ok(existing) if existing == fresh => {}
            Ok(_) => stale.push(StaleFile {
                name: name.clone(),
                kind: Staleness::Stale,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => stale.push(StaleFile {
                name: name.clone(),
                kind: Staleness::Missing,
            }),
            Err(err) => return Err(err.into()),
        }
        debug!(file = %name, "compared");
        checked.push(name);
    }

    Ok((checked, stale))
}
