//! # Batch validation over many reference files
//!
//! Each reference file is an **independent trial**: [`validate_all`] runs
//! [`validate_reference_file`] on every path and keeps every outcome, so a mismatch, a
//! malformed line or an unknown body in one file never prevents the others from being
//! checked.
//!
//! ## Result Model
//! -----------------
//! ```text
//! Utf8PathBuf → Result<FileSummary, EphemCheckError>
//! ```
//!
//! [`ValidationStats`] condenses a [`FullValidationResult`] into pass/fail counts and the
//! total number of records and comparisons, and [`failures`] lists the failing files in a
//! stable order for reporting.
//!
//! ## Progress UI (feature: `progress`)
//! -----------------
//! With the `progress` feature, [`validate_all`] renders a live progress bar (via
//! `indicatif`) showing the file being validated.
use std::{collections::HashMap, fmt};

use ahash::RandomState;
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use log::warn;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use super::{validate_reference_file, FileSummary, Tolerance};
use crate::{
    engine::registry::BodyRegistry, ephemcheck_errors::EphemCheckError,
    horizons::discovery::discover_reference_files,
};

/// Outcome of every file of a batch, keyed by path.
pub type FullValidationResult =
    HashMap<Utf8PathBuf, Result<FileSummary, EphemCheckError>, RandomState>;

/// Validate every file of `paths` against the engine registered in `registry`.
///
/// Arguments
/// -----------------
/// * `paths`: the reference files, in any order
/// * `registry`: the bodies of the computation engine under test
/// * `tolerance`: the fudge factors applied to every file
///
/// Return
/// ----------
/// * one entry per distinct path, either the file's [`FileSummary`] or the error that ended
///   its validation pass
pub fn validate_all<P: AsRef<Utf8Path>>(
    paths: &[P],
    registry: &BodyRegistry,
    tolerance: &Tolerance,
) -> FullValidationResult {
    let mut results: FullValidationResult = HashMap::default();

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new(paths.len().max(1) as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | ETA {eta_precise} | {msg}",
        ) {
            pb.set_style(style);
        }
        pb
    };

    for path in paths {
        let path = path.as_ref();

        #[cfg(feature = "progress")]
        pb.set_message(path.file_name().unwrap_or(path.as_str()).to_string());

        let outcome = validate_reference_file(path, registry, tolerance);
        if let Err(e) = &outcome {
            warn!("{path}: {e}");
        }
        results.insert(path.to_path_buf(), outcome);

        #[cfg(feature = "progress")]
        pb.inc(1);
    }

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    results
}

/// Discover the reference files of `dir` with the given extension and validate them all.
///
/// Return
/// ----------
/// * the batch outcome, or an error if the directory itself cannot be listed
pub fn validate_directory(
    dir: &Utf8Path,
    extension: &str,
    registry: &BodyRegistry,
    tolerance: &Tolerance,
) -> Result<FullValidationResult, EphemCheckError> {
    let paths = discover_reference_files(dir, extension)?;
    Ok(validate_all(&paths, registry, tolerance))
}

/// Failing files of a batch, sorted by path.
pub fn failures(all: &FullValidationResult) -> Vec<(&Utf8Path, &EphemCheckError)> {
    all.iter()
        .filter_map(|(path, outcome)| outcome.as_ref().err().map(|e| (path.as_path(), e)))
        .sorted_by_key(|(path, _)| *path)
        .collect()
}

/// Summary counts of a batch.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – compact single line:
///   ```text
///   files=4, passed=3, failed=1, records=12, comparisons=30
///   ```
/// * `format!("{:#}", stats)` – multi-line table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub files: usize,
    pub passed: usize,
    pub failed: usize,
    /// Records checked in the files that passed.
    pub records: usize,
    /// Comparisons performed in the files that passed.
    pub comparisons: usize,
}

impl ValidationStats {
    pub fn from_results(all: &FullValidationResult) -> Self {
        all.values()
            .fold(ValidationStats::default(), |mut stats, outcome| {
                stats.files += 1;
                match outcome {
                    Ok(summary) => {
                        stats.passed += 1;
                        stats.records += summary.records;
                        stats.comparisons += summary.comparisons();
                    }
                    Err(_) => stats.failed += 1,
                }
                stats
            })
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ValidationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Reference validation summary")?;
            writeln!(f, "----------------------------")?;
            writeln!(f, "files       : {}", self.files)?;
            writeln!(f, "passed      : {}", self.passed)?;
            writeln!(f, "failed      : {}", self.failed)?;
            writeln!(f, "records     : {}", self.records)?;
            write!(f, "comparisons : {}", self.comparisons)
        } else {
            write!(
                f,
                "files={}, passed={}, failed={}, records={}, comparisons={}",
                self.files, self.passed, self.failed, self.records, self.comparisons
            )
        }
    }
}
