//! Batch orchestration.
//!
//! Resolves the candidate set once up front, then compares each
//! candidate against the reference in turn. The reference is reloaded
//! for every candidate so a run over many candidates always scores
//! against the pristine decoded reference, never a matrix mutated by a
//! previous pair's transforms.
//!
//! A candidate that fails (undecodable file, region out of bounds,
//! shape mismatch after the pipeline) is recorded with its reason and
//! the batch continues; only problems that make the whole run
//! meaningless, such as an unreadable candidate directory, abort it.

use std::path::{Path, PathBuf};

use imgcmp_io::{ReportEntry, read_image};
use imgcmp_pipeline::{ImageMatrix, PipelineConfig, prepare};

/// Where the candidate images come from.
///
/// Resolved into a concrete path list exactly once, before any image is
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// One candidate image.
    Single(PathBuf),
    /// An explicit ordered list of candidate images.
    List(Vec<PathBuf>),
    /// Every regular file in a directory, in lexicographic file-name
    /// order.
    Directory(PathBuf),
}

impl CandidateSource {
    /// Resolve the source into an ordered list of candidate paths.
    ///
    /// # Errors
    ///
    /// Returns a message when a directory source cannot be listed or
    /// resolves to no files at all.
    pub fn resolve(&self) -> Result<Vec<PathBuf>, String> {
        match self {
            Self::Single(path) => Ok(vec![path.clone()]),
            Self::List(paths) => Ok(paths.clone()),
            Self::Directory(dir) => list_directory(dir),
        }
    }
}

/// List the regular files of a directory, sorted by file name.
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("cannot list directory {}: {e}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("cannot list directory {}: {e}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by_key(|path| path.file_name().map(std::ffi::OsStr::to_os_string));

    if files.is_empty() {
        return Err(format!("directory {} contains no files", dir.display()));
    }
    Ok(files)
}

/// Split a colon-separated candidate list into paths.
///
/// Empty segments (doubled or trailing colons) are skipped.
#[must_use]
pub fn split_candidate_list(spec: &str) -> Vec<PathBuf> {
    spec.split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Result of one full batch run.
pub struct BatchOutcome {
    /// One entry per resolved candidate, in processing order.
    pub entries: Vec<ReportEntry>,
    /// The first successfully prepared pair, kept for the orientation
    /// check image.
    pub first_pair: Option<(ImageMatrix, ImageMatrix)>,
}

/// Compare every candidate against the reference.
///
/// # Errors
///
/// Returns a message when the candidate source cannot be resolved.
/// Per-candidate failures do not abort the batch; they are recorded in
/// the returned entries instead.
pub fn run(
    reference: &Path,
    source: &CandidateSource,
    config: &PipelineConfig,
) -> Result<BatchOutcome, String> {
    let candidates = source.resolve()?;

    let mut entries = Vec::with_capacity(candidates.len());
    let mut first_pair = None;

    for candidate_path in &candidates {
        let identifier = candidate_path.display().to_string();
        let outcome = compare_one(reference, candidate_path, config, &mut first_pair);
        entries.push(ReportEntry {
            candidate: identifier,
            outcome,
        });
    }

    Ok(BatchOutcome {
        entries,
        first_pair,
    })
}

/// Load, prepare and score a single candidate.
fn compare_one(
    reference: &Path,
    candidate: &Path,
    config: &PipelineConfig,
    first_pair: &mut Option<(ImageMatrix, ImageMatrix)>,
) -> Result<imgcmp_pipeline::MetricResult, String> {
    let reference = read_image(reference).map_err(|e| e.to_string())?;
    let candidate = read_image(candidate).map_err(|e| e.to_string())?;

    let prepared = prepare(reference, candidate, config).map_err(|e| e.to_string())?;
    let metrics = prepared.metrics();

    if first_pair.is_none() {
        *first_pair = Some((prepared.reference, prepared.candidate));
    }
    Ok(metrics)
}
