//! Batch report writer.
//!
//! Persists one text report per run. The per-candidate metric block is
//! the stable, machine-scraped part of the format and is exactly:
//!
//! ```text
//! Candidate: <identifier>
//! SNR = <value>
//! PSNR = <value>
//! RMSE = <value>
//! MAE = <value>
//! ```
//!
//! Failed candidates get a `FAILED: <reason>` line instead of the four
//! metric lines, so the report accounts for every requested candidate.
//! Verbose mode prepends a header block naming the reference image and
//! one line per enabled pipeline option.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use imgcmp_pipeline::{MetricResult, PipelineConfig, RegionSpec};

/// Outcome of one candidate comparison, as recorded in a batch.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Candidate identifier (its path as given or discovered).
    pub candidate: String,
    /// Metrics, or the reason this candidate failed.
    pub outcome: Result<MetricResult, String>,
}

/// Errors that can occur while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("failed to write report {path}: {source}")]
    Write {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Render the report text.
#[must_use]
pub fn render_report(
    reference: &str,
    config: &PipelineConfig,
    entries: &[ReportEntry],
    verbose: bool,
) -> String {
    let mut out = String::new();

    if verbose {
        out.push_str("Image figure-of-merit analysis\n");
        let _ = writeln!(out, "Reference image: {reference}");
        out.push('\n');
        for line in option_lines(config) {
            let _ = writeln!(out, "{line}");
        }
        out.push('\n');
    }

    for entry in entries {
        let _ = writeln!(out, "Candidate: {}", entry.candidate);
        match &entry.outcome {
            Ok(metrics) => {
                let _ = writeln!(out, "SNR = {}", metrics.snr);
                let _ = writeln!(out, "PSNR = {}", metrics.psnr);
                let _ = writeln!(out, "RMSE = {}", metrics.rmse);
                let _ = writeln!(out, "MAE = {}", metrics.mae);
            }
            Err(reason) => {
                let _ = writeln!(out, "FAILED: {reason}");
            }
        }
        out.push('\n');
    }

    out
}

/// One descriptive line per enabled pipeline option.
fn option_lines(config: &PipelineConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if config.scaling {
        lines.push("Linear regression scaling enabled".to_owned());
    }
    if config.registration {
        lines.push("Image registration enabled".to_owned());
    }
    if config.resolution_circle {
        lines.push("Analysis restricted to the resolution circle".to_owned());
    }
    match &config.roi {
        Some(RegionSpec::Rectangle { p0, p1 }) => {
            lines.push(format!(
                "Cropping rectangular ROI with vertices ({}, {}) and ({}, {})",
                p0.0, p0.1, p1.0, p1.1,
            ));
        }
        Some(RegionSpec::PixelList(pixels)) => {
            lines.push(format!("Using a pixel list of {} samples", pixels.len()));
        }
        None => {}
    }
    if config.gradient {
        lines.push("Analysis performed on gradient images".to_owned());
    }
    if lines.is_empty() {
        lines.push("No transforms enabled".to_owned());
    }
    lines
}

/// Render and persist the report.
///
/// # Errors
///
/// Returns [`ReportError::Write`] when the file cannot be written.
pub fn write_report(
    path: &Path,
    reference: &str,
    config: &PipelineConfig,
    entries: &[ReportEntry],
    verbose: bool,
) -> Result<(), ReportError> {
    let text = render_report(reference, config, entries, verbose);
    std::fs::write(path, text).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Default report path: the reference file's stem plus `_fom.txt`, next
/// to the reference.
#[must_use]
pub fn default_report_path(reference: &Path) -> PathBuf {
    let stem = reference
        .file_stem()
        .map_or_else(|| "report".into(), std::ffi::OsStr::to_os_string);
    let mut name = stem;
    name.push("_fom.txt");
    reference.with_file_name(name)
}
