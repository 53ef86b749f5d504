//! imgcmp: figure-of-merit comparison of images against a reference.
//!
//! Scores one or more candidate images against a reference (oracle)
//! image with four metrics: SNR, PSNR, RMSE and MAE. Optional
//! transforms run before scoring: linear-regression intensity scaling,
//! translational registration, restriction to the inscribed resolution
//! square, ROI cropping and gradient-magnitude comparison.
//!
//! # Usage
//!
//! ```text
//! imgcmp --reference oracle.png --candidates recon_a.png:recon_b.png [OPTIONS]
//! imgcmp --reference oracle.png --dir reconstructions/ [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use imgcmp_cli::{CandidateSource, split_candidate_list};
use imgcmp_io::{default_report_path, write_check_image, write_report};
use imgcmp_pipeline::PipelineConfig;

/// Figure-of-merit comparison of images against a reference.
///
/// Computes SNR, PSNR, RMSE and MAE for every candidate against the
/// reference image, optionally after scaling, registration, cropping
/// and gradient transforms, and writes a text report of the batch.
#[derive(Parser)]
#[command(name = "imgcmp", version)]
#[command(group(
    clap::ArgGroup::new("candidate_source")
        .required(true)
        .args(["candidates", "dir"]),
))]
struct Cli {
    /// Path to the reference (oracle) image.
    #[arg(long)]
    reference: PathBuf,

    /// Colon-separated list of candidate image paths.
    #[arg(long)]
    candidates: Option<String>,

    /// Directory whose files are compared in file-name order.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Scale candidate intensities onto the reference by linear
    /// regression before scoring.
    #[arg(long)]
    scale: bool,

    /// Register the candidate to the reference by exhaustive
    /// translation search before scoring.
    #[arg(long)]
    register: bool,

    /// Restrict the analysis to the centered square inscribed in the
    /// resolution circle.
    #[arg(long)]
    resolution_circle: bool,

    /// Region of interest: a rectangle 'x0:y0,x1:y1' or the path of a
    /// pixel-list file.
    #[arg(long)]
    roi: Option<String>,

    /// Compare gradient magnitude images instead of intensities.
    #[arg(long)]
    gradient: bool,

    /// Write a side-by-side PNG of the first prepared pair for a
    /// visual orientation check.
    #[arg(long)]
    check_image: Option<PathBuf>,

    /// Report file path (default: '<reference stem>_fom.txt' next to
    /// the reference).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Prepend a header with the reference name and the enabled
    /// transforms to the report.
    #[arg(long)]
    verbose_report: bool,

    /// Skip writing the report file.
    #[arg(long, conflicts_with = "report")]
    no_report: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, the individual transform flags (including --roi)
    /// are ignored. The JSON must be a valid `PipelineConfig`
    /// serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual transform flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    let roi = match cli.roi {
        Some(ref spec) => Some(imgcmp_io::parse_region(spec).map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(PipelineConfig {
        scaling: cli.scale,
        registration: cli.register,
        resolution_circle: cli.resolution_circle,
        roi,
        gradient: cli.gradient,
    })
}

/// Resolve the candidate source from the CLI flags.
///
/// The clap group guarantees exactly one of `--candidates` and `--dir`
/// is present.
fn source_from_cli(cli: &Cli) -> Result<CandidateSource, String> {
    if let Some(ref list) = cli.candidates {
        let mut paths = split_candidate_list(list);
        if paths.is_empty() {
            return Err("--candidates resolved to no paths".to_owned());
        }
        if paths.len() == 1 {
            return Ok(CandidateSource::Single(paths.remove(0)));
        }
        return Ok(CandidateSource::List(paths));
    }
    cli.dir
        .clone()
        .map(CandidateSource::Directory)
        .ok_or_else(|| "either --candidates or --dir is required".to_owned())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let source = match source_from_cli(&cli) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if !cli.reference.is_file() {
        eprintln!("Reference image {} does not exist", cli.reference.display());
        return ExitCode::FAILURE;
    }

    let start = Instant::now();

    let outcome = match imgcmp_cli::run(&cli.reference, &source, &config) {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    for entry in &outcome.entries {
        match &entry.outcome {
            Ok(metrics) => {
                println!(
                    "{}: SNR = {}  PSNR = {}  RMSE = {}  MAE = {}",
                    entry.candidate, metrics.snr, metrics.psnr, metrics.rmse, metrics.mae,
                );
            }
            Err(reason) => {
                println!("{}: FAILED: {reason}", entry.candidate);
            }
        }
    }

    if let Some(ref check_path) = cli.check_image {
        match &outcome.first_pair {
            Some((reference, candidate)) => {
                if let Err(e) = write_check_image(check_path, reference, candidate) {
                    eprintln!("{e}");
                }
            }
            None => {
                eprintln!("No candidate was prepared; skipping the check image");
            }
        }
    }

    if !cli.no_report {
        let report_path = cli
            .report
            .clone()
            .unwrap_or_else(|| default_report_path(&cli.reference));
        let reference_name = cli.reference.display().to_string();
        match write_report(
            &report_path,
            &reference_name,
            &config,
            &outcome.entries,
            cli.verbose_report,
        ) {
            Ok(()) => eprintln!("Report written to {}", report_path.display()),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let failures = outcome
        .entries
        .iter()
        .filter(|entry| entry.outcome.is_err())
        .count();
    eprintln!(
        "Compared {} candidate(s) ({failures} failed) in {:.2?}",
        outcome.entries.len(),
        start.elapsed(),
    );

    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn requires_exactly_one_candidate_source() {
        assert!(Cli::try_parse_from(["imgcmp", "--reference", "o.png"]).is_err());
        assert!(
            Cli::try_parse_from([
                "imgcmp",
                "--reference",
                "o.png",
                "--candidates",
                "a.png",
                "--dir",
                "recons",
            ])
            .is_err()
        );
    }

    #[test]
    fn flags_map_onto_the_config() {
        let cli = parse(&[
            "imgcmp",
            "--reference",
            "o.png",
            "--candidates",
            "a.png",
            "--scale",
            "--gradient",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!(config.scaling);
        assert!(config.gradient);
        assert!(!config.registration);
        assert!(!config.resolution_circle);
        assert!(config.roi.is_none());
    }

    #[test]
    fn roi_rectangle_is_parsed_from_the_flag() {
        let cli = parse(&[
            "imgcmp",
            "--reference",
            "o.png",
            "--candidates",
            "a.png",
            "--roi",
            "1:2,3:4",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(
            config.roi,
            Some(imgcmp_pipeline::RegionSpec::Rectangle {
                p0: (2, 1),
                p1: (4, 3),
            }),
        );
    }

    #[test]
    fn config_json_overrides_individual_flags() {
        let cli = parse(&[
            "imgcmp",
            "--reference",
            "o.png",
            "--candidates",
            "a.png",
            "--scale",
            "--config-json",
            r#"{"scaling":false,"registration":true,"resolution_circle":false,"roi":null,"gradient":false}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!(!config.scaling);
        assert!(config.registration);
    }

    #[test]
    fn invalid_config_json_is_an_error() {
        let cli = parse(&[
            "imgcmp",
            "--reference",
            "o.png",
            "--candidates",
            "a.png",
            "--config-json",
            "{not json",
        ]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn single_candidate_resolves_to_single_source() {
        let cli = parse(&["imgcmp", "--reference", "o.png", "--candidates", "a.png"]);
        assert_eq!(
            source_from_cli(&cli).unwrap(),
            CandidateSource::Single(PathBuf::from("a.png")),
        );
    }

    #[test]
    fn candidate_list_resolves_in_order() {
        let cli = parse(&[
            "imgcmp",
            "--reference",
            "o.png",
            "--candidates",
            "a.png:b.png",
        ]);
        assert_eq!(
            source_from_cli(&cli).unwrap(),
            CandidateSource::List(vec![PathBuf::from("a.png"), PathBuf::from("b.png")]),
        );
    }
}
