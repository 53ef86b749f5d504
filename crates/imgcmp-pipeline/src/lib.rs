//! imgcmp-pipeline: Pure figure-of-merit comparison pipeline (sans-IO).
//!
//! Quantifies the similarity between a reference (oracle) image and a
//! candidate image through four figures of merit — SNR, PSNR, RMSE and
//! MAE — optionally after a configurable sequence of transforms:
//! intensity scaling -> SSD registration -> resolution-square crop ->
//! ROI crop -> gradient transform.
//!
//! This crate has **no I/O dependencies** — it operates on in-memory
//! `f64` matrices and returns structured data. File decoding, ROI-file
//! parsing and report writing live in `imgcmp-io`.

pub mod gradient;
pub mod metrics;
pub mod pipeline;
pub mod region;
pub mod register;
pub mod resolution;
pub mod scale;
pub mod types;

pub use pipeline::{PreparedPair, compare, prepare};
pub use types::{ImageMatrix, MetricResult, PipelineConfig, PipelineError, RegionSpec};
