//! Shared types for the imgcmp comparison pipeline.

use serde::{Deserialize, Serialize};

/// A 2-D array of real-valued image samples, stored row-major.
///
/// Every pipeline transform consumes a matrix and produces a new one;
/// the decoded source buffer is never mutated in place. Samples are
/// `f64` so that metric accumulation over large images stays exact to
/// the documented tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ImageMatrix {
    /// Create a matrix from a row-major sample buffer.
    ///
    /// Returns `None` if `data.len() != rows * cols` or either
    /// dimension is zero.
    #[must_use]
    pub fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Create a matrix filled with a single value.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Option<Self> {
        Self::from_raw(rows, cols, vec![value; rows.checked_mul(cols)?])
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as a `(rows, cols)` pair.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total sample count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns `true` if the matrix holds no samples.
    ///
    /// Construction forbids zero-sized dimensions, so this is always
    /// `false` for a matrix obtained from [`from_raw`](Self::from_raw);
    /// it exists to satisfy the `len`/`is_empty` pairing convention.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds (debug and release).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "sample index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );
        self.data[row * self.cols + col]
    }

    /// The row-major sample buffer.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix and return the row-major sample buffer.
    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.data
    }

    /// Maximum sample value, scanning the whole buffer.
    #[must_use]
    pub fn max_sample(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean sample value.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

/// A region of interest to crop out of both images before metric
/// computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionSpec {
    /// Axis-aligned box given by two opposite corners `(row, col)`,
    /// both inclusive. Corner order is irrelevant; the box must lie
    /// within image bounds and have nonzero width and height.
    Rectangle {
        /// First corner, `(row, col)`.
        p0: (usize, usize),
        /// Opposite corner, `(row, col)`.
        p1: (usize, usize),
    },
    /// Explicit `(row, col)` sample coordinates, extracted in order and
    /// reshaped into a 2-D matrix (see [`crate::region`]).
    PixelList(Vec<(usize, usize)>),
}

/// Configuration for the comparison pipeline.
///
/// Each field independently enables one transform stage. Stages always
/// apply in the fixed order scaling → registration → resolution-square
/// crop → ROI crop → gradient; disabling a stage skips it without
/// affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fit candidate intensities to the reference by least-squares
    /// linear regression before comparing.
    pub scaling: bool,

    /// Align the candidate to the reference by translation-only SSD
    /// registration before comparing.
    pub registration: bool,

    /// Restrict the comparison to the centered square inscribed in the
    /// resolution circle, cropped per image.
    pub resolution_circle: bool,

    /// Region of interest to crop out of both images, or `None` to
    /// compare full frames.
    pub roi: Option<RegionSpec>,

    /// Compare gradient-magnitude images (edge maps) instead of raw
    /// intensities.
    pub gradient: bool,
}

/// The four figures of merit for one (reference, candidate) pair.
///
/// `snr` and `psnr` are `+∞` when the images are identical over the
/// compared region (zero error energy); `rmse` and `mae` are then `0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Signal-to-noise ratio in dB.
    pub snr: f64,
    /// Peak signal-to-noise ratio in dB.
    pub psnr: f64,
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
}

/// Errors that can occur while preparing or comparing an image pair.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The two images disagree in shape after all transforms.
    #[error(
        "images have different shapes after transforms: \
         reference {reference_rows}x{reference_cols}, candidate {candidate_rows}x{candidate_cols}"
    )]
    ShapeMismatch {
        /// Reference rows.
        reference_rows: usize,
        /// Reference columns.
        reference_cols: usize,
        /// Candidate rows.
        candidate_rows: usize,
        /// Candidate columns.
        candidate_cols: usize,
    },

    /// A region of interest lies outside the image or is degenerate.
    #[error("invalid region of interest: {0}")]
    InvalidRegion(String),

    /// A pixel list cannot be reshaped into a 2-D matrix.
    #[error("cannot reshape a list of {count} pixels into a 2-D matrix")]
    Reshape {
        /// Number of pixels in the list.
        count: usize,
    },

    /// An image is too small for the requested transform.
    #[error("image is too small for {operation}: {rows}x{cols}")]
    ImageTooSmall {
        /// The transform that rejected the image.
        operation: &'static str,
        /// Image rows.
        rows: usize,
        /// Image columns.
        cols: usize,
    },
}

impl PipelineError {
    /// Build a [`ShapeMismatch`](Self::ShapeMismatch) from two shapes.
    #[must_use]
    pub const fn shape_mismatch(reference: (usize, usize), candidate: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            reference_rows: reference.0,
            reference_cols: reference.1,
            candidate_rows: candidate.0,
            candidate_cols: candidate.1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- ImageMatrix tests ---

    #[test]
    fn from_raw_accepts_matching_buffer() {
        let m = ImageMatrix::from_raw(2, 3, vec![0.0; 6]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.len(), 6);
        assert!(!m.is_empty());
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        assert!(ImageMatrix::from_raw(2, 3, vec![0.0; 5]).is_none());
    }

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        assert!(ImageMatrix::from_raw(0, 3, vec![]).is_none());
        assert!(ImageMatrix::from_raw(3, 0, vec![]).is_none());
    }

    #[test]
    fn get_is_row_major() {
        let m = ImageMatrix::from_raw(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert!((m.get(0, 0) - 1.0).abs() < f64::EPSILON);
        assert!((m.get(0, 2) - 3.0).abs() < f64::EPSILON);
        assert!((m.get(1, 0) - 4.0).abs() < f64::EPSILON);
        assert!((m.get(1, 2) - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_out_of_bounds_panics() {
        let m = ImageMatrix::filled(2, 2, 0.0).unwrap();
        let _ = m.get(2, 0);
    }

    #[test]
    fn filled_uniform_value() {
        let m = ImageMatrix::filled(3, 3, 7.5).unwrap();
        assert!(m.samples().iter().all(|&v| (v - 7.5).abs() < f64::EPSILON));
    }

    #[test]
    fn max_and_mean() {
        let m = ImageMatrix::from_raw(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((m.max_sample() - 4.0).abs() < f64::EPSILON);
        assert!((m.mean() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn into_samples_returns_buffer() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let m = ImageMatrix::from_raw(2, 2, data.clone()).unwrap();
        assert_eq!(m.into_samples(), data);
    }

    // --- PipelineConfig tests ---

    #[test]
    fn config_default_disables_every_stage() {
        let config = PipelineConfig::default();
        assert!(!config.scaling);
        assert!(!config.registration);
        assert!(!config.resolution_circle);
        assert!(config.roi.is_none());
        assert!(!config.gradient);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            scaling: true,
            registration: false,
            resolution_circle: true,
            roi: Some(RegionSpec::Rectangle {
                p0: (1, 2),
                p1: (5, 6),
            }),
            gradient: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn region_spec_pixel_list_serde_round_trip() {
        let spec = RegionSpec::PixelList(vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        let json = serde_json::to_string(&spec).unwrap();
        let deserialized: RegionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, deserialized);
    }

    // --- PipelineError tests ---

    #[test]
    fn shape_mismatch_display() {
        let err = PipelineError::shape_mismatch((10, 10), (10, 8));
        assert_eq!(
            err.to_string(),
            "images have different shapes after transforms: \
             reference 10x10, candidate 10x8",
        );
    }

    #[test]
    fn reshape_display() {
        let err = PipelineError::Reshape { count: 1 };
        assert_eq!(
            err.to_string(),
            "cannot reshape a list of 1 pixels into a 2-D matrix",
        );
    }

    #[test]
    fn image_too_small_display() {
        let err = PipelineError::ImageTooSmall {
            operation: "gradient",
            rows: 1,
            cols: 5,
        };
        assert_eq!(err.to_string(), "image is too small for gradient: 1x5");
    }
}
