//! Resolution-square selection.
//!
//! Tomographic quality evaluations are often restricted to the
//! resolution circle — the centered disc fully covered by every
//! projection. This module crops the square inscribed in that circle:
//! side `floor(min(rows, cols) / √2)`, centered. The rule is geometric
//! and per-image; the pipeline applies it to the reference and the
//! candidate independently.

use crate::region;
use crate::types::{ImageMatrix, PipelineError};

/// Crop the centered square inscribed in the resolution circle.
///
/// # Errors
///
/// Returns [`PipelineError::ImageTooSmall`] when the inscribed square
/// would be smaller than 2×2 and no meaningful comparison region
/// remains.
pub fn select_square(image: &ImageMatrix) -> Result<ImageMatrix, PipelineError> {
    let (rows, cols) = image.shape();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let side = (rows.min(cols) as f64 / std::f64::consts::SQRT_2).floor() as usize;
    if side < 2 {
        return Err(PipelineError::ImageTooSmall {
            operation: "resolution-square crop",
            rows,
            cols,
        });
    }

    let row0 = (rows - side) / 2;
    let col0 = (cols - side) / 2;
    region::crop_rectangle(image, (row0, col0), (row0 + side - 1, col0 + side - 1))
}
