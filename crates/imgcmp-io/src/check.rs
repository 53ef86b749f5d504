//! Orientation check image.
//!
//! The reference tool popped up an interactive plot so the operator
//! could confirm both images were oriented the same way before trusting
//! the numbers. Here the same check is a side-by-side PNG: the prepared
//! reference on the left, the prepared candidate on the right, each
//! min-max normalized to 8-bit, separated by a thin gutter. Purely
//! observational — the rendering never feeds back into the metrics.

use std::path::{Path, PathBuf};

use imgcmp_pipeline::ImageMatrix;

/// Width of the separator between the two panels, in pixels.
const GUTTER: u32 = 4;

/// Grey value of the gutter and of any unused canvas area.
const BACKGROUND: u8 = 32;

/// Errors that can occur while writing a check image.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The composed image could not be encoded or written.
    #[error("failed to write check image {path}: {source}")]
    Write {
        /// The offending path.
        path: PathBuf,
        /// The underlying encoder error.
        source: image::ImageError,
    },
}

/// Min-max normalize a matrix to 8-bit grey values.
///
/// A constant matrix maps to mid-grey.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn normalize(matrix: &ImageMatrix) -> Vec<u8> {
    let min = matrix
        .samples()
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max = matrix.max_sample();
    let range = max - min;
    matrix
        .samples()
        .iter()
        .map(|&v| {
            if range == 0.0 {
                128
            } else {
                ((v - min) / range * 255.0).round() as u8
            }
        })
        .collect()
}

/// Compose the two panels into one grayscale canvas.
#[allow(clippy::cast_possible_truncation)]
fn compose(reference: &ImageMatrix, candidate: &ImageMatrix) -> image::GrayImage {
    let left = normalize(reference);
    let right = normalize(candidate);
    let (left_rows, left_cols) = reference.shape();
    let (right_rows, right_cols) = candidate.shape();

    let width = (left_cols + right_cols) as u32 + GUTTER;
    let height = left_rows.max(right_rows) as u32;

    image::GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        if x < left_cols {
            if y < left_rows {
                return image::Luma([left[y * left_cols + x]]);
            }
        } else if x >= left_cols + GUTTER as usize {
            let col = x - left_cols - GUTTER as usize;
            if col < right_cols && y < right_rows {
                return image::Luma([right[y * right_cols + col]]);
            }
        }
        image::Luma([BACKGROUND])
    })
}

/// Write the side-by-side check image as a PNG.
///
/// # Errors
///
/// Returns [`CheckError::Write`] when encoding or writing fails.
pub fn write_check_image(
    path: &Path,
    reference: &ImageMatrix,
    candidate: &ImageMatrix,
) -> Result<(), CheckError> {
    compose(reference, candidate)
        .save(path)
        .map_err(|source| CheckError::Write {
            path: path.to_path_buf(),
            source,
        })
}
