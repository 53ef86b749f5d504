//! Gradient-magnitude transform.
//!
//! Converts an intensity image into its edge map: the discrete gradient
//! is taken along both axes (central differences in the interior,
//! one-sided differences at the borders, unit sample spacing), then the
//! pointwise Euclidean magnitude `sqrt(gx² + gy²)` is formed. The
//! output has the same shape as the input.
//!
//! Comparing gradient images makes the downstream metrics measure
//! edge-map similarity rather than raw intensity similarity.

use crate::types::{ImageMatrix, PipelineError};

/// Derivative of a 1-D sequence accessed through `sample`, at `index`
/// of `len` samples.
fn derivative(sample: impl Fn(usize) -> f64, index: usize, len: usize) -> f64 {
    if index == 0 {
        sample(1) - sample(0)
    } else if index == len - 1 {
        sample(len - 1) - sample(len - 2)
    } else {
        (sample(index + 1) - sample(index - 1)) / 2.0
    }
}

/// Compute the gradient-magnitude image.
///
/// # Errors
///
/// Returns [`PipelineError::ImageTooSmall`] if the input has fewer than
/// two rows or two columns — a derivative needs at least two samples
/// along each axis.
pub fn magnitude(image: &ImageMatrix) -> Result<ImageMatrix, PipelineError> {
    let (rows, cols) = image.shape();
    if rows < 2 || cols < 2 {
        return Err(PipelineError::ImageTooSmall {
            operation: "gradient",
            rows,
            cols,
        });
    }

    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let down_rows = derivative(|r| image.get(r, col), row, rows);
            let across_cols = derivative(|c| image.get(row, c), col, cols);
            data.push(down_rows.hypot(across_cols));
        }
    }
    ImageMatrix::from_raw(rows, cols, data).ok_or(PipelineError::ImageTooSmall {
        operation: "gradient",
        rows,
        cols,
    })
}
