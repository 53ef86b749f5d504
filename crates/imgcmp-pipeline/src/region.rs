//! Region-of-interest extraction: rectangle crop and pixel-list
//! gathering with the factorization reshape.
//!
//! Both operations apply the same geometric rule independently to each
//! image of a pair — the pipeline calls them once per image and relies
//! on the final shape check to catch disagreement.

use crate::types::{ImageMatrix, PipelineError, RegionSpec};

/// Crop the inclusive axis-aligned box spanned by two opposite corners.
///
/// Corner order does not matter; `(p0, p1)` and `(p1, p0)` describe the
/// same box. Both corners are `(row, col)`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidRegion`] if either corner lies
/// outside the image, or if the box is degenerate (zero width or zero
/// height — a single row or column of corners).
pub fn crop_rectangle(
    image: &ImageMatrix,
    p0: (usize, usize),
    p1: (usize, usize),
) -> Result<ImageMatrix, PipelineError> {
    for &(row, col) in &[p0, p1] {
        if row >= image.rows() || col >= image.cols() {
            return Err(PipelineError::InvalidRegion(format!(
                "corner ({row}, {col}) lies outside a {}x{} image",
                image.rows(),
                image.cols(),
            )));
        }
    }

    let (row0, row1) = (p0.0.min(p1.0), p0.0.max(p1.0));
    let (col0, col1) = (p0.1.min(p1.1), p0.1.max(p1.1));
    if row0 == row1 || col0 == col1 {
        return Err(PipelineError::InvalidRegion(format!(
            "box ({row0}, {col0})-({row1}, {col1}) is degenerate",
        )));
    }

    let rows = row1 - row0 + 1;
    let cols = col1 - col0 + 1;
    let mut data = Vec::with_capacity(rows * cols);
    for row in row0..=row1 {
        for col in col0..=col1 {
            data.push(image.get(row, col));
        }
    }
    ImageMatrix::from_raw(rows, cols, data)
        .ok_or_else(|| PipelineError::InvalidRegion("crop produced an empty matrix".into()))
}

/// Smallest prime factor of `n`, by trial division starting at 2.
///
/// Returns `None` for `n < 2`.
fn smallest_prime_factor(n: usize) -> Option<usize> {
    if n < 2 {
        return None;
    }
    let mut factor = 2;
    while factor * factor <= n {
        if n % factor == 0 {
            return Some(factor);
        }
        factor += 1;
    }
    // No divisor up to sqrt(n): n itself is prime.
    Some(n)
}

/// Shape for reshaping a flat list of `count` extracted samples into a
/// 2-D matrix.
///
/// A prime count becomes a single row `1 × count`; a composite count
/// becomes `p × count/p` with `p` the smallest prime factor. The choice
/// of the smallest prime factor as the row count is load-bearing: it
/// reproduces the reference tool's output shapes and must not be
/// replaced by a "squarer" factorization.
///
/// # Errors
///
/// Returns [`PipelineError::Reshape`] for `count` of 0 or 1, which
/// cannot form a 2-D matrix.
pub fn reshape_dimensions(count: usize) -> Result<(usize, usize), PipelineError> {
    let factor = smallest_prime_factor(count).ok_or(PipelineError::Reshape { count })?;
    if factor == count {
        // Prime: a single row.
        Ok((1, count))
    } else {
        Ok((factor, count / factor))
    }
}

/// Gather the samples at the listed `(row, col)` coordinates, in list
/// order, and reshape them via [`reshape_dimensions`].
///
/// # Errors
///
/// Returns [`PipelineError::InvalidRegion`] if any coordinate is out of
/// bounds, and [`PipelineError::Reshape`] for degenerate list lengths.
pub fn extract_pixel_list(
    image: &ImageMatrix,
    pixels: &[(usize, usize)],
) -> Result<ImageMatrix, PipelineError> {
    let (rows, cols) = reshape_dimensions(pixels.len())?;

    let mut data = Vec::with_capacity(pixels.len());
    for &(row, col) in pixels {
        if row >= image.rows() || col >= image.cols() {
            return Err(PipelineError::InvalidRegion(format!(
                "pixel ({row}, {col}) lies outside a {}x{} image",
                image.rows(),
                image.cols(),
            )));
        }
        data.push(image.get(row, col));
    }

    ImageMatrix::from_raw(rows, cols, data)
        .ok_or(PipelineError::Reshape { count: pixels.len() })
}

/// Apply a [`RegionSpec`] to one image.
///
/// # Errors
///
/// Propagates the errors of [`crop_rectangle`] and
/// [`extract_pixel_list`].
pub fn apply(image: &ImageMatrix, spec: &RegionSpec) -> Result<ImageMatrix, PipelineError> {
    match spec {
        RegionSpec::Rectangle { p0, p1 } => crop_rectangle(image, *p0, *p1),
        RegionSpec::PixelList(pixels) => extract_pixel_list(image, pixels),
    }
}
