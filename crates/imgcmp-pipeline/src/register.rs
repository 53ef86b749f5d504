//! Translation-only image registration by sum-of-squared-differences.
//!
//! Exhaustively searches integer shifts within [`MAX_SHIFT`] samples
//! along each axis, scoring each shift by the mean squared difference
//! over the region where the shifted candidate and the reference
//! overlap. The candidate is then translated by the best shift; samples
//! the translation vacates are filled with the candidate's mean value,
//! which is neutral with respect to its intensity distribution.

use crate::types::{ImageMatrix, PipelineError};

/// Maximum shift searched along each axis, in samples.
pub const MAX_SHIFT: isize = 16;

/// Mean squared difference between `reference` and `candidate` shifted
/// by `(shift_row, shift_col)`, over the overlap region.
///
/// Returns `None` when the overlap is empty.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn shifted_ssd(
    reference: &ImageMatrix,
    candidate: &ImageMatrix,
    shift_row: isize,
    shift_col: isize,
) -> Option<f64> {
    let rows = reference.rows() as isize;
    let cols = reference.cols() as isize;

    let row_range = shift_row.max(0)..(rows + shift_row.min(0));
    let col_range = shift_col.max(0)..(cols + shift_col.min(0));
    if row_range.is_empty() || col_range.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut count: u64 = 0;
    for row in row_range {
        for col in col_range.clone() {
            let o = reference.get(row.unsigned_abs(), col.unsigned_abs());
            let c = candidate.get(
                (row - shift_row).unsigned_abs(),
                (col - shift_col).unsigned_abs(),
            );
            total += (o - c) * (o - c);
            count += 1;
        }
    }
    Some(total / count as f64)
}

/// Best integer shift `(row, col)` aligning `candidate` to `reference`.
///
/// The zero shift is scored first and a competing shift must be a
/// strict improvement to replace it, so already-aligned images keep
/// `(0, 0)` even when distant shifts tie.
#[must_use]
pub fn best_shift(reference: &ImageMatrix, candidate: &ImageMatrix) -> (isize, isize) {
    let mut best = (0, 0);
    let mut best_score = shifted_ssd(reference, candidate, 0, 0).unwrap_or(f64::INFINITY);

    for shift_row in -MAX_SHIFT..=MAX_SHIFT {
        for shift_col in -MAX_SHIFT..=MAX_SHIFT {
            if (shift_row, shift_col) == (0, 0) {
                continue;
            }
            if let Some(score) = shifted_ssd(reference, candidate, shift_row, shift_col)
                && score < best_score
            {
                best_score = score;
                best = (shift_row, shift_col);
            }
        }
    }
    best
}

/// Align `candidate` to `reference` and return the translated image.
///
/// # Errors
///
/// Returns [`PipelineError::ShapeMismatch`] if the images disagree in
/// shape — the shift search compares paired windows.
#[allow(clippy::cast_possible_wrap)]
pub fn register(
    candidate: &ImageMatrix,
    reference: &ImageMatrix,
) -> Result<ImageMatrix, PipelineError> {
    if reference.shape() != candidate.shape() {
        return Err(PipelineError::shape_mismatch(
            reference.shape(),
            candidate.shape(),
        ));
    }

    let (shift_row, shift_col) = best_shift(reference, candidate);
    Ok(translate(candidate, shift_row, shift_col))
}

/// Translate an image by an integer shift, filling vacated samples with
/// the image mean.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub fn translate(image: &ImageMatrix, shift_row: isize, shift_col: isize) -> ImageMatrix {
    let (rows, cols) = image.shape();
    let fill = image.mean();
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let src_row = row as isize - shift_row;
            let src_col = col as isize - shift_col;
            let in_bounds = (0..rows as isize).contains(&src_row)
                && (0..cols as isize).contains(&src_col);
            data.push(if in_bounds {
                image.get(src_row.unsigned_abs(), src_col.unsigned_abs())
            } else {
                fill
            });
        }
    }
    // Shape is preserved, so reconstruction cannot fail.
    ImageMatrix::from_raw(rows, cols, data).unwrap_or_else(|| image.clone())
}
