//! Intensity scaling by least-squares linear regression.
//!
//! Fits `reference ≈ a · candidate + b` over all sample pairs and
//! returns the rescaled candidate `a · candidate + b`, mapping the
//! candidate's grey-value range onto the reference's before the error
//! metrics are taken.

use crate::types::{ImageMatrix, PipelineError};

/// Rescale `candidate` onto the intensity range of `reference`.
///
/// The fit minimizes `Σ (reference − (a·candidate + b))²`. A constant
/// candidate (zero variance) has no defined slope; it degrades to a
/// pure offset (`a = 1`, `b = mean(reference) − mean(candidate)`) so
/// the output stays finite.
///
/// # Errors
///
/// Returns [`PipelineError::ShapeMismatch`] if the images disagree in
/// shape — the regression is over paired samples.
#[allow(clippy::cast_precision_loss)]
pub fn linear_regression(
    reference: &ImageMatrix,
    candidate: &ImageMatrix,
) -> Result<ImageMatrix, PipelineError> {
    if reference.shape() != candidate.shape() {
        return Err(PipelineError::shape_mismatch(
            reference.shape(),
            candidate.shape(),
        ));
    }

    let n = reference.len() as f64;
    let mean_ref = reference.mean();
    let mean_cand = candidate.mean();

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (&o, &c) in reference.samples().iter().zip(candidate.samples()) {
        covariance += (c - mean_cand) * (o - mean_ref);
        variance += (c - mean_cand) * (c - mean_cand);
    }
    covariance /= n;
    variance /= n;

    let (slope, intercept) = if variance == 0.0 {
        (1.0, mean_ref - mean_cand)
    } else {
        let slope = covariance / variance;
        (slope, slope.mul_add(-mean_cand, mean_ref))
    };

    let data: Vec<f64> = candidate
        .samples()
        .iter()
        .map(|&c| slope.mul_add(c, intercept))
        .collect();
    ImageMatrix::from_raw(candidate.rows(), candidate.cols(), data)
        .ok_or_else(|| PipelineError::shape_mismatch(reference.shape(), candidate.shape()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize, data: &[f64]) -> ImageMatrix {
        ImageMatrix::from_raw(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn exact_affine_map_is_recovered() {
        let reference = matrix(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // candidate = (reference - 3) / 2, so the fit must find a = 2, b = 3.
        let candidate = matrix(2, 3, &[-1.0, -0.5, 0.0, 0.5, 1.0, 1.5]);
        let scaled = linear_regression(&reference, &candidate).unwrap();
        for (&s, &r) in scaled.samples().iter().zip(reference.samples()) {
            assert!((s - r).abs() < 1e-12, "expected {r}, got {s}");
        }
    }

    #[test]
    fn already_matching_candidate_is_unchanged() {
        let reference = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let scaled = linear_regression(&reference, &reference).unwrap();
        for (&s, &r) in scaled.samples().iter().zip(reference.samples()) {
            assert!((s - r).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_candidate_degrades_to_offset() {
        let reference = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let candidate = ImageMatrix::filled(2, 2, 10.0).unwrap();
        let scaled = linear_regression(&reference, &candidate).unwrap();
        // mean(reference) = 2.5, so every output sample is 2.5.
        assert!(scaled.samples().iter().all(|&v| (v - 2.5).abs() < 1e-12));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let reference = ImageMatrix::filled(2, 2, 0.0).unwrap();
        let candidate = ImageMatrix::filled(2, 3, 0.0).unwrap();
        assert!(matches!(
            linear_regression(&reference, &candidate),
            Err(PipelineError::ShapeMismatch { .. }),
        ));
    }
}
