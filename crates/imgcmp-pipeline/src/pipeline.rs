//! The comparison pipeline: optional transforms applied in a fixed
//! order to a (reference, candidate) pair, then the shape check, then
//! the metric formulas.
//!
//! Stage order is load-bearing: scaling and registration work on the
//! full frames, cropping changes the compared region, and the gradient
//! runs last so that enabling it turns every preceding choice into an
//! edge-map comparison. Each stage is gated by one [`PipelineConfig`]
//! flag and there are no implicit dependencies between stages beyond
//! the order itself.

use crate::types::{ImageMatrix, MetricResult, PipelineConfig, PipelineError};
use crate::{gradient, metrics, region, register, resolution, scale};

/// A (reference, candidate) pair after all configured transforms, with
/// equal shapes guaranteed.
#[derive(Debug, Clone)]
pub struct PreparedPair {
    /// The transformed reference (oracle) image.
    pub reference: ImageMatrix,
    /// The transformed candidate image.
    pub candidate: ImageMatrix,
}

impl PreparedPair {
    /// Compute the four figures of merit for this pair.
    #[must_use]
    pub fn metrics(&self) -> MetricResult {
        metrics::all(&self.reference, &self.candidate)
    }
}

/// Apply the configured transform sequence to a pair and check shapes.
///
/// Stages, in order, each optional:
///
/// 1. intensity scaling — replaces the candidate
/// 2. SSD registration — replaces the candidate
/// 3. resolution-square crop — each image independently
/// 4. ROI crop (rectangle or pixel list) — each image independently
/// 5. gradient transform — each image independently
///
/// # Errors
///
/// Propagates stage errors ([`PipelineError::InvalidRegion`],
/// [`PipelineError::Reshape`], [`PipelineError::ImageTooSmall`]) and
/// returns [`PipelineError::ShapeMismatch`] if the transformed images
/// disagree in shape. All of these are fatal for the current candidate
/// only; batch drivers record them and continue.
pub fn prepare(
    reference: ImageMatrix,
    candidate: ImageMatrix,
    config: &PipelineConfig,
) -> Result<PreparedPair, PipelineError> {
    let mut reference = reference;
    let mut candidate = candidate;

    // 1. Fit candidate intensities to the reference.
    if config.scaling {
        candidate = scale::linear_regression(&reference, &candidate)?;
    }

    // 2. Align the candidate to the reference.
    if config.registration {
        candidate = register::register(&candidate, &reference)?;
    }

    // 3. Restrict both images to the resolution square.
    if config.resolution_circle {
        reference = resolution::select_square(&reference)?;
        candidate = resolution::select_square(&candidate)?;
    }

    // 4. Crop the region of interest out of both images.
    if let Some(ref spec) = config.roi {
        reference = region::apply(&reference, spec)?;
        candidate = region::apply(&candidate, spec)?;
    }

    // 5. Turn both images into gradient-magnitude maps.
    if config.gradient {
        reference = gradient::magnitude(&reference)?;
        candidate = gradient::magnitude(&candidate)?;
    }

    if reference.shape() != candidate.shape() {
        return Err(PipelineError::shape_mismatch(
            reference.shape(),
            candidate.shape(),
        ));
    }

    Ok(PreparedPair {
        reference,
        candidate,
    })
}

/// Run the full pipeline on one pair: transforms, shape check, metrics.
///
/// # Errors
///
/// Same failure modes as [`prepare`].
pub fn compare(
    reference: ImageMatrix,
    candidate: ImageMatrix,
    config: &PipelineConfig,
) -> Result<MetricResult, PipelineError> {
    Ok(prepare(reference, candidate, config)?.metrics())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::RegionSpec;

    fn ramp(rows: usize, cols: usize) -> ImageMatrix {
        #[allow(clippy::cast_precision_loss)]
        let data: Vec<f64> = (0..rows * cols).map(|i| i as f64).collect();
        ImageMatrix::from_raw(rows, cols, data).unwrap()
    }

    #[test]
    fn default_config_compares_raw_intensities() {
        let reference = ImageMatrix::from_raw(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let candidate = ImageMatrix::from_raw(2, 2, vec![1.0, 2.0, 3.0, 5.0]).unwrap();
        let result = compare(reference, candidate, &PipelineConfig::default()).unwrap();
        assert!((result.mae - 0.25).abs() < 1e-12);
        assert!((result.rmse - 0.5).abs() < 1e-12);
    }

    #[test]
    fn input_shape_mismatch_is_reported_not_a_crash() {
        let reference = ImageMatrix::filled(10, 10, 1.0).unwrap();
        let candidate = ImageMatrix::filled(10, 8, 1.0).unwrap();
        let result = compare(reference, candidate, &PipelineConfig::default());
        assert!(matches!(
            result,
            Err(PipelineError::ShapeMismatch {
                reference_rows: 10,
                reference_cols: 10,
                candidate_rows: 10,
                candidate_cols: 8,
            }),
        ));
    }

    #[test]
    fn roi_crop_applies_to_both_images() {
        let config = PipelineConfig {
            roi: Some(RegionSpec::Rectangle {
                p0: (0, 0),
                p1: (1, 1),
            }),
            ..PipelineConfig::default()
        };
        let pair = prepare(ramp(4, 4), ramp(4, 4), &config).unwrap();
        assert_eq!(pair.reference.shape(), (2, 2));
        assert_eq!(pair.candidate.shape(), (2, 2));
        assert_eq!(pair.reference, pair.candidate);
    }

    #[test]
    fn gradient_runs_after_the_roi_crop() {
        // A 2x2 ROI is still large enough for the gradient, while the
        // reverse order would compute gradients on the full frame and
        // give different samples. Constant ROI → zero gradient.
        let config = PipelineConfig {
            roi: Some(RegionSpec::Rectangle {
                p0: (0, 0),
                p1: (1, 1),
            }),
            gradient: true,
            ..PipelineConfig::default()
        };
        let reference = ImageMatrix::filled(4, 4, 5.0).unwrap();
        let candidate = ImageMatrix::filled(4, 4, 9.0).unwrap();
        let result = compare(reference, candidate, &config).unwrap();
        // Both gradient maps are identically zero.
        assert!((result.rmse).abs() < 1e-12);
        assert_eq!(result.snr, f64::INFINITY);
    }

    #[test]
    fn scaling_makes_affine_candidates_perfect() {
        let config = PipelineConfig {
            scaling: true,
            ..PipelineConfig::default()
        };
        let reference = ramp(3, 3);
        let candidate = {
            let data: Vec<f64> = reference.samples().iter().map(|&v| 3.0 * v - 7.0).collect();
            ImageMatrix::from_raw(3, 3, data).unwrap()
        };
        let result = compare(reference, candidate, &config).unwrap();
        assert!(result.rmse < 1e-9);
        assert_eq!(result.snr, f64::INFINITY);
    }

    #[test]
    fn registration_recovers_a_translated_candidate() {
        let mut data = vec![0.0; 16 * 16];
        for dr in 0..4 {
            for dc in 0..4 {
                data[(6 + dr) * 16 + 6 + dc] = 50.0;
            }
        }
        let reference = ImageMatrix::from_raw(16, 16, data).unwrap();
        let candidate = register::translate(&reference, 2, -1);

        let unregistered = compare(
            reference.clone(),
            candidate.clone(),
            &PipelineConfig::default(),
        )
        .unwrap();
        let registered = compare(
            reference,
            candidate,
            &PipelineConfig {
                registration: true,
                ..PipelineConfig::default()
            },
        )
        .unwrap();
        assert!(registered.rmse < unregistered.rmse);
    }

    #[test]
    fn resolution_circle_crops_both_images() {
        let config = PipelineConfig {
            resolution_circle: true,
            ..PipelineConfig::default()
        };
        let pair = prepare(ramp(10, 10), ramp(10, 10), &config).unwrap();
        assert_eq!(pair.reference.shape(), (7, 7));
        assert_eq!(pair.candidate.shape(), (7, 7));
    }

    #[test]
    fn pixel_list_roi_feeds_the_metrics() {
        let config = PipelineConfig {
            roi: Some(RegionSpec::PixelList(vec![
                (0, 0),
                (1, 1),
                (2, 2),
                (3, 3),
            ])),
            ..PipelineConfig::default()
        };
        let reference = ramp(4, 4);
        let candidate = {
            let mut data = reference.samples().to_vec();
            data[5] += 2.0; // sample (1, 1), part of the list
            ImageMatrix::from_raw(4, 4, data).unwrap()
        };
        let result = compare(reference, candidate, &config).unwrap();
        // One of four listed samples differs by 2.
        assert!((result.mae - 0.5).abs() < 1e-12);
        assert!((result.rmse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_roi_is_fatal_for_the_pair() {
        let config = PipelineConfig {
            roi: Some(RegionSpec::Rectangle {
                p0: (0, 0),
                p1: (9, 9),
            }),
            ..PipelineConfig::default()
        };
        let result = compare(ramp(4, 4), ramp(4, 4), &config);
        assert!(matches!(result, Err(PipelineError::InvalidRegion(_))));
    }

    #[test]
    fn prepared_pair_metrics_match_compare() {
        let config = PipelineConfig {
            gradient: true,
            ..PipelineConfig::default()
        };
        let pair = prepare(ramp(4, 4), ramp(4, 4), &config).unwrap();
        let direct = compare(ramp(4, 4), ramp(4, 4), &config).unwrap();
        assert_eq!(pair.metrics(), direct);
    }
}
