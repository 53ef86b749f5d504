//! The four figures of merit: SNR, PSNR, RMSE, MAE.
//!
//! All four functions are pure and assume the two matrices have equal
//! shape — the pipeline checks this once before calling any of them
//! (they `debug_assert` it). Sums run over every sample pair in `f64`
//! and divide only at the end, matching the reference accumulation
//! order.
//!
//! # Zero-denominator policy
//!
//! When the images are identical over the compared region, the error
//! energy is exactly zero and the SNR/PSNR ratios are undefined. Both
//! functions return `+∞` in that case ("perfect match") instead of
//! erroring; RMSE and MAE are then `0`. The policy is uniform across
//! all four metrics.

use crate::types::{ImageMatrix, MetricResult};

/// Sum of squared differences between the two sample buffers.
fn error_energy(oracle: &ImageMatrix, image: &ImageMatrix) -> f64 {
    oracle
        .samples()
        .iter()
        .zip(image.samples())
        .map(|(&o, &i)| (o - i) * (o - i))
        .sum()
}

/// Signal-to-noise ratio in dB:
/// `10 · log10( Σ o² / Σ (o − i)² )`.
///
/// Returns `+∞` for identical images.
#[must_use]
pub fn snr(oracle: &ImageMatrix, image: &ImageMatrix) -> f64 {
    debug_assert_eq!(oracle.shape(), image.shape());
    let signal: f64 = oracle.samples().iter().map(|&o| o * o).sum();
    let noise = error_energy(oracle, image);
    if noise == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (signal / noise).log10()
}

/// Peak signal-to-noise ratio in dB:
/// `10 · log10( max(o)² / ( Σ (o − i)² / (rows·cols) ) )`.
///
/// Returns `+∞` for identical images.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn psnr(oracle: &ImageMatrix, image: &ImageMatrix) -> f64 {
    debug_assert_eq!(oracle.shape(), image.shape());
    let noise = error_energy(oracle, image);
    if noise == 0.0 {
        return f64::INFINITY;
    }
    let peak = oracle.max_sample();
    let mean_noise = noise / oracle.len() as f64;
    10.0 * (peak * peak / mean_noise).log10()
}

/// Root-mean-square error:
/// `sqrt( Σ (o − i)² / (rows·cols) )`.
///
/// Always finite and non-negative; zero iff the images are identical.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn rmse(oracle: &ImageMatrix, image: &ImageMatrix) -> f64 {
    debug_assert_eq!(oracle.shape(), image.shape());
    (error_energy(oracle, image) / oracle.len() as f64).sqrt()
}

/// Mean absolute error:
/// `Σ |o − i| / (rows·cols)`.
///
/// Always finite and non-negative; zero iff the images are identical.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn mae(oracle: &ImageMatrix, image: &ImageMatrix) -> f64 {
    debug_assert_eq!(oracle.shape(), image.shape());
    let total: f64 = oracle
        .samples()
        .iter()
        .zip(image.samples())
        .map(|(&o, &i)| (o - i).abs())
        .sum();
    total / oracle.len() as f64
}

/// Compute all four figures of merit for one pair.
#[must_use]
pub fn all(oracle: &ImageMatrix, image: &ImageMatrix) -> MetricResult {
    MetricResult {
        snr: snr(oracle, image),
        psnr: psnr(oracle, image),
        rmse: rmse(oracle, image),
        mae: mae(oracle, image),
    }
}
