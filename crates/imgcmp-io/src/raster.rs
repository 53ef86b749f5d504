//! Raster image loading.
//!
//! Reads an image file, decodes it with the `image` crate and converts
//! it to a single-channel `f64` matrix for the comparison pipeline.
//! Whatever the enabled decoders accept (PNG, JPEG, BMP, TIFF) works;
//! color images are collapsed to luminance first.
//!
//! Samples are the decoder's `f32` luma values widened to `f64`. The
//! absolute scale is irrelevant to the pipeline as long as both images
//! of a pair go through the same conversion.

use std::path::{Path, PathBuf};

use imgcmp_pipeline::ImageMatrix;

/// Errors that can occur while loading an image file.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file contents could not be decoded as an image.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The offending path.
        path: PathBuf,
        /// The underlying decoder error.
        source: image::ImageError,
    },

    /// The decoded image has a zero dimension.
    #[error("image {path} has a zero dimension")]
    EmptyImage {
        /// The offending path.
        path: PathBuf,
    },
}

/// Read and decode an image file into an [`ImageMatrix`].
///
/// # Errors
///
/// Returns [`RasterError::Read`] when the file cannot be read,
/// [`RasterError::Decode`] when it is not a decodable image, and
/// [`RasterError::EmptyImage`] for zero-sized images.
pub fn read_image(path: &Path) -> Result<ImageMatrix, RasterError> {
    let bytes = std::fs::read(path).map_err(|source| RasterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| RasterError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let luma = decoded.to_luma32f();
    let (width, height) = luma.dimensions();
    let data: Vec<f64> = luma.into_raw().into_iter().map(f64::from).collect();
    ImageMatrix::from_raw(height as usize, width as usize, data).ok_or(RasterError::EmptyImage {
        path: path.to_path_buf(),
    })
}
