//! Region-of-interest specification parsing.
//!
//! Two syntaxes, matching the reference tool:
//!
//! - `x0:y0,x1:y1` — a rectangle given by two corners. The input is in
//!   display coordinates where `x` is the **column** and `y` the
//!   **row**; parsing swaps to the pipeline's `(row, col)` convention.
//!   This swap is a documented convention of the original tool and must
//!   not be "fixed".
//! - anything else — a path to a pixel-list file with one `(row, col)`
//!   pair per non-empty line, as produced by Fiji's "Get Roi Pixels"
//!   plugin. Integer-valued floats are accepted.

use std::path::{Path, PathBuf};

use imgcmp_pipeline::RegionSpec;

/// Errors that can occur while parsing an ROI specification.
#[derive(Debug, thiserror::Error)]
pub enum RoiError {
    /// The rectangle string does not match `x0:y0,x1:y1`.
    #[error("invalid ROI rectangle '{spec}': {reason}")]
    Syntax {
        /// The offending specification string.
        spec: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The pixel-list file could not be read.
    #[error("failed to read pixel list {path}: {source}")]
    Read {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A pixel-list line is not a pair of non-negative integers.
    #[error("{path}:{line_number}: invalid pixel entry '{content}'")]
    Line {
        /// The offending file.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// The offending line.
        content: String,
    },
}

/// Resolve an ROI argument into a [`RegionSpec`].
///
/// A string containing a comma is parsed as a rectangle; anything else
/// is treated as a pixel-list file path.
///
/// # Errors
///
/// Propagates [`parse_rectangle`] and [`read_pixel_list`] errors.
pub fn parse_region(spec: &str) -> Result<RegionSpec, RoiError> {
    if spec.contains(',') {
        parse_rectangle(spec)
    } else {
        read_pixel_list(Path::new(spec))
    }
}

/// Parse a rectangle specification `x0:y0,x1:y1`.
///
/// # Errors
///
/// Returns [`RoiError::Syntax`] on any malformed component.
pub fn parse_rectangle(spec: &str) -> Result<RegionSpec, RoiError> {
    let syntax = |reason: String| RoiError::Syntax {
        spec: spec.to_owned(),
        reason,
    };

    let (first, second) = spec
        .split_once(',')
        .ok_or_else(|| syntax("expected two corners separated by ','".to_owned()))?;

    let mut corners = [(0, 0); 2];
    for (slot, corner) in corners.iter_mut().zip([first, second]) {
        let (x, y) = corner
            .trim()
            .split_once(':')
            .ok_or_else(|| syntax(format!("corner '{corner}' is not 'x:y'")))?;
        let col: usize = x
            .trim()
            .parse()
            .map_err(|e| syntax(format!("invalid x coordinate '{x}': {e}")))?;
        let row: usize = y
            .trim()
            .parse()
            .map_err(|e| syntax(format!("invalid y coordinate '{y}': {e}")))?;
        // Input is column:row; the pipeline wants (row, col).
        *slot = (row, col);
    }

    Ok(RegionSpec::Rectangle {
        p0: corners[0],
        p1: corners[1],
    })
}

/// Read a pixel-list file: one `row col` pair per non-empty line.
///
/// # Errors
///
/// Returns [`RoiError::Read`] when the file cannot be read and
/// [`RoiError::Line`] for lines that are not a pair of non-negative
/// integer values.
pub fn read_pixel_list(path: &Path) -> Result<RegionSpec, RoiError> {
    let content = std::fs::read_to_string(path).map_err(|source| RoiError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut pixels = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let bad_line = || RoiError::Line {
            path: path.to_path_buf(),
            line_number: index + 1,
            content: line.to_owned(),
        };

        let mut fields = trimmed.split_whitespace();
        let row = parse_index(fields.next().ok_or_else(bad_line)?).ok_or_else(bad_line)?;
        let col = parse_index(fields.next().ok_or_else(bad_line)?).ok_or_else(bad_line)?;
        if fields.next().is_some() {
            return Err(bad_line());
        }
        pixels.push((row, col));
    }

    Ok(RegionSpec::PixelList(pixels))
}

/// Parse one coordinate field: a non-negative integer, possibly written
/// as a float (`12.0`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_index(field: &str) -> Option<usize> {
    let value: f64 = field.parse().ok()?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX.into() {
        return None;
    }
    Some(value as usize)
}
