//! imgcmp-io: filesystem boundary for the imgcmp comparison tool.
//!
//! Everything that touches disk lives here: decoding image files into
//! the pipeline's `f64` matrices, parsing region-of-interest
//! specifications (rectangle strings and pixel-list files), writing the
//! persisted batch report, and rendering the side-by-side orientation
//! check image. The pipeline crate itself stays sans-IO.

pub mod check;
pub mod raster;
pub mod report;
pub mod roi;

pub use check::write_check_image;
pub use raster::read_image;
pub use report::{ReportEntry, default_report_path, render_report, write_report};
pub use roi::parse_region;
