//! Output layers over [`crate::ColorizedImage`]: raster, HTML and terminal.

/// 24-bit terminal blocks.
pub mod ansi;
/// HTML table preview.
pub mod html;
/// RGB rasters, resampling and PNG output.
pub mod raster;
