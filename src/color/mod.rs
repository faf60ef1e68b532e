//! Value normalization and color lookup.

/// Continuous colormaps.
pub mod colormap;
/// Frame colorization.
pub mod colorize;
/// Piecewise-linear gradients.
pub mod gradient;
/// Scale selection and config representation.
pub mod scale;
