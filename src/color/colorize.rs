use crate::color::scale::{ColorScale, ScaleSampler};
use crate::extract::frame::NumericFrame;
use crate::foundation::core::Rgb8;

/// Options for [`Colorizer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorizeOpts {
    /// Lookup strategy.
    pub scale: ColorScale,
    /// Reverse every odd row left-to-right before coloring (serpentine scan order).
    pub boustrophedon: bool,
    /// Color painted for missing cells.
    pub missing_rgb: Rgb8,
}

impl Default for ColorizeOpts {
    fn default() -> Self {
        Self {
            scale: ColorScale::Thermal,
            boustrophedon: false,
            missing_rgb: Rgb8::BLACK,
        }
    }
}

/// One colored cell: the source value, its normalized position and its color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCell {
    /// Raw value (NaN when missing).
    pub value: f64,
    /// Normalized position, `None` for missing cells.
    pub t: Option<f64>,
    /// Output color.
    pub rgb: Rgb8,
}

/// Grid of colored cells with the same shape as the source frame.
///
/// Renderers in [`crate::render`] turn this into rasters, HTML or terminal output.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorizedImage {
    width: usize,
    height: usize,
    vmin: f64,
    vmax: f64,
    cells: Vec<ColorCell>,
}

impl ColorizedImage {
    /// Width in cells (frame columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells (frame rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Normalization range shared by every cell.
    pub fn range(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }

    /// Cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ColorCell> {
        if col >= self.width {
            return None;
        }
        let idx = row.checked_mul(self.width)?.checked_add(col)?;
        self.cells.get(idx)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[ColorCell] {
        &self.cells
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[ColorCell]> {
        self.cells.chunks_exact(self.width)
    }
}

/// Map `value` into `[0, 1]` against `[vmin, vmax]`.
///
/// A degenerate or inverted range maps everything to `0`; non-finite input maps to `None`.
pub fn normalize(value: f64, vmin: f64, vmax: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let span = vmax - vmin;
    if !span.is_finite() || span <= 0.0 {
        return Some(0.0);
    }
    Some(((value - vmin) / span).clamp(0.0, 1.0))
}

/// Maps numeric frames onto a color scale.
#[derive(Clone, Debug)]
pub struct Colorizer {
    sampler: ScaleSampler,
    boustrophedon: bool,
    missing_rgb: Rgb8,
}

impl Colorizer {
    /// Colorizer with default options for `scale`.
    pub fn new(scale: ColorScale) -> Self {
        Self::with_opts(&ColorizeOpts {
            scale,
            ..Default::default()
        })
    }

    /// Colorizer from explicit options.
    pub fn with_opts(opts: &ColorizeOpts) -> Self {
        Self {
            sampler: opts.scale.sampler(),
            boustrophedon: opts.boustrophedon,
            missing_rgb: opts.missing_rgb,
        }
    }

    /// Color for a single value against an explicit range.
    pub fn color_at(&self, value: f64, vmin: f64, vmax: f64) -> Rgb8 {
        match normalize(value, vmin, vmax) {
            Some(t) => self.sampler.sample_rgb8(t),
            None => self.missing_rgb,
        }
    }

    /// Normalize `frame` against its global finite min/max and color every cell.
    pub fn colorize(&self, frame: &NumericFrame) -> ColorizedImage {
        let (vmin, vmax) = frame.value_range().unwrap_or((0.0, 0.0));
        let width = frame.cols();

        let mut cells = Vec::with_capacity(frame.values().len());
        for (r, row) in frame.iter_rows().enumerate() {
            let reversed = self.boustrophedon && !r.is_multiple_of(2);
            let mut push = |value: f64| {
                let t = normalize(value, vmin, vmax);
                let rgb = match t {
                    Some(t) => self.sampler.sample_rgb8(t),
                    None => self.missing_rgb,
                };
                cells.push(ColorCell { value, t, rgb });
            };
            if reversed {
                row.iter().rev().copied().for_each(&mut push);
            } else {
                row.iter().copied().for_each(&mut push);
            }
        }

        ColorizedImage {
            width,
            height: frame.rows(),
            vmin,
            vmax,
            cells,
        }
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new(ColorScale::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/colorize.rs"]
mod tests;
