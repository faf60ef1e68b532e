use crate::color::colorize::ColorizedImage;
use crate::foundation::core::Resolution;
use crate::foundation::error::{ThermaError, ThermaResult};
use image::RgbImage;
use image::imageops::FilterType;
use std::path::Path;

/// A video frame as tightly packed, row-major RGB8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl RgbFrame {
    /// Take ownership of an `image` buffer.
    pub fn from_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Output resolution of this frame.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }
}

/// Resampling filter used when scaling a colorized grid to the output resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Box filter weighting every source pixel by its area of overlap.
    #[default]
    Area,
    /// Nearest neighbor.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic.
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

/// One pixel per cell.
pub fn to_rgb_image(img: &ColorizedImage) -> ThermaResult<RgbImage> {
    let width = u32::try_from(img.width())
        .map_err(|_| ThermaError::validation("colorized image is too wide"))?;
    let height = u32::try_from(img.height())
        .map_err(|_| ThermaError::validation("colorized image is too tall"))?;
    let data: Vec<u8> = img.cells().iter().flat_map(|c| c.rgb.to_array()).collect();
    RgbImage::from_raw(width, height, data)
        .ok_or_else(|| ThermaError::validation("colorized cell count does not match its shape"))
}

/// Scale `src` to `width x height`.
pub fn resample(src: &RgbImage, width: u32, height: u32, filter: ResizeFilter) -> RgbImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    match filter {
        ResizeFilter::Area => resample_area(src, width, height),
        ResizeFilter::Nearest => image::imageops::resize(src, width, height, FilterType::Nearest),
        ResizeFilter::Triangle => {
            image::imageops::resize(src, width, height, FilterType::Triangle)
        }
        ResizeFilter::CatmullRom => {
            image::imageops::resize(src, width, height, FilterType::CatmullRom)
        }
        ResizeFilter::Lanczos3 => {
            image::imageops::resize(src, width, height, FilterType::Lanczos3)
        }
    }
}

/// Colorize-to-pixels helper: grid to raster, then scale to `res`.
pub fn render_frame(
    img: &ColorizedImage,
    res: Resolution,
    filter: ResizeFilter,
) -> ThermaResult<RgbFrame> {
    let raster = to_rgb_image(img)?;
    Ok(RgbFrame::from_image(resample(
        &raster, res.width, res.height, filter,
    )))
}

/// Write `img` as a PNG, creating parent directories.
pub fn save_png(img: &RgbImage, path: &Path) -> ThermaResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ThermaError::encode(format!("write png '{}': {e}", path.display())))
}

// Per output index, the contributing source indices and their normalized coverage.
fn area_weights(src: u32, dst: u32) -> Vec<Vec<(usize, f64)>> {
    let scale = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|o| {
            let start = f64::from(o) * scale;
            let end = f64::from(o + 1) * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src as usize);
            (first..last)
                .filter_map(|i| {
                    let overlap = end.min((i + 1) as f64) - start.max(i as f64);
                    (overlap > 1e-12).then_some((i, overlap / scale))
                })
                .collect()
        })
        .collect()
}

fn resample_area(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (sw, sh) = src.dimensions();
    let xw = area_weights(sw, width);
    let yw = area_weights(sh, height);
    let raw = src.as_raw();
    let sw = sw as usize;

    // Horizontal pass into f64 rows, then vertical pass into the output.
    let mut rows = vec![0.0f64; sh as usize * width as usize * 3];
    for y in 0..sh as usize {
        for (ox, weights) in xw.iter().enumerate() {
            let dst = (y * width as usize + ox) * 3;
            for &(sx, w) in weights {
                let s = (y * sw + sx) * 3;
                for c in 0..3 {
                    rows[dst + c] += f64::from(raw[s + c]) * w;
                }
            }
        }
    }

    let mut out = vec![0u8; width as usize * height as usize * 3];
    for (oy, weights) in yw.iter().enumerate() {
        for ox in 0..width as usize {
            let mut acc = [0.0f64; 3];
            for &(sy, w) in weights {
                let s = (sy * width as usize + ox) * 3;
                for c in 0..3 {
                    acc[c] += rows[s + c] * w;
                }
            }
            let d = (oy * width as usize + ox) * 3;
            for c in 0..3 {
                out[d + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    RgbImage::from_raw(width, height, out).unwrap_or_else(|| RgbImage::new(width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
