use crate::color::colorize::ColorizeOpts;
use crate::color::scale::ColorScale;
use crate::extract::parser::{DEFAULT_EXPECTED_COLS, ExtractOpts, IMAGE_DATA_MARKER, RowWidthPolicy};
use crate::foundation::core::{Fps, Resolution, Rgb8};
use crate::foundation::error::{ThermaError, ThermaResult};
use crate::render::raster::ResizeFilter;
use std::path::Path;

/// Default output edge length in pixels.
pub const DEFAULT_FRAME_SIZE: u32 = 400;
/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 10;

/// Everything that controls one video assembly.
///
/// Every field has a default, so a config file only needs the keys it overrides:
///
/// ```json
/// { "expected_cols": 32, "policy": "pad_missing", "scale": "plasma", "fps": 5 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssembleOpts {
    /// Frame width for the fixed-width policies.
    pub expected_cols: usize,
    /// Row width policy.
    pub policy: RowWidthPolicy,
    /// Substring that starts the data section of each file.
    pub marker: String,
    /// Color lookup.
    pub scale: ColorScale,
    /// Reverse odd rows before coloring.
    pub boustrophedon: bool,
    /// Color for missing cells.
    pub missing_rgb: Rgb8,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Resampling filter.
    pub filter: ResizeFilter,
    /// Output frames per second.
    pub fps: u32,
    /// Extract and colorize files on a rayon pool.
    pub parallel: bool,
    /// Override rayon worker threads (parallel mode only).
    pub threads: Option<usize>,
    /// Files prepared per parallel batch.
    pub chunk_size: usize,
    /// Source file extension, compared case-insensitively.
    pub extension: String,
}

impl Default for AssembleOpts {
    fn default() -> Self {
        Self {
            expected_cols: DEFAULT_EXPECTED_COLS,
            policy: RowWidthPolicy::Truncate,
            marker: IMAGE_DATA_MARKER.to_owned(),
            scale: ColorScale::Thermal,
            boustrophedon: false,
            missing_rgb: Rgb8::BLACK,
            width: DEFAULT_FRAME_SIZE,
            height: DEFAULT_FRAME_SIZE,
            filter: ResizeFilter::Area,
            fps: DEFAULT_FPS,
            parallel: false,
            threads: None,
            chunk_size: 64,
            extension: "csv".to_owned(),
        }
    }
}

impl AssembleOpts {
    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> ThermaResult<Self> {
        use anyhow::Context as _;
        let f = std::fs::File::open(path).map_err(|e| ThermaError::io(path, e))?;
        let opts: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse assemble config '{}'", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check option consistency.
    pub fn validate(&self) -> ThermaResult<()> {
        self.extract_opts().validate()?;
        self.resolution()?;
        self.fps()?;
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ThermaError::validation("'threads' must be >= 1 when set"));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ThermaError::validation("source extension must not be empty"));
        }
        Ok(())
    }

    /// Extraction options derived from these options.
    pub fn extract_opts(&self) -> ExtractOpts {
        ExtractOpts {
            expected_cols: self.expected_cols,
            policy: self.policy,
            marker: self.marker.clone(),
        }
    }

    /// Colorization options derived from these options.
    pub fn colorize_opts(&self) -> ColorizeOpts {
        ColorizeOpts {
            scale: self.scale.clone(),
            boustrophedon: self.boustrophedon,
            missing_rgb: self.missing_rgb,
        }
    }

    /// Output resolution.
    pub fn resolution(&self) -> ThermaResult<Resolution> {
        Resolution::new(self.width, self.height)
    }

    /// Output frame rate.
    pub fn fps(&self) -> ThermaResult<Fps> {
        Fps::whole(self.fps)
    }
}
