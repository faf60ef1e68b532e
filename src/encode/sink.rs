use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ThermaError, ThermaResult};
use crate::render::raster::RgbFrame;

/// Video parameters fixed when a sink is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback rate.
    pub fps: Fps,
}

/// Destination for assembled frames.
///
/// A run is one `begin`, then `push_frame` with indices `0, 1, 2, ...`, then one `end`.
/// Every frame matches the size given to `begin`.
pub trait FrameSink {
    /// Start a run.
    fn begin(&mut self, cfg: SinkConfig) -> ThermaResult<()>;
    /// Accept the next frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbFrame) -> ThermaResult<()>;
    /// Finish the run and flush any output.
    fn end(&mut self) -> ThermaResult<()>;
}

/// Sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbFrame)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty, unstarted sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration of the current or last run.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames received so far, in push order.
    pub fn frames(&self) -> &[(FrameIndex, RgbFrame)] {
        &self.frames
    }

    /// Whether the last run was ended.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ThermaResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbFrame) -> ThermaResult<()> {
        let Some(cfg) = self.cfg.filter(|_| !self.ended) else {
            return Err(ThermaError::encode("in-memory sink is not accepting frames"));
        };
        let expected = self.frames.len() as u64;
        if idx.0 != expected {
            return Err(ThermaError::encode(format!(
                "expected frame {expected}, got {}",
                idx.0
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(ThermaError::validation(format!(
                "frame is {}x{}, sink was started at {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ThermaResult<()> {
        if self.cfg.is_none() {
            return Err(ThermaError::encode("in-memory sink ended before it began"));
        }
        self.ended = true;
        Ok(())
    }
}
