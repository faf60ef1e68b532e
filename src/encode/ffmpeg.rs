use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ThermaError, ThermaResult};
use crate::render::raster::RgbFrame;
use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Overwriting output to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that pipes raw RGB24 frames into a system `ffmpeg` producing H.264 MP4.
///
/// Dropping a sink that was started but never ended kills the encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

// A running ffmpeg process; stderr is drained on its own thread so a chatty encoder never
// blocks on a full pipe while we are writing frames.
struct Encoder {
    cfg: SinkConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    next_idx: u64,
}

impl FfmpegSink {
    /// Sink that will write to `opts.out_path` once started.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }

    /// Output path this sink writes to.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ThermaResult<()> {
        if self.encoder.is_some() {
            return Err(ThermaError::encode("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ThermaError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ThermaError::validation("video width/height must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2.
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ThermaError::validation(format!(
                "video size {}x{} must be even in both dimensions",
                cfg.width, cfg.height
            )));
        }

        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(ThermaError::validation(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ThermaError::encode(
                "ffmpeg was not found on PATH; it is required for MP4 output",
            ));
        }

        tracing::debug!(out = %out.display(), ?cfg, "starting ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(cfg, out, self.opts.overwrite))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ThermaError::encode(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        if stdin.is_none() || stderr.is_none() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ThermaError::encode("ffmpeg pipes were not available"));
        }

        self.encoder = Some(Encoder {
            cfg,
            child,
            stdin,
            stderr,
            next_idx: 0,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbFrame) -> ThermaResult<()> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| ThermaError::encode("ffmpeg sink not started"))?;
        if idx.0 < enc.next_idx {
            return Err(ThermaError::encode(format!(
                "frame {} pushed after frame {}",
                idx.0,
                enc.next_idx - 1
            )));
        }
        if frame.width != enc.cfg.width
            || frame.height != enc.cfg.height
            || frame.data.len() != frame.resolution().rgb_len()
        {
            return Err(ThermaError::validation(format!(
                "frame is {}x{} with {} bytes, sink expects {}x{} rgb24",
                frame.width,
                frame.height,
                frame.data.len(),
                enc.cfg.width,
                enc.cfg.height
            )));
        }

        let stdin = enc
            .stdin
            .as_mut()
            .ok_or_else(|| ThermaError::encode("ffmpeg stdin already closed"))?;
        stdin
            .write_all(&frame.data)
            .map_err(|e| ThermaError::encode(format!("write frame {} to ffmpeg: {e}", idx.0)))?;
        enc.next_idx = idx.0 + 1;
        Ok(())
    }

    fn end(&mut self) -> ThermaResult<()> {
        let mut enc = self
            .encoder
            .take()
            .ok_or_else(|| ThermaError::encode("ffmpeg sink not started"))?;
        drop(enc.stdin.take());

        let status = enc
            .child
            .wait()
            .map_err(|e| ThermaError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = match enc.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ThermaError::encode("ffmpeg stderr reader panicked"))?
                .map_err(|e| ThermaError::encode(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(ThermaError::encode(format!(
                "ffmpeg failed ({status}): {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        tracing::debug!(frames = enc.next_idx, "ffmpeg finished");
        Ok(())
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Command line for rawvideo rgb24 on stdin to H.264/yuv420p MP4 at `out`.
fn ffmpeg_args(cfg: SinkConfig, out: &Path, overwrite: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        if overwrite { "-y" } else { "-n" },
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    // `-r` ahead of `-i` is the input rate for rawvideo.
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    for a in [
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ] {
        args.push(a.into());
    }
    args.push(out.as_os_str().to_owned());
    args
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> ThermaResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| ThermaError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Whether `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
