use crate::assemble::opts::AssembleOpts;
use crate::assemble::sources::sort_sources;
use crate::color::colorize::Colorizer;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::extract::parser::{ExtractOpts, extract_path, extract_with};
use crate::foundation::core::{FrameIndex, Resolution};
use crate::foundation::error::{ThermaError, ThermaResult};
use crate::render::raster::{ResizeFilter, RgbFrame, render_frame};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// What happened to one source file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file became frame `frame_index` of the video.
    Written {
        /// 0-based position in the output.
        frame_index: u64,
    },
    /// The file was skipped.
    Skipped {
        /// Human-readable cause.
        reason: String,
    },
}

/// Outcome for one source, in processing order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FileRecord {
    /// Source path.
    pub path: PathBuf,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of one assembly.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AssemblyReport {
    /// Frames pushed to the sink.
    pub frames_written: u64,
    /// Sources that produced no frame.
    pub frames_skipped: u64,
    /// Per-file outcomes in sorted order.
    pub files: Vec<FileRecord>,
}

impl AssemblyReport {
    /// Records of skipped files.
    pub fn skipped(&self) -> impl Iterator<Item = &FileRecord> {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped { .. }))
    }
}

/// Per-file stage: extract, colorize and resample to the output resolution.
///
/// Holds no mutable state, so one pipeline can serve many worker threads.
#[derive(Clone, Debug)]
pub struct FramePipeline {
    extract: ExtractOpts,
    colorizer: Colorizer,
    resolution: Resolution,
    filter: ResizeFilter,
}

impl FramePipeline {
    /// Build the pipeline described by `opts`.
    pub fn new(opts: &AssembleOpts) -> ThermaResult<Self> {
        opts.validate()?;
        Ok(Self {
            extract: opts.extract_opts(),
            colorizer: Colorizer::with_opts(&opts.colorize_opts()),
            resolution: opts.resolution()?,
            filter: opts.filter,
        })
    }

    /// Output resolution of every frame.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Turn one source file into a video frame.
    pub fn prepare_path(&self, path: &Path) -> ThermaResult<RgbFrame> {
        let frame = extract_path(path, &self.extract)?;
        let img = self.colorizer.colorize(&frame);
        render_frame(&img, self.resolution, self.filter)
    }

    /// Turn in-memory source text into a video frame.
    pub fn prepare_text(&self, text: &str) -> ThermaResult<RgbFrame> {
        let frame = extract_with(text, &self.extract)?;
        let img = self.colorizer.colorize(&frame);
        render_frame(&img, self.resolution, self.filter)
    }
}

/// Assemble `sources` into `sink`, one frame per file in file-name order.
///
/// Files that fail to parse are skipped and recorded; they never abort the run. The sink is
/// started with the first good frame, so a run where every file is skipped leaves the sink
/// untouched and fails with [`ThermaError::EmptySequence`].
#[tracing::instrument(skip_all, fields(sources = sources.len(), parallel = opts.parallel))]
pub fn assemble_video(
    sources: &[PathBuf],
    opts: &AssembleOpts,
    sink: &mut dyn FrameSink,
) -> ThermaResult<AssemblyReport> {
    let pipeline = FramePipeline::new(opts)?;
    let res = pipeline.resolution();
    let cfg = SinkConfig {
        width: res.width,
        height: res.height,
        fps: opts.fps()?,
    };

    let mut ordered = sources.to_vec();
    sort_sources(&mut ordered);

    let mut emitter = Emitter {
        sink,
        cfg,
        started: false,
        report: AssemblyReport::default(),
    };

    if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        for chunk in ordered.chunks(opts.chunk_size.max(1)) {
            let frames: Vec<ThermaResult<RgbFrame>> =
                pool.install(|| chunk.par_iter().map(|p| pipeline.prepare_path(p)).collect());
            for (path, frame) in chunk.iter().zip(frames) {
                emitter.accept(path, frame)?;
            }
        }
    } else {
        for path in &ordered {
            let frame = pipeline.prepare_path(path);
            emitter.accept(path, frame)?;
        }
    }

    emitter.finish(ordered.len())
}

struct Emitter<'a> {
    sink: &'a mut dyn FrameSink,
    cfg: SinkConfig,
    started: bool,
    report: AssemblyReport,
}

impl Emitter<'_> {
    fn accept(&mut self, path: &Path, frame: ThermaResult<RgbFrame>) -> ThermaResult<()> {
        match frame {
            Ok(frame) => {
                if !self.started {
                    self.sink.begin(self.cfg)?;
                    self.started = true;
                }
                let idx = FrameIndex(self.report.frames_written);
                self.sink.push_frame(idx, &frame)?;
                tracing::debug!(path = %path.display(), frame = idx.0, "frame written");
                self.report.frames_written += 1;
                self.report.files.push(FileRecord {
                    path: path.to_path_buf(),
                    outcome: FileOutcome::Written { frame_index: idx.0 },
                });
            }
            Err(e) if e.is_per_file() => {
                tracing::warn!(path = %path.display(), error = %e, "skipping source");
                self.report.frames_skipped += 1;
                self.report.files.push(FileRecord {
                    path: path.to_path_buf(),
                    outcome: FileOutcome::Skipped {
                        reason: e.to_string(),
                    },
                });
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn finish(self, sources: usize) -> ThermaResult<AssemblyReport> {
        if !self.started {
            return Err(ThermaError::EmptySequence { sources });
        }
        self.sink.end()?;
        tracing::info!(
            written = self.report.frames_written,
            skipped = self.report.frames_skipped,
            "assembly finished"
        );
        Ok(self.report)
    }
}

fn build_thread_pool(threads: Option<usize>) -> ThermaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ThermaError::validation(
            "assemble 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ThermaError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/video.rs"]
mod tests;
