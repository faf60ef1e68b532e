//! thermaframe turns semicolon-delimited sensor captures into thermal heatmaps and videos.
//!
//! The pipeline has three stages:
//!
//! - [`extract`] parses the numeric block after the `Image Data` marker into a [`NumericFrame`]
//! - [`Colorizer`] normalizes a frame to its own value range and maps it onto a [`ColorScale`]
//! - [`assemble_video`] turns a sorted set of files into frames and streams them into a
//!   [`FrameSink`] (MP4 via the system `ffmpeg`, or in memory)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Folder-to-video assembly.
pub mod assemble;
/// Normalization and color lookup.
pub mod color;
/// Encoding sinks.
pub mod encode;
/// Frame extraction.
pub mod extract;
/// Raster, HTML and terminal renderers.
pub mod render;
/// Tabular store interface.
pub mod store;

pub use crate::foundation::core::{Fps, FrameIndex, Resolution, Rgb8};
pub use crate::foundation::error::{ThermaError, ThermaResult};

pub use crate::assemble::folder::{FolderJob, FolderVideo, generate_folder_video, video_file_name};
pub use crate::assemble::opts::AssembleOpts;
pub use crate::assemble::sources::{ExclusionSet, list_source_files};
pub use crate::assemble::video::{
    AssemblyReport, FileOutcome, FileRecord, FramePipeline, assemble_video,
};
pub use crate::color::colormap::Colormap;
pub use crate::color::colorize::{ColorCell, ColorizeOpts, ColorizedImage, Colorizer};
pub use crate::color::gradient::{ColorStop, Gradient};
pub use crate::color::scale::ColorScale;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::extract::frame::{MISSING, NumericFrame};
pub use crate::extract::parser::{
    ExtractOpts, RowWidthPolicy, extract, extract_path, extract_with,
};
pub use crate::render::raster::{ResizeFilter, RgbFrame};
pub use crate::store::{InMemoryTableStore, InsertOutcome, TableRows, TableStore};
