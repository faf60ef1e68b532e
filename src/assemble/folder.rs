use crate::assemble::opts::AssembleOpts;
use crate::assemble::sources::{ExclusionSet, list_source_files};
use crate::assemble::video::{AssemblyReport, assemble_video};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::foundation::error::{ThermaError, ThermaResult};
use std::path::{Component, Path, PathBuf};

/// Suffix appended to every folder video file name.
pub const VIDEO_SUFFIX: &str = "_thermal_video.mp4";

/// Derive the output file name for a folder from its path relative to the upload root.
///
/// Path components are joined with `_`; `a/b/c` becomes `a_b_c_thermal_video.mp4`. The root
/// folder itself maps to `root_thermal_video.mp4`.
pub fn video_file_name(rel_path: &Path) -> String {
    let parts: Vec<String> = rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().replace(['/', '\\'], "_")),
            _ => None,
        })
        .collect();
    let stem = if parts.is_empty() {
        "root".to_owned()
    } else {
        parts.join("_")
    };
    format!("{stem}{VIDEO_SUFFIX}")
}

/// One "make a video for this folder" request.
#[derive(Clone, Debug)]
pub struct FolderJob {
    /// Folder holding the source files.
    pub folder: PathBuf,
    /// Folder path relative to the upload root; names the output.
    pub rel_path: PathBuf,
    /// Directory receiving the video.
    pub out_dir: PathBuf,
    /// Regenerate even if the output already exists.
    pub force: bool,
}

impl FolderJob {
    /// Where this job writes its video.
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(video_file_name(&self.rel_path))
    }
}

/// Result of [`generate_folder_video`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderVideo {
    /// A video of the same name already existed and was reused.
    Cached(PathBuf),
    /// A new video was encoded.
    Generated {
        /// Output path.
        path: PathBuf,
        /// Per-file outcomes.
        report: AssemblyReport,
    },
}

impl FolderVideo {
    /// Output path in either case.
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached(p) => p,
            Self::Generated { path, .. } => path,
        }
    }
}

/// Encode every visible source in `job.folder` into an MP4 named after the folder.
///
/// An existing output of the same name is reused unless `job.force` is set. Encoding goes to a
/// temporary sibling file that is renamed into place only on success, so a failed run never
/// leaves a partial video that a later request would pick up.
#[tracing::instrument(skip(opts, exclusions), fields(folder = %job.folder.display()))]
pub fn generate_folder_video(
    job: &FolderJob,
    opts: &AssembleOpts,
    exclusions: &ExclusionSet,
) -> ThermaResult<FolderVideo> {
    let out = job.output_path();
    if !job.force && out.is_file() {
        tracing::info!(out = %out.display(), "reusing existing video");
        return Ok(FolderVideo::Cached(out));
    }

    opts.validate()?;
    let sources = list_source_files(&job.folder, &opts.extension, exclusions)?;
    if sources.is_empty() {
        return Err(ThermaError::EmptySequence { sources: 0 });
    }

    let partial = partial_path(&out);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&partial));
    let report = match assemble_video(&sources, opts, &mut sink) {
        Ok(report) => report,
        Err(e) => {
            // Stops a still-running encoder before its output is removed.
            drop(sink);
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
    };
    publish(&partial, &out)?;

    let secs = opts.fps()?.duration_secs(report.frames_written);

    tracing::info!(
        out = %out.display(),
        frames = report.frames_written,
        skipped = report.frames_skipped,
        secs,
        "video generated"
    );
    Ok(FolderVideo::Generated { path: out, report })
}

/// Move a finished partial file into place; on failure the partial file is removed.
fn publish(partial: &Path, out: &Path) -> ThermaResult<()> {
    if let Err(e) = std::fs::rename(partial, out) {
        let _ = std::fs::remove_file(partial);
        return Err(ThermaError::io(out, e));
    }
    Ok(())
}

fn partial_path(out: &Path) -> PathBuf {
    let name = out
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    out.with_file_name(format!(".partial-{name}"))
}
