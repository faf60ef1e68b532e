use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use thermaframe::render::{ansi, html, raster};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thermaframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Colorize a single capture to PNG, HTML or the terminal.
    Preview(PreviewArgs),
    /// Assemble every capture in a folder into an MP4 (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Hide files from future videos.
    Exclude(ExclusionArgs),
    /// Make previously excluded files visible again.
    Restore(ExclusionArgs),
}

/// Flags shared by every command that reads captures. Unset flags keep the config value.
#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// JSON file with assembly options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Values per row for the fixed-width policies.
    #[arg(long)]
    cols: Option<usize>,

    /// Handling of rows whose width differs from `--cols`.
    #[arg(long, value_enum)]
    policy: Option<PolicyChoice>,

    /// Line substring that starts the data section.
    #[arg(long)]
    marker: Option<String>,

    /// Color scale preset: thermal, grayscale, plasma or rainbow.
    #[arg(long, conflicts_with = "gradient")]
    scale: Option<String>,

    /// Custom gradient as comma-separated hex colors, evenly spaced.
    #[arg(long, value_delimiter = ',')]
    gradient: Option<Vec<String>>,

    /// Reverse every odd row before coloring.
    #[arg(long)]
    boustrophedon: bool,

    /// Output edge length in pixels (square frames).
    #[arg(long)]
    size: Option<u32>,

    /// Resampling filter.
    #[arg(long, value_enum)]
    filter: Option<FilterChoice>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input capture file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path (defaults to the input path with a `.png` extension).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write an HTML table preview.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Fractional digits printed in HTML cells.
    #[arg(long, default_value_t = 2)]
    decimals: usize,

    /// Print the grid to the terminal with 24-bit color.
    #[arg(long)]
    ansi: bool,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Folder holding the captures.
    #[arg(long)]
    dir: PathBuf,

    /// Directory receiving the video (defaults to `--dir`).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Folder path used to name the video (defaults to the folder's own name).
    #[arg(long)]
    name: Option<PathBuf>,

    /// Output frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Regenerate even if the video already exists.
    #[arg(long)]
    force: bool,

    /// Extract and colorize files in parallel.
    #[arg(long)]
    parallel: bool,

    /// Rayon worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// JSON exclusion list; listed file names are left out.
    #[arg(long)]
    exclusions: Option<PathBuf>,

    /// Print the per-file report as JSON on stdout.
    #[arg(long)]
    report: bool,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
struct ExclusionArgs {
    /// JSON exclusion list to update (created if missing).
    #[arg(long)]
    exclusions: PathBuf,

    /// File names to update.
    #[arg(required = true)]
    names: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Truncate,
    Pad,
    Majority,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Area,
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Video(args) => cmd_video(args),
        Command::Exclude(args) => cmd_exclusions(args, true),
        Command::Restore(args) => cmd_exclusions(args, false),
    }
}

fn load_opts(args: &PipelineArgs) -> anyhow::Result<thermaframe::AssembleOpts> {
    let mut opts = match &args.config {
        Some(path) => thermaframe::AssembleOpts::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => thermaframe::AssembleOpts::default(),
    };

    if let Some(cols) = args.cols {
        opts.expected_cols = cols;
    }
    if let Some(policy) = args.policy {
        opts.policy = match policy {
            PolicyChoice::Truncate => thermaframe::RowWidthPolicy::Truncate,
            PolicyChoice::Pad => thermaframe::RowWidthPolicy::PadMissing,
            PolicyChoice::Majority => thermaframe::RowWidthPolicy::Majority,
        };
    }
    if let Some(marker) = &args.marker {
        opts.marker = marker.clone();
    }
    if let Some(name) = &args.scale {
        opts.scale = thermaframe::ColorScale::preset(name)
            .with_context(|| format!("unknown color scale '{name}'"))?;
    }
    if let Some(colors) = &args.gradient {
        let colors: Vec<&str> = colors.iter().map(String::as_str).collect();
        let gradient =
            thermaframe::Gradient::from_hex(&colors).context("parse --gradient colors")?;
        opts.scale = thermaframe::ColorScale::Custom(gradient);
    }
    if args.boustrophedon {
        opts.boustrophedon = true;
    }
    if let Some(size) = args.size {
        opts.width = size;
        opts.height = size;
    }
    if let Some(filter) = args.filter {
        opts.filter = match filter {
            FilterChoice::Area => thermaframe::ResizeFilter::Area,
            FilterChoice::Nearest => thermaframe::ResizeFilter::Nearest,
            FilterChoice::Triangle => thermaframe::ResizeFilter::Triangle,
            FilterChoice::CatmullRom => thermaframe::ResizeFilter::CatmullRom,
            FilterChoice::Lanczos3 => thermaframe::ResizeFilter::Lanczos3,
        };
    }
    Ok(opts)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args.pipeline)?;
    opts.validate()?;

    let frame = thermaframe::extract_path(&args.in_path, &opts.extract_opts())
        .with_context(|| format!("extract '{}'", args.in_path.display()))?;
    let stats = frame.stats();
    tracing::info!(
        rows = frame.rows(),
        cols = frame.cols(),
        non_numeric = stats.rows_non_numeric,
        wrong_width = stats.rows_wrong_width,
        "extracted frame"
    );

    let img = thermaframe::Colorizer::with_opts(&opts.colorize_opts()).colorize(&frame);
    let res = opts.resolution()?;
    let raster = raster::resample(
        &raster::to_rgb_image(&img)?,
        res.width,
        res.height,
        opts.filter,
    );

    let out = args
        .out
        .unwrap_or_else(|| args.in_path.with_extension("png"));
    raster::save_png(&raster, &out)?;
    eprintln!("wrote {}", out.display());

    if let Some(html_path) = &args.html {
        let title = args
            .in_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture".to_owned());
        let page = html::render_html_page(&title, &html::render_html_table(&img, args.decimals));
        thermaframe::encode::ffmpeg::ensure_parent_dir(html_path)?;
        std::fs::write(html_path, page)
            .with_context(|| format!("write html '{}'", html_path.display()))?;
        eprintln!("wrote {}", html_path.display());
    }

    if args.ansi {
        print!("{}", ansi::render_ansi(&img));
    }
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut opts = load_opts(&args.pipeline)?;
    if let Some(fps) = args.fps {
        opts.fps = fps;
    }
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let exclusions = match &args.exclusions {
        Some(path) => thermaframe::ExclusionSet::load(path)
            .with_context(|| format!("load exclusions '{}'", path.display()))?,
        None => thermaframe::ExclusionSet::new(),
    };

    let job = thermaframe::FolderJob {
        rel_path: args.name.unwrap_or_else(|| folder_name(&args.dir)),
        out_dir: args.out_dir.unwrap_or_else(|| args.dir.clone()),
        folder: args.dir,
        force: args.force,
    };

    let video = thermaframe::generate_folder_video(&job, &opts, &exclusions)
        .with_context(|| format!("assemble video for '{}'", job.folder.display()))?;

    match &video {
        thermaframe::FolderVideo::Cached(path) => {
            eprintln!("reused {}", path.display());
        }
        thermaframe::FolderVideo::Generated { path, report } => {
            for rec in report.skipped() {
                if let thermaframe::FileOutcome::Skipped { reason } = &rec.outcome {
                    eprintln!("skipped {}: {reason}", rec.path.display());
                }
            }
            if args.report {
                println!(
                    "{}",
                    serde_json::to_string_pretty(report).context("serialize report")?
                );
            }
            eprintln!(
                "wrote {} ({} frames, {} skipped)",
                path.display(),
                report.frames_written,
                report.frames_skipped
            );
        }
    }
    Ok(())
}

fn cmd_exclusions(args: ExclusionArgs, exclude: bool) -> anyhow::Result<()> {
    let mut set = thermaframe::ExclusionSet::load(&args.exclusions)
        .with_context(|| format!("load exclusions '{}'", args.exclusions.display()))?;
    for name in &args.names {
        let changed = if exclude {
            set.exclude(name.as_str())
        } else {
            set.restore(name)
        };
        if !changed {
            eprintln!("unchanged: {name}");
        }
    }
    set.save(&args.exclusions)
        .with_context(|| format!("save exclusions '{}'", args.exclusions.display()))?;
    eprintln!("{} excluded", set.len());
    Ok(())
}

fn folder_name(dir: &Path) -> PathBuf {
    let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    canonical
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_default()
}
