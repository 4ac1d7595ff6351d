use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "raw2gif", version)]
struct Cli {
    /// Log debug output (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a directory of raw frames into an animated GIF.
    Gif(GifArgs),
    /// Render a single raw frame as a PNG.
    Frame(FrameArgs),
    /// Write a synthetic raw frame sequence.
    Synth(SynthArgs),
}

#[derive(Args, Debug)]
struct ScaleArgs {
    /// Divide samples by this value (usually the peak over all frames).
    #[arg(long)]
    divisor: Option<f32>,

    /// Decades shown in log mode; 0 selects linear mode.
    #[arg(long)]
    decades: Option<f32>,

    /// Colormap name, optionally suffixed with `_r`.
    #[arg(long)]
    cmap: Option<String>,

    /// Number of discrete colormap levels.
    #[arg(long)]
    levels: Option<usize>,
}

impl ScaleArgs {
    fn apply(self, opts: &mut raw2gif::ConvertOpts) {
        if let Some(v) = self.divisor {
            opts.divisor = v;
        }
        if let Some(v) = self.decades {
            opts.decades = v;
        }
        if let Some(v) = self.cmap {
            opts.colormap = v;
        }
        if let Some(v) = self.levels {
            opts.colormap_levels = v;
        }
    }
}

#[derive(Parser, Debug)]
struct GifArgs {
    /// Directory holding the raw frames.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output GIF path.
    out: PathBuf,

    /// Options JSON; flags given on the command line win.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Glob pattern selecting frame files inside the input directory.
    #[arg(long)]
    pattern: Option<String>,

    #[command(flatten)]
    scale: ScaleArgs,

    /// Seconds per frame.
    #[arg(long)]
    duration: Option<f64>,

    /// Loop count; 0 loops forever.
    #[arg(long = "loop")]
    loop_count: Option<u16>,

    /// Also write every frame as a PNG into this directory.
    #[arg(long)]
    save_frames_to_dir: Option<PathBuf>,

    /// Write full frames instead of delta-cropped ones.
    #[arg(long)]
    no_optimize: bool,

    /// Render frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input raw frame.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    scale: ScaleArgs,
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Directory to write frames into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames.
    #[arg(long, default_value_t = 16)]
    frames: usize,

    /// Grid width in samples.
    #[arg(long, default_value_t = 64)]
    width: usize,

    /// Grid height in samples.
    #[arg(long, default_value_t = 48)]
    height: usize,

    /// File name prefix; frames are named `<prefix>.<n>.dat`.
    #[arg(long, default_value = "sim")]
    prefix: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Gif(args) => cmd_gif(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Synth(args) => cmd_synth(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "raw2gif=debug" } else { "raw2gif=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_gif(args: GifArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(path) => raw2gif::ConvertOpts::from_path(path)?,
        None => raw2gif::ConvertOpts::default(),
    };
    args.scale.apply(&mut opts);
    if let Some(v) = args.pattern {
        opts.pattern = v;
    }
    if let Some(v) = args.duration {
        opts.frame_duration_secs = v;
    }
    if let Some(v) = args.loop_count {
        opts.loop_count = v;
    }
    if let Some(v) = args.save_frames_to_dir {
        opts.export_frames_dir = Some(v);
    }
    if args.no_optimize {
        opts.optimize = false;
    }
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let stats = raw2gif::convert(&args.in_dir, &args.out, &opts)
        .with_context(|| format!("convert '{}'", args.in_dir.display()))?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        args.out.display(),
        stats.frames,
        stats.width,
        stats.height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut opts = raw2gif::ConvertOpts::default();
    args.scale.apply(&mut opts);
    raw2gif::render_raw_to_png(&args.in_path, &args.out, &opts)
        .with_context(|| format!("render '{}'", args.in_path.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let grids = raw2gif::pipeline::synth::gaussian_pulse(args.width, args.height, args.frames)?;
    let paths = raw2gif::pipeline::synth::write_sequence(&args.out_dir, &args.prefix, &grids)?;
    eprintln!("wrote {} frames to {}", paths.len(), args.out_dir.display());
    Ok(())
}
