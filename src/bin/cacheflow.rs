use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cacheflow", version)]
struct Cli {
    /// Log simulation and render details to stderr (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scenario state at one point in time as a PNG.
    Frame(FrameArgs),
    /// Render the whole scenario as an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Print the simulation events of the scenario as JSON lines.
    Trace(TraceArgs),
    /// Render the static fallback diagram shown when motion is disabled.
    Fallback(FallbackArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Host clock reading to render, in milliseconds.
    #[arg(long = "at-ms", default_value_t = 0.0)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long, required_unless_present = "png_dir", conflicts_with = "png_dir")]
    out: Option<PathBuf>,

    /// Write numbered PNG frames into this directory instead of an MP4.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Refuse to replace an existing MP4.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FallbackArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

impl From<BackendChoice> for cacheflow::BackendKind {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Cpu => cacheflow::BackendKind::Cpu,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Fallback(args) => cmd_fallback(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_player(path: &Path, backend: BackendChoice) -> anyhow::Result<cacheflow::Player> {
    let scenario = cacheflow::Scenario::from_path(path)
        .with_context(|| format!("load scenario '{}'", path.display()))?;
    let player = cacheflow::Player::with_backend(scenario, backend.into())
        .with_context(|| format!("start scenario '{}'", path.display()))?;
    Ok(player)
}

fn background(player: &cacheflow::Player) -> [u8; 4] {
    let [r, g, b, _] = player
        .scenario()
        .config
        .colors
        .background
        .to_rgba8_premul()
        .to_straight();
    [r, g, b, 255]
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, args.backend)?;
    let frame = player
        .render_at(args.at_ms)
        .with_context(|| format!("render frame at {} ms", args.at_ms))?;
    cacheflow::write_png(&args.out, &frame, background(&player))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, args.backend)?;

    let (stats, out) = match (&args.png_dir, &args.out) {
        (Some(dir), _) => {
            let mut sink = cacheflow::PngSequenceSink::new(dir);
            (player.render_to(&mut sink)?, dir.clone())
        }
        (None, Some(out)) => {
            let opts = cacheflow::FfmpegSinkOpts {
                out_path: out.clone(),
                overwrite: !args.no_overwrite,
            };
            let mut sink = cacheflow::FfmpegSink::new(opts);
            (player.render_to(&mut sink)?, out.clone())
        }
        (None, None) => anyhow::bail!("either --out or --png-dir is required"),
    };

    eprintln!(
        "wrote {} ({} frames, {} animated, {} events)",
        out.display(),
        stats.frames,
        stats.active_frames,
        stats.events
    );
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, BackendChoice::Cpu)?;
    let trace = player.run_trace()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &trace {
        serde_json::to_writer(&mut out, record).context("serialize trace record")?;
        out.write_all(b"\n").context("write trace")?;
    }
    out.flush().context("flush trace")?;
    Ok(())
}

fn cmd_fallback(args: FallbackArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, BackendChoice::Cpu)?;
    let frame = player.fallback().context("render fallback diagram")?;
    cacheflow::write_png(&args.out, &frame, background(&player))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
