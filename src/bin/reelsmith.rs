use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version, about = "Split-screen caption videos and avatar overlays")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a manifest to an MP4 (requires `ffmpeg` on PATH).
    Assemble(AssembleArgs),
    /// Print the resolved layer plan of a manifest as JSON.
    Plan(PlanArgs),
    /// Key a white-backdrop foreground clip over a background clip.
    Overlay(OverlayArgs),
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Encoder thread hint.
    #[arg(long)]
    threads: Option<u32>,

    /// x264 preset.
    #[arg(long, default_value = "medium")]
    preset: String,

    /// Fail instead of replacing an existing output.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Foreground clip with a white backdrop; its audio is kept.
    #[arg(long)]
    foreground: PathBuf,

    /// Background clip.
    #[arg(long)]
    background: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Cut the foreground audio at the end of the composited video.
    #[arg(long, default_value_t = false)]
    trim_audio: bool,

    /// Key threshold; pixels with every channel above it are replaced.
    #[arg(long, default_value_t = reelsmith::WHITE_KEY_THRESHOLD)]
    threshold: u8,

    /// Directory for intermediates (defaults to the output's directory).
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble(args) => cmd_assemble(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Overlay(args) => cmd_overlay(args),
    }
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let coordinator = reelsmith::Coordinator::from_path(&args.manifest)?;
    let opts = reelsmith::AssembleOpts {
        preset: Some(args.preset),
        threads: args.threads.or(reelsmith::AssembleOpts::default().threads),
        overwrite: !args.no_overwrite,
    };
    let stats = coordinator.create_video(&args.out, &opts)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let coordinator = reelsmith::Coordinator::from_path(&args.manifest)?;
    let plan = coordinator.build()?.plan();
    let json = serde_json::to_string_pretty(&plan).context("serialize layer plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let opts = reelsmith::ComposeOpts {
        threshold: args.threshold,
        audio: if args.trim_audio {
            reelsmith::AudioPolicy::TrimToVideo
        } else {
            reelsmith::AudioPolicy::KeepFull
        },
        scratch_dir: args.scratch_dir,
        ..reelsmith::ComposeOpts::default()
    };
    let report = reelsmith::compose(&args.foreground, &args.background, &args.out, &opts)?;
    if report.stopped_early {
        eprintln!(
            "warning: sources ended early ({} of {} frames)",
            report.frames_written, report.total_frames
        );
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
