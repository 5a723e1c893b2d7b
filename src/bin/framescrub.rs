use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "framescrub", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the surface at one progress position as a PNG.
    Frame(FrameArgs),
    /// Render evenly spaced progress samples as numbered PNGs.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Animator configuration JSON.
    #[arg(long = "config")]
    config_path: PathBuf,

    /// Directory frame resources are resolved against.
    #[arg(long)]
    frames_root: PathBuf,

    /// Progress position in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Animator configuration JSON.
    #[arg(long = "config")]
    config_path: PathBuf,

    /// Directory frame resources are resolved against.
    #[arg(long)]
    frames_root: PathBuf,

    /// Number of evenly spaced samples across [0, 1].
    #[arg(long, default_value_t = 12)]
    samples: u32,

    /// Output directory for numbered PNGs.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Parser, Debug)]
struct SurfaceArgs {
    /// Surface width in CSS pixels.
    #[arg(long, default_value_t = 390.0)]
    width: f64,

    /// Surface height in CSS pixels.
    #[arg(long, default_value_t = 844.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<framescrub::AnimatorConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: framescrub::AnimatorConfig =
        serde_json::from_reader(r).with_context(|| "parse animator config JSON")?;
    Ok(config)
}

fn make_animator(
    config: framescrub::AnimatorConfig,
    surface: &SurfaceArgs,
) -> anyhow::Result<framescrub::Animator> {
    let mut animator =
        framescrub::Animator::new(config, surface.width, surface.height, surface.dpr)?;
    // Synthetic container: one viewport of scroll per ten frames keeps
    // offsets readable in logs.
    let range = f64::from(animator.config().frame_count) * surface.height / 10.0;
    animator.remeasure(framescrub::ScrollMetrics::segment(
        0.0,
        range.max(1.0),
        surface.height,
    ));
    Ok(animator)
}

fn render_at(
    animator: &mut framescrub::Animator,
    fetcher: &mut framescrub::FsFetcher,
    progress: f64,
) -> anyhow::Result<framescrub::TickReport> {
    animator.seek_to(framescrub::SeekTarget::Progress(progress))?;
    let target = framescrub::frame_for_progress(
        framescrub::Progress::new(progress),
        animator.config().ease,
        animator.config().frame_count,
    );
    // Tick until the target frame has been drawn: one tick warms the cache,
    // later ticks draw, and smoothing (when enabled) steps toward the target
    // a few frames at a time.
    for _ in 0..4096 {
        let report = animator.tick(fetcher)?;
        if report.frame == target && report.drawn {
            return Ok(report);
        }
    }
    anyhow::bail!(
        "frame {} could not be rendered (missing or undecodable resource?)",
        target.0
    )
}

fn write_surface_png(animator: &framescrub::Animator, out: &Path) -> anyhow::Result<()> {
    let viewport = animator.renderer().device_viewport();
    let img = image::RgbaImage::from_raw(
        viewport.width,
        viewport.height,
        animator.renderer().pixels().to_vec(),
    )
    .context("surface buffer does not match viewport size")?;
    img.save(out)
        .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config_path)?;
    let mut animator = make_animator(config, &args.surface)?;
    let mut fetcher = framescrub::FsFetcher::new(&args.frames_root);

    let report = render_at(&mut animator, &mut fetcher, args.progress)?;
    write_surface_png(&animator, &args.out)?;

    println!(
        "progress {:.4} -> frame {} ({} overlay)",
        report.progress.value(),
        report.frame.0,
        match report.overlay.active {
            Some(i) => animator.overlays().ranges()[i].label.clone(),
            None => "no".to_string(),
        }
    );
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.samples == 0 {
        anyhow::bail!("--samples must be > 0");
    }
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out dir '{}'", args.out_dir.display()))?;

    let config = read_config(&args.config_path)?;
    let mut animator = make_animator(config, &args.surface)?;
    let mut fetcher = framescrub::FsFetcher::new(&args.frames_root);

    for i in 0..args.samples {
        let progress = if args.samples == 1 {
            0.0
        } else {
            f64::from(i) / f64::from(args.samples - 1)
        };
        let report = render_at(&mut animator, &mut fetcher, progress)?;
        let out = args.out_dir.join(format!("sample_{:04}.png", i + 1));
        write_surface_png(&animator, &out)?;
        println!(
            "sample {:>3}: progress {:.4} -> frame {}",
            i + 1,
            report.progress.value(),
            report.frame.0
        );
    }
    Ok(())
}
