use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "algonim", version)]
struct Cli {
    /// Log filter level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the initial state of a scene as a PNG.
    Frame(FrameArgs),
    /// Play a scene's steps into a PNG sequence, one file per keyframe.
    Slideshow(SlideshowArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font files preferred over system fonts.
    #[arg(long)]
    font: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct SlideshowArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Font files preferred over system fonts.
    #[arg(long)]
    font: Vec<PathBuf>,

    /// Skip the hold time between keyframes.
    #[arg(long)]
    no_wait: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Slideshow(args) => cmd_slideshow(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<algonim::Scene> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open scene '{}'", path.display()))?;
    let scene = algonim::Scene::from_json_str(&text).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn make_surface(scene: &algonim::Scene, fonts: &[PathBuf]) -> anyhow::Result<algonim::RasterSurface> {
    let mut surface = algonim::RasterSurface::new(scene.width, scene.height)?;
    for path in fonts {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let family = surface
            .register_font(bytes)
            .with_context(|| format!("register font '{}'", path.display()))?;
        tracing::info!(%family, path = %path.display(), "using font");
    }
    Ok(surface)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let (alg, _) = scene.build(algonim::AlgonimOpts::from_env())?;
    let mut surface = make_surface(&scene, &args.font)?;

    let frame = alg.render_frame(&mut surface)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let data = if frame.premultiplied {
        algonim::widget::sink::unpremultiply(&frame.data)
    } else {
        frame.data
    };
    image::save_buffer_with_format(
        &args.out,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_slideshow(args: SlideshowArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let (mut alg, handles) = scene.build(algonim::AlgonimOpts::from_env())?;
    let mut surface = make_surface(&scene, &args.font)?;
    let mut sink = algonim::PngSequenceSink::new(&args.out_dir);
    let mut playback = scene.playback(handles);

    let frames = if args.no_wait {
        let mut clock = algonim::ManualClock::new();
        algonim::Slideshow::run(&mut alg, &mut surface, &mut sink, &mut clock, &mut playback)?
    } else {
        let mut clock = algonim::ThreadClock;
        algonim::Slideshow::run(&mut alg, &mut surface, &mut sink, &mut clock, &mut playback)?
    };

    eprintln!("wrote {frames} frames to {}", args.out_dir.display());
    Ok(())
}
