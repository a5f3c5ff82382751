use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use canvasfx::{
    FontSize, FuzzyTextConfig, HeadlessSurface, ManualFrameClock, ManualTimers, PixelCanvas,
    PixelSize, Point, PointerEvent, RasterSplitConfig, RasterSplitRevealer, Rng64, SourceSamples,
    SplitMode, SplitOutcome, StaticStyleResolver, Surface, TextEngine, TextFuzzRenderer,
    TypewriterConfig, TypewriterDriver,
};

#[derive(Parser, Debug)]
#[command(name = "canvasfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames of the fuzzy text effect as PNGs.
    Fuzz(FuzzArgs),
    /// Reveal an image with a simulated pointer walk and write the mosaic as a PNG.
    Raster(RasterArgs),
    /// Print the typing timeline of one or more phrases.
    Type(TypeArgs),
}

#[derive(Parser, Debug)]
struct FuzzArgs {
    /// Text to render (overrides the config's text).
    #[arg(long)]
    text: Option<String>,

    /// Font file (TTF/OTF) used for shaping and rasterization.
    #[arg(long)]
    font: PathBuf,

    /// Optional fuzzy text config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font size in pixels (overrides the config's size).
    #[arg(long)]
    size: Option<f32>,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Render with the hover intensity instead of the base intensity.
    #[arg(long, default_value_t = false)]
    hover: bool,

    /// Jitter seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Half,
    Quadrant,
}

#[derive(Parser, Debug)]
struct RasterArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Optional raster split config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Split mode (overrides the config).
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Number of simulated pointer moves.
    #[arg(long, default_value_t = 2000)]
    moves: u32,

    /// Pointer walk seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TypeArgs {
    /// Phrase to type; repeat for a rotation.
    #[arg(long = "text", required_unless_present = "config")]
    text: Vec<String>,

    /// Optional typewriter config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Loop over the phrases.
    #[arg(long = "loop", default_value_t = false)]
    looping: bool,

    /// Delete phrases instead of typing them.
    #[arg(long, default_value_t = false)]
    reverse: bool,

    /// Stop after this many ticks.
    #[arg(long, default_value_t = 200)]
    max_ticks: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Fuzz(args) => cmd_fuzz(args),
        Command::Raster(args) => cmd_raster(args),
        Command::Type(args) => cmd_type(args),
    }
}

fn cmd_fuzz(args: FuzzArgs) -> anyhow::Result<()> {
    let mut engine = TextEngine::new();
    let family = engine.register_font_file(&args.font)?;

    let mut config = match &args.config {
        Some(path) => FuzzyTextConfig::from_path(path)?,
        None => FuzzyTextConfig::default(),
    };
    if let Some(text) = args.text {
        config.text = text;
    }
    if let Some(size) = args.size {
        config.font_size = FontSize::Px(size);
    }
    let styles = StaticStyleResolver {
        font_family: Some(family),
        ..StaticStyleResolver::default()
    };

    let mut renderer = TextFuzzRenderer::new(config)?.with_rng(Rng64::new(args.seed));
    let mut surface = HeadlessSurface::new(PixelSize::new(1, 1))?;
    let mut frames = ManualFrameClock::new();

    let ticket = renderer
        .pending_init()
        .context("renderer has no pending initialization")?;
    if !renderer.complete_init(ticket, &mut engine, &styles, &mut surface, &mut frames) {
        anyhow::bail!("could not rasterize text with '{}'", args.font.display());
    }

    if args.hover {
        let region = renderer
            .interactive_region()
            .context("renderer has no interactive region")?;
        renderer.handle_pointer(
            PointerEvent::MouseMove {
                client: region.center(),
            },
            &surface,
        );
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for i in 0..args.frames {
        if i > 0 {
            for id in frames.tick() {
                renderer.on_frame(id, &mut surface, &mut frames);
            }
        }
        let canvas = surface.canvas().context("surface has no canvas")?;
        write_png(canvas, &args.out_dir.join(format!("frame_{i:04}.png")))?;
    }

    renderer.teardown(&mut frames);
    eprintln!(
        "wrote {} frame(s) to {}",
        args.frames,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_raster(args: RasterArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => RasterSplitConfig::from_path(path)?,
        None => RasterSplitConfig::default(),
    };
    config.image_src = args.image.display().to_string();
    if let Some(mode) = args.mode {
        config.split_mode = match mode {
            ModeChoice::Half => SplitMode::Half,
            ModeChoice::Quadrant => SplitMode::Quadrant,
        };
    }

    let samples = SourceSamples::open(&args.image)?;
    let mut revealer = RasterSplitRevealer::new(config)?;
    let mut surface = HeadlessSurface::new(PixelSize::new(1, 1))?;
    let mut frames = ManualFrameClock::new();

    let ticket = revealer
        .pending_load()
        .context("revealer has no pending load")?;
    revealer.complete_load(ticket, samples, &mut surface);

    let bounds = surface.client_rect();
    let mut rng = Rng64::new(args.seed);
    let mut splits = 0u32;
    for _ in 0..args.moves {
        let client = Point::new(
            bounds.x0 + rng.next_f64_01() * bounds.width(),
            bounds.y0 + rng.next_f64_01() * bounds.height(),
        );
        if let SplitOutcome::Split { .. } =
            revealer.handle_pointer(PointerEvent::MouseMove { client }, &surface, &mut frames)
        {
            splits += 1;
        }
        for id in frames.tick() {
            revealer.on_frame(id, &mut surface);
        }
    }

    let cells = revealer.partition().map_or(0, |p| p.len());
    let canvas = surface.canvas().context("surface has no canvas")?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(canvas, &args.out)?;
    revealer.teardown(&mut frames);

    eprintln!(
        "wrote {} ({splits} splits, {cells} cells)",
        args.out.display()
    );
    Ok(())
}

fn cmd_type(args: TypeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => TypewriterConfig::from_path(path)?,
        None => TypewriterConfig::default(),
    };
    if !args.text.is_empty() {
        config.text = canvasfx::Phrases::Many(args.text);
    }
    config.looping |= args.looping;
    config.reverse_mode |= args.reverse;

    let mut timers = ManualTimers::new();
    let mut driver = TypewriterDriver::new(config)?;
    driver.on_phrase_complete(|text, idx| println!("        completed #{idx}: {text:?}"));
    driver.start(&mut timers);
    driver.set_visible(true, &mut timers);

    println!("{:>6}ms  {:?}", 0, driver.displayed());
    for _ in 0..args.max_ticks {
        let Some(id) = timers.pop_next() else {
            break;
        };
        if driver.on_timer(id, &mut timers) {
            println!(
                "{:>6}ms  {:?}",
                timers.now().as_millis(),
                driver.displayed()
            );
        }
    }
    driver.teardown(&mut timers);
    Ok(())
}

fn write_png(canvas: &PixelCanvas, path: &Path) -> anyhow::Result<()> {
    let size = canvas.size();
    image::save_buffer_with_format(
        path,
        &canvas.to_straight_rgba8(),
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
