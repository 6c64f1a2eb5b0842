use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rasterfx::{
    Affine, DropShadowParams, EngineConfig, FilterPrimitive as _, FilterSlot, FilterUnits,
    IntRect, PixelSurface, Rgba32,
};

#[derive(Parser, Debug)]
#[command(name = "rasterfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a drop shadow behind a PNG.
    DropShadow(DropShadowArgs),
}

#[derive(Parser, Debug)]
struct DropShadowArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON file of drop shadow attributes; flags given on the command line override it.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Horizontal offset in pixels.
    #[arg(long, allow_hyphen_values = true)]
    dx: Option<f64>,

    /// Vertical offset in pixels.
    #[arg(long, allow_hyphen_values = true)]
    dy: Option<f64>,

    /// Blur standard deviation in pixels.
    #[arg(long)]
    std_deviation: Option<f64>,

    /// Shadow color as RRGGBB or RRGGBBAA.
    #[arg(long, value_parser = parse_color)]
    flood_color: Option<Rgba32>,

    /// Shadow opacity in [0, 1].
    #[arg(long)]
    flood_opacity: Option<f64>,

    /// Dispatch threads (defaults to RASTERFX_DISPATCH_THREADS, then 4).
    #[arg(long)]
    threads: Option<usize>,

    /// Extra transparent margin in pixels, on top of the shadow's own spread.
    #[arg(long, default_value_t = 0)]
    pad: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::DropShadow(args) => cmd_drop_shadow(args),
    }
}

fn parse_color(s: &str) -> Result<Rgba32, String> {
    Rgba32::parse_hex(s).map_err(|e| e.to_string())
}

fn read_params(path: &Path) -> anyhow::Result<DropShadowParams> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read params '{}'", path.display()))?;
    let params = DropShadowParams::from_json_str(&s).with_context(|| "parse params JSON")?;
    Ok(params)
}

fn cmd_drop_shadow(args: DropShadowArgs) -> anyhow::Result<()> {
    let engine = match args.threads {
        Some(dispatch_threads) => EngineConfig { dispatch_threads },
        None => EngineConfig::from_env()?,
    };
    engine.apply()?;

    let mut params = match &args.params {
        Some(path) => read_params(path)?,
        None => DropShadowParams::default(),
    };
    if let Some(v) = args.dx {
        params.dx = v;
    }
    if let Some(v) = args.dy {
        params.dy = v;
    }
    if let Some(v) = args.std_deviation {
        params.std_deviation = v;
    }
    if let Some(v) = args.flood_color {
        params.flood_color = v;
    }
    if let Some(v) = args.flood_opacity {
        params.flood_opacity = v;
    }
    params.validate()?;
    let shadow = params.build();

    let src = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let (w, h) = src.dimensions();
    let content = IntRect::from_xywh(0, 0, w as i32, h as i32);

    let pad = i32::try_from(args.pad).context("pad out of range")?;
    let grown = shadow.area_enlarge(content, Affine::IDENTITY);
    let canvas = IntRect::new(
        grown.left().min(0) - pad,
        grown.top().min(0) - pad,
        grown.right().max(content.right()) + pad,
        grown.bottom().max(content.bottom()) + pad,
    );

    let mut padded = image::RgbaImage::new(canvas.width() as u32, canvas.height() as u32);
    image::imageops::replace(
        &mut padded,
        &src,
        -i64::from(canvas.left()),
        -i64::from(canvas.top()),
    );

    let source = PixelSurface::from_rgba_image(&padded)?;
    let mut slot = FilterSlot::with_source(source, FilterUnits::default());
    shadow.render(&mut slot);
    let rendered = slot
        .take(shadow.output())
        .context("drop shadow produced no output")?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    rendered
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        rendered.width(),
        rendered.height()
    );
    Ok(())
}
