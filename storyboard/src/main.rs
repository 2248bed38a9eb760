use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::{Builder, Env};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use puzzle_core::raster::decode_png;
use puzzle_core::{Engine, FrameStatus, ImageCatalog, PixmapSurface, PuzzleOptions};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tiny_skia::{Color, Pixmap};

/// Render a timed puzzle reveal to a series of PNG frames.
#[derive(Parser, Debug)]
#[command(name = "storyboard", version)]
struct Args {
    /// Source image (PNG).
    #[arg(long, conflicts_with = "catalog")]
    image: Option<PathBuf>,
    /// JSON image catalog; image URLs are relative to the catalog file.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Theme used to pick from the catalog.
    #[arg(long, default_value = "")]
    theme: String,
    /// JSON file with puzzle options; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    cols: Option<u32>,
    #[arg(long)]
    minutes: Option<f64>,
    #[arg(long)]
    duration_ms: Option<f64>,
    #[arg(long)]
    max_rotation: Option<f64>,
    #[arg(long)]
    max_width: Option<f64>,
    #[arg(long)]
    max_height: Option<f64>,
    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Snapshots spread over the run; the final frame is always written.
    #[arg(long, default_value_t = 12)]
    frames: usize,
    /// Seed for a reproducible scatter and solving order.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, short, default_value = "frames")]
    out: PathBuf,
}

fn load_options(args: &Args) -> Result<PuzzleOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let txt = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<PuzzleOptions>(&txt)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => PuzzleOptions::default(),
    };
    opts.rows = args.rows.or(opts.rows);
    opts.cols = args.cols.or(opts.cols);
    opts.minutes = args.minutes.or(opts.minutes);
    opts.total_duration_ms = args.duration_ms.or(opts.total_duration_ms);
    opts.max_rotation_deg = args.max_rotation.or(opts.max_rotation_deg);
    opts.max_width = args.max_width.or(opts.max_width);
    opts.max_height = args.max_height.or(opts.max_height);
    Ok(opts)
}

fn resolve_image(args: &Args, rng: &mut SmallRng) -> Result<PathBuf> {
    if let Some(path) = &args.image {
        return Ok(path.clone());
    }
    let Some(catalog_path) = &args.catalog else {
        bail!("either --image or --catalog is required");
    };
    let txt = fs::read_to_string(catalog_path)
        .with_context(|| format!("reading {}", catalog_path.display()))?;
    let catalog = ImageCatalog::from_json(&txt)?;
    let picked = catalog.pick(&args.theme, rng)?;
    log::info!("theme '{}' picked {}", args.theme, picked.name);
    let base = catalog_path.parent().unwrap_or(Path::new("."));
    Ok(base.join(&picked.url))
}

/// Elapsed times (ms) at which snapshots are due, evenly spread over
/// `[0, total)`.
fn sample_times(total: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| total * i as f64 / count as f64)
        .collect()
}

fn frame_path(dir: &Path, n: usize) -> PathBuf {
    dir.join(format!("frame_{:03}.png", n))
}

fn encode_png_deterministic(pixmap: &Pixmap, path: &Path) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut enc = Encoder::new(file, pixmap.width(), pixmap.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    enc.set_filter(FilterType::NoFilter);
    enc.set_compression(Compression::Default);
    let mut writer = enc.write_header()?;
    writer.write_image_data(pixmap.data())?;
    Ok(())
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be positive");
    }

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let image_path = resolve_image(&args, &mut rng)?;
    let bytes =
        fs::read(&image_path).with_context(|| format!("reading {}", image_path.display()))?;
    let image = decode_png(&bytes)?;
    let config = load_options(&args)?.resolve(None);
    let total = config.total_duration_ms;

    let surface = PixmapSurface::new().with_background(Color::WHITE);
    let mut engine = Engine::new(config, surface, &image, &mut rng, 0.0)?;
    fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    let step = 1000.0 / args.fps;
    let samples = sample_times(total, args.frames);
    let mut next_sample = 0;
    let mut written = 0;
    let mut tick = 0u64;
    loop {
        let frame = engine.tick(tick as f64 * step);
        let finished = frame.status == FrameStatus::Finished;
        let due = next_sample < samples.len() && frame.elapsed >= samples[next_sample];
        if due || finished {
            while next_sample < samples.len() && frame.elapsed >= samples[next_sample] {
                next_sample += 1;
            }
            if let Some(pixmap) = engine.surface().pixmap() {
                let path = frame_path(&args.out, written);
                encode_png_deterministic(pixmap, &path)?;
                log::info!(
                    "{} at {:.0} ms, {} left, {}/{} placed",
                    path.display(),
                    frame.elapsed,
                    frame.countdown,
                    engine.solving_index(),
                    engine.pieces().len()
                );
                written += 1;
            }
        }
        if finished {
            break;
        }
        tick += 1;
    }
    engine.destroy();
    log::info!("wrote {} frames to {}", written, args.out.display());
    Ok(())
}
