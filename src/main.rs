use std::path::PathBuf;

use clap::Parser;
use log::info;

use shape_drift::{ImageSlot, Sketch, SketchConfig, render_frames, run_window};

/// Rows of drifting shapes, some hollow and filled with seeded fractals.
#[derive(Parser, Debug)]
#[command(name = "shape_drift", version)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the animation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Image shown inside hollow squares
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long)]
    fps: Option<usize>,

    /// Fractal recursion depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Render this many frames to PNG instead of opening a window
    #[arg(long)]
    frames: Option<u64>,

    /// Output directory for --frames
    #[arg(long, default_value = "frames")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SketchConfig::load(path)?,
        None => SketchConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.image.is_some() {
        config.image = cli.image.clone();
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }

    let image = match &config.image {
        Some(path) => {
            info!("loading image {}", path.display());
            ImageSlot::load_in_background(path)
        }
        None => ImageSlot::none(),
    };

    let mut sketch = Sketch::new(config, image)?;

    match cli.frames {
        Some(count) => {
            render_frames(&mut sketch, count, &cli.out)?;
        }
        None => run_window(sketch, "shape drift")?,
    }

    Ok(())
}
