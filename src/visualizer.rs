use log::info;
use minifb::{Key, Window, WindowOptions};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sketch::Sketch;

/// Runs the sketch in a window until it is closed or Escape is pressed.
pub fn run_window(mut sketch: Sketch, title: &str) -> Result<()> {
    let (width, height) = (sketch.canvas().width(), sketch.canvas().height());
    let mut window = Window::new(title, width, height, WindowOptions::default())?;
    let mut buffer = Vec::new();
    window.set_target_fps(sketch.config().fps);

    info!("window open at {} fps", sketch.config().fps);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        sketch.step();
        sketch.canvas().present(&mut buffer);
        window.update_with_buffer(&buffer, width, height)?;
    }

    info!("window closed after {} frames", sketch.frame());
    Ok(())
}

/// Renders `count` frames headlessly into `out_dir` as numbered PNGs and
/// returns the written paths.
pub fn render_frames<P: AsRef<Path>>(sketch: &mut Sketch, count: u64, out_dir: P) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    // a headless run has no reason to start before the asset is in
    sketch.image_mut().wait();

    let mut written = Vec::new();
    for _ in 0..count {
        sketch.step();
        let path = out_dir.join(format!("frame_{:05}.png", sketch.frame()));
        sketch.canvas().to_rgba_image().save(&path)?;
        written.push(path);

        if sketch.frame() % 60 == 0 {
            info!("rendered {} / {} frames", written.len(), count);
        }
    }

    info!("wrote {} frames to {}", written.len(), out_dir.display());
    Ok(written)
}
