// Optional image asset shown inside hollow squares.
// Decoded once on a loader thread and premultiplied into a pixmap when it
// lands; the frame loop polls without blocking and simply skips the image
// until (unless) it arrives.

use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tiny_skia::Pixmap;

use crate::canvas::pixmap_from_rgba;
use crate::error::Result;

/// Decode an image file into RGBA8
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let img = image::open(path)?;
    Ok(img.to_rgba8())
}

pub enum ImageSlot {
    /// No asset configured
    Absent,
    Pending { path: PathBuf, rx: Receiver<Result<RgbaImage>> },
    Ready(Pixmap),
    Failed,
}

impl ImageSlot {
    pub fn none() -> Self {
        ImageSlot::Absent
    }

    /// Wraps an already decoded image; an empty image counts as failed.
    pub fn from_image(image: RgbaImage) -> Self {
        pixmap_from_rgba(&image).map_or(ImageSlot::Failed, ImageSlot::Ready)
    }

    /// Start decoding `path` on a background thread
    pub fn load_in_background<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            // receiver may already be gone if the sketch exited
            let _ = tx.send(load_rgba(&worker_path));
        });
        ImageSlot::Pending { path, rx }
    }

    /// Collect the loader's result if it has arrived
    pub fn poll(&mut self) {
        let ImageSlot::Pending { path, rx } = self else { return };
        let next = match rx.try_recv() {
            Ok(result) => resolve(path, Some(result)),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => resolve(path, None),
        };
        *self = next;
    }

    /// Block until the loader finishes (headless export wants the asset on frame one)
    pub fn wait(&mut self) {
        let ImageSlot::Pending { path, rx } = self else { return };
        let next = resolve(path, rx.recv().ok());
        *self = next;
    }

    pub fn ready(&self) -> Option<&Pixmap> {
        match self {
            ImageSlot::Ready(pixmap) => Some(pixmap),
            _ => None,
        }
    }
}

fn resolve(path: &Path, received: Option<Result<RgbaImage>>) -> ImageSlot {
    match received {
        Some(Ok(image)) => match pixmap_from_rgba(&image) {
            Some(pixmap) => {
                info!("loaded image {} ({}x{})", path.display(), image.width(), image.height());
                ImageSlot::Ready(pixmap)
            }
            None => {
                warn!("image {} is empty, drawing without it", path.display());
                ImageSlot::Failed
            }
        },
        Some(Err(e)) => {
            warn!("image {} unavailable, drawing without it: {}", path.display(), e);
            ImageSlot::Failed
        }
        None => {
            warn!("image loader for {} exited without a result", path.display());
            ImageSlot::Failed
        }
    }
}
