pub mod math;
pub mod geometry;
pub mod fractal;
pub mod canvas;
pub mod asset;
pub mod shape;
pub mod sketch;
pub mod config;
pub mod error;
pub mod visualizer;

pub use math::{Point, lerp};
pub use geometry::{ShapeKind, ShapePath};
pub use fractal::{
    Cell, DrawPrimitive, FractalIter, FractalParams, PrimitiveKind,
    DEFAULT_MAX_DEPTH, generate, generate_seeded
};
pub use canvas::{Canvas, ClipScope, Rgba, pixmap_from_rgba};
pub use asset::ImageSlot;
pub use shape::{Interior, MovingShape};
pub use sketch::Sketch;
pub use config::{MAX_SIDE, SketchConfig};
pub use error::{Result, SketchError};
pub use visualizer::{run_window, render_frames};
