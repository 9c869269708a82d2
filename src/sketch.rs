use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::asset::ImageSlot;
use crate::canvas::Canvas;
use crate::config::SketchConfig;
use crate::error::Result;
use crate::fractal::FractalParams;
use crate::geometry::ShapeKind;
use crate::math::Point;
use crate::shape::MovingShape;

/// Owns the canvas, the shapes and the animation generator; one `step` per
/// frame.
pub struct Sketch {
    config: SketchConfig,
    canvas: Canvas,
    shapes: Vec<MovingShape>,
    rng: StdRng,
    image: ImageSlot,
    params: FractalParams,
    frame: u64,
}

impl Sketch {
    pub fn new(config: SketchConfig, image: ImageSlot) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let w = config.width as f32;
        let h = config.height as f32;
        let mut shapes = Vec::with_capacity(config.rows * config.per_row);
        for r in 0..config.rows {
            let y = h * (r + 1) as f32 / (config.rows + 1) as f32;
            for i in 0..config.per_row {
                let kind = ShapeKind::ALL[(i + r) % ShapeKind::ALL.len()];
                let x = i as f32 * (w / config.per_row as f32);
                shapes.push(MovingShape::spawn(&mut rng, kind, Point::new(x, y), 0));
            }
        }

        info!(
            "sketch {}x{}: {} shapes, {} hollow",
            config.width,
            config.height,
            shapes.len(),
            shapes.iter().filter(|s| s.hollow).count()
        );

        let canvas = Canvas::new(config.width, config.height)?;
        Ok(Sketch {
            canvas,
            params: FractalParams::with_max_depth(config.max_depth),
            config,
            shapes,
            rng,
            image,
            frame: 0,
        })
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn shapes(&self) -> &[MovingShape] {
        &self.shapes
    }

    pub fn image_mut(&mut self) -> &mut ImageSlot {
        &mut self.image
    }

    /// Frames drawn so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances every shape one tick and redraws the scene.
    pub fn step(&mut self) {
        self.frame += 1;
        self.image.poll();
        self.canvas.clear(self.config.background);

        let width = self.canvas.width() as f32;
        let image = self.image.ready();
        for shape in &mut self.shapes {
            shape.update(&mut self.rng, self.frame, width);
            shape.render(&mut self.canvas, image, &self.params);
        }
    }
}
