use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::Pixmap;

use crate::canvas::{Canvas, Rgba};
use crate::fractal::{Cell, FractalParams, generate, unit};
use crate::geometry::{ShapeKind, ShapePath};
use crate::math::{Point, lerp};

pub const WRAP_MARGIN: f32 = 90.0;
pub const EASING: f32 = 0.08;
pub const CLIP_SHRINK: f32 = 0.98;
pub const FRACTAL_SPAN: f32 = 0.80;
pub const HOLLOW_CHANCE: f32 = 0.55;
pub const FRACTAL_CHANCE: f32 = 0.70;
pub const SEED_RANGE: u64 = 1_000_000_000;

const INK: u8 = 30;
const OUTLINE_WEIGHT: f32 = 3.0;

/// What a shape shows inside its outline this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interior {
    Filled,
    Fractal,
    Image,
    Empty,
}

#[derive(Clone, Debug)]
pub struct MovingShape {
    pub kind: ShapeKind,
    pub position: Point,
    pub speed: f32,
    pub size: f32,
    pub target_size: f32,
    pub hollow: bool,
    pub fractal_enabled: bool,
    pub seed: u64,
    pub next_size_change: u64,
    pub next_seed_change: u64,
}

fn countdown<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> u64 {
    rng.gen_range(lo..hi).floor() as u64
}

impl MovingShape {
    /// Rolls a new shape at `position`. `frame` is the current frame count
    /// the first size and seed changes are scheduled from.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, kind: ShapeKind, position: Point, frame: u64) -> Self {
        let speed = rng.gen_range(1.2..2.8);
        let size = rng.gen_range(50.0..120.0);
        let hollow = unit(rng) < HOLLOW_CHANCE;
        let fractal_enabled = unit(rng) < FRACTAL_CHANCE;
        let next_size_change = frame + countdown(rng, 15.0, 45.0);
        let seed = rng.gen_range(0..SEED_RANGE);
        let next_seed_change = frame + countdown(rng, 20.0, 90.0);
        MovingShape {
            kind,
            position,
            speed,
            size,
            target_size: size,
            hollow,
            fractal_enabled,
            seed,
            next_size_change,
            next_seed_change,
        }
    }

    pub fn interior(&self, image_ready: bool) -> Interior {
        if !self.hollow {
            Interior::Filled
        } else if self.kind == ShapeKind::Square && image_ready {
            Interior::Image
        } else if self.fractal_enabled {
            Interior::Fractal
        } else {
            Interior::Empty
        }
    }

    pub fn path(&self) -> ShapePath {
        self.kind.path(self.position, self.size)
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, frame: u64, canvas_width: f32) {
        self.position.x += self.speed;
        if self.position.x > canvas_width + WRAP_MARGIN {
            self.position.x = -WRAP_MARGIN;
        }

        if frame >= self.next_size_change {
            self.target_size = rng.gen_range(30.0..160.0);
            self.next_size_change = frame + countdown(rng, 12.0, 55.0);
        }
        self.size = lerp(self.size, self.target_size, EASING);

        if self.fractal_enabled && frame >= self.next_seed_change {
            self.seed = rng.gen_range(0..SEED_RANGE);
            self.next_seed_change = frame + countdown(rng, 25.0, 110.0);
            debug!("{:?} at x={:.0} reseeded to {}", self.kind, self.position.x, self.seed);
        }
    }

    pub fn render(&self, canvas: &mut Canvas, image: Option<&Pixmap>, params: &FractalParams) {
        let outline = self.path();
        let interior = self.interior(image.is_some());

        if interior == Interior::Filled {
            canvas.fill_path(&outline, Rgba::gray(INK));
            return;
        }

        canvas.stroke_path(&outline, Rgba::gray(INK), OUTLINE_WEIGHT);

        match (interior, image) {
            (Interior::Fractal, _) => {
                let mask = self.kind.path(self.position, self.size * CLIP_SHRINK);
                let mut clipped = canvas.with_clip(&mask);
                self.draw_fractal(&mut clipped, params);
            }
            (Interior::Image, Some(image)) => {
                let mask = self.kind.path(self.position, self.size * CLIP_SHRINK);
                let mut clipped = canvas.with_clip(&mask);
                self.draw_backdrop(&mut clipped);
                clipped.draw_image(image, self.position, self.size);
            }
            _ => return,
        }

        canvas.stroke_path(&outline, Rgba::gray(INK), OUTLINE_WEIGHT);
    }

    fn draw_backdrop(&self, canvas: &mut Canvas) {
        let side = self.size * CLIP_SHRINK;
        canvas.fill_path(&ShapePath::rect(self.position, side, side), Rgba::new(0, 0, 0, 10));
    }

    fn draw_fractal(&self, canvas: &mut Canvas, params: &FractalParams) {
        self.draw_backdrop(canvas);
        let side = self.size * FRACTAL_SPAN;
        let root = Cell::root(self.position - Point::new(side / 2.0, side / 2.0), side);
        let mut rng = StdRng::seed_from_u64(self.seed);
        for primitive in generate(&mut rng, root, *params) {
            canvas.fill_primitive(&primitive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{pixmap_from_rgba, unpack_rgb};
    use image::RgbaImage;

    const BG: u32 = 0xF5F5F5;

    fn blank(side: usize) -> Canvas {
        let mut c = Canvas::new(side, side).unwrap();
        c.clear(245);
        c
    }

    fn assert_near(pixel: u32, want: u32) {
        let (r, g, b) = unpack_rgb(pixel);
        let (wr, wg, wb) = unpack_rgb(want);
        assert!(
            r.abs_diff(wr) <= 2 && g.abs_diff(wg) <= 2 && b.abs_diff(wb) <= 2,
            "got {pixel:06X}, want {want:06X}"
        );
    }

    fn shape(kind: ShapeKind, hollow: bool, fractal_enabled: bool) -> MovingShape {
        MovingShape {
            kind,
            position: Point::new(100.0, 100.0),
            speed: 2.0,
            size: 80.0,
            target_size: 80.0,
            hollow,
            fractal_enabled,
            seed: 42,
            next_size_change: 1_000,
            next_seed_change: 1_000,
        }
    }

    #[test]
    fn spawn_rolls_within_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let s = MovingShape::spawn(&mut rng, ShapeKind::Circle, Point::new(0.0, 0.0), 10);
            assert!(s.speed >= 1.2 && s.speed < 2.8);
            assert!(s.size >= 50.0 && s.size < 120.0);
            assert_eq!(s.size, s.target_size);
            assert!(s.seed < SEED_RANGE);
            assert!((25..55).contains(&s.next_size_change));
            assert!((30..100).contains(&s.next_seed_change));
        }
    }

    #[test]
    fn spawn_flags_follow_their_odds() {
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 4_000;
        let (mut hollow, mut fractal) = (0, 0);
        for _ in 0..n {
            let s = MovingShape::spawn(&mut rng, ShapeKind::Square, Point::new(0.0, 0.0), 0);
            hollow += s.hollow as u32;
            fractal += s.fractal_enabled as u32;
        }
        let hollow = hollow as f32 / n as f32;
        let fractal = fractal as f32 / n as f32;
        assert!((hollow - HOLLOW_CHANCE).abs() < 0.04, "hollow fraction {hollow}");
        assert!((fractal - FRACTAL_CHANCE).abs() < 0.04, "fractal fraction {fractal}");
    }

    #[test]
    fn interior_policy() {
        assert_eq!(shape(ShapeKind::Square, false, true).interior(true), Interior::Filled);
        assert_eq!(shape(ShapeKind::Square, true, true).interior(true), Interior::Image);
        assert_eq!(shape(ShapeKind::Square, true, true).interior(false), Interior::Fractal);
        assert_eq!(shape(ShapeKind::Square, true, false).interior(false), Interior::Empty);
        assert_eq!(shape(ShapeKind::Circle, true, true).interior(true), Interior::Fractal);
        assert_eq!(shape(ShapeKind::Triangle, true, false).interior(true), Interior::Empty);
    }

    #[test]
    fn easing_moves_strictly_toward_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = shape(ShapeKind::Circle, false, false);
        s.target_size = 150.0;
        let before = s.size;
        s.update(&mut rng, 0, 800.0);
        assert!(s.size > before && s.size < 150.0);
        assert!((s.size - (before + (150.0 - before) * EASING)).abs() < 1e-4);

        s.size = 150.0;
        s.update(&mut rng, 1, 800.0);
        assert_eq!(s.size, 150.0);
    }

    #[test]
    fn size_schedule_rerolls_target() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = shape(ShapeKind::Square, false, false);
        s.next_size_change = 5;
        s.update(&mut rng, 4, 800.0);
        assert_eq!(s.target_size, 80.0);
        s.update(&mut rng, 5, 800.0);
        assert!(s.target_size >= 30.0 && s.target_size < 160.0);
        assert!(s.next_size_change >= 5 + 12 && s.next_size_change < 5 + 55);
    }

    #[test]
    fn wraps_only_past_the_margin() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = shape(ShapeKind::Triangle, false, false);
        s.position.x = 888.0;
        s.update(&mut rng, 0, 800.0);
        assert_eq!(s.position.x, 890.0);
        s.update(&mut rng, 1, 800.0);
        assert_eq!(s.position.x, -WRAP_MARGIN);
    }

    #[test]
    fn seed_only_changes_on_schedule_and_when_enabled() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut off = shape(ShapeKind::Circle, true, false);
        off.next_seed_change = 0;
        off.update(&mut rng, 10, 800.0);
        assert_eq!(off.seed, 42);

        let mut on = shape(ShapeKind::Circle, true, true);
        on.next_seed_change = 10;
        on.update(&mut rng, 9, 800.0);
        assert_eq!(on.seed, 42);
        on.update(&mut rng, 10, 800.0);
        assert!(on.next_seed_change >= 10 + 25 && on.next_seed_change < 10 + 110);
    }

    #[test]
    fn fractal_render_is_stable_for_a_seed() {
        let params = FractalParams::default();
        let s = shape(ShapeKind::Circle, true, true);
        let mut a = blank(200);
        let mut b = blank(200);
        s.render(&mut a, None, &params);
        s.render(&mut b, None, &params);
        assert_eq!(a.pixmap().data(), b.pixmap().data());
        assert!(!a.is_clipped());
    }

    #[test]
    fn fractal_stays_inside_the_outline() {
        let params = FractalParams::default();
        let s = shape(ShapeKind::Circle, true, true);
        let mut c = blank(200);
        s.render(&mut c, None, &params);
        // past the stroke band nothing is touched
        let limit = s.size / 2.0 + OUTLINE_WEIGHT;
        for y in 0..200 {
            for x in 0..200 {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance(s.position) > limit {
                    assert_eq!(c.pixel(x, y), BG, "pixel {x},{y}");
                }
            }
        }
    }

    #[test]
    fn filled_shape_is_solid() {
        let s = shape(ShapeKind::Square, false, true);
        let mut c = blank(200);
        s.render(&mut c, None, &FractalParams::default());
        assert_near(c.pixel(100, 100), 0x1E1E1E);
    }

    #[test]
    fn hollow_square_shows_image_when_ready() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba([200, 0, 0, 255]));
        let pixmap = pixmap_from_rgba(&img).unwrap();
        let s = shape(ShapeKind::Square, true, false);
        let mut c = blank(200);
        s.render(&mut c, Some(&pixmap), &FractalParams::default());
        assert_near(c.pixel(100, 100), 0xC80000);
        assert!(!c.is_clipped());

        let mut bare = blank(200);
        s.render(&mut bare, None, &FractalParams::default());
        assert_eq!(bare.pixel(100, 100), BG);
    }
}
