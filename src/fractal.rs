// Random quad-subdivision fractal.
// A square cell may drop one small primitive at its centre and may split
// into four children. Splitting gets rarer and primitives get more opaque
// as depth grows.
//
// Generation is a lazy iterator over an explicit work stack. Cells are
// visited depth-first, top-left to bottom-right, so random numbers are
// consumed in the same order a recursive walk would consume them.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geometry::ShapePath;
use crate::math::Point;

pub const DEFAULT_MAX_DEPTH: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    pub max_depth: u32,
    pub draw_probability: f32,
    pub split_base: f32,
    pub split_decay: f32,
    pub alpha_base: u8,
    pub alpha_step: u8,
}

impl Default for FractalParams {
    fn default() -> Self {
        FractalParams {
            max_depth: DEFAULT_MAX_DEPTH,
            draw_probability: 0.9,
            split_base: 0.55,
            split_decay: 0.08,
            alpha_base: 50,
            alpha_step: 20,
        }
    }
}

impl FractalParams {
    pub fn with_max_depth(max_depth: u32) -> Self {
        FractalParams { max_depth, ..Self::default() }
    }

    pub fn split_probability(&self, depth: u32) -> f32 {
        self.split_base - self.split_decay * depth as f32
    }

    pub fn alpha(&self, depth: u32) -> u8 {
        let a = self.alpha_base as u32 + self.alpha_step as u32 * depth;
        a.min(255) as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub origin: Point,
    pub width: f32,
    pub depth: u32,
}

impl Cell {
    pub fn root(origin: Point, width: f32) -> Self {
        Cell { origin, width, depth: 0 }
    }

    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.width / 2.0, self.origin.y + self.width / 2.0)
    }

    /// The four quadrants in visiting order.
    pub fn children(&self) -> [Cell; 4] {
        let w = self.width / 2.0;
        let depth = self.depth + 1;
        let Point { x, y } = self.origin;
        [
            Cell { origin: Point::new(x, y), width: w, depth },
            Cell { origin: Point::new(x + w, y), width: w, depth },
            Cell { origin: Point::new(x, y + w), width: w, depth },
            Cell { origin: Point::new(x + w, y + w), width: w, depth },
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveKind {
    Rect { width: f32, height: f32 },
    Circle { diameter: f32 },
    Triangle { side: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPrimitive {
    pub kind: PrimitiveKind,
    pub center: Point,
    pub alpha: u8,
    pub depth: u32,
    pub cell_width: f32,
}

impl DrawPrimitive {
    /// Largest linear extent the primitive was sized by.
    pub fn size(&self) -> f32 {
        match self.kind {
            PrimitiveKind::Rect { width, height } => width.max(height),
            PrimitiveKind::Circle { diameter } => diameter,
            PrimitiveKind::Triangle { side } => side,
        }
    }

    pub fn path(&self) -> ShapePath {
        let c = self.center;
        match self.kind {
            PrimitiveKind::Rect { width, height } => {
                ShapePath::RoundedRect { center: c, width, height, radius: 6.0 }
            }
            PrimitiveKind::Circle { diameter } => ShapePath::Circle { center: c, diameter },
            PrimitiveKind::Triangle { side: s } => ShapePath::Triangle([
                Point::new(c.x, c.y - s * 0.55),
                Point::new(c.x - s * 0.55, c.y + s * 0.45),
                Point::new(c.x + s * 0.55, c.y + s * 0.45),
            ]),
        }
    }
}

pub struct FractalIter<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    params: FractalParams,
    stack: Vec<Cell>,
}

/// Lazily walks the subdivision of `root`, drawing from `rng`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, root: Cell, params: FractalParams) -> FractalIter<'_, R> {
    FractalIter { rng, params, stack: vec![root] }
}

/// Seeds a fresh generator with `seed` and collects the whole fractal for a
/// square of side `side` whose top-left corner is `origin`.
pub fn generate_seeded(seed: u64, origin: Point, side: f32, max_depth: u32) -> Vec<DrawPrimitive> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(&mut rng, Cell::root(origin, side), FractalParams::with_max_depth(max_depth)).collect()
}

/// Uniform draw from `[0, 1)`.
pub(crate) fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}

fn primitive<R: Rng + ?Sized>(rng: &mut R, params: &FractalParams, cell: &Cell) -> DrawPrimitive {
    let w = cell.width;
    let kind = match rng.gen_range(0..3) {
        0 => {
            let width = w * rng.gen_range(0.25..0.85);
            let height = w * rng.gen_range(0.25..0.85);
            PrimitiveKind::Rect { width, height }
        }
        1 => PrimitiveKind::Circle { diameter: w * rng.gen_range(0.25..0.95) },
        _ => PrimitiveKind::Triangle { side: w * rng.gen_range(0.35..0.95) },
    };
    DrawPrimitive {
        kind,
        center: cell.center(),
        alpha: params.alpha(cell.depth),
        depth: cell.depth,
        cell_width: w,
    }
}

impl<R: Rng + ?Sized> Iterator for FractalIter<'_, R> {
    type Item = DrawPrimitive;

    fn next(&mut self) -> Option<DrawPrimitive> {
        while let Some(cell) = self.stack.pop() {
            let drawn = if unit(&mut *self.rng) < self.params.draw_probability {
                Some(primitive(&mut *self.rng, &self.params, &cell))
            } else {
                None
            };

            if cell.depth < self.params.max_depth
                && unit(&mut *self.rng) < self.params.split_probability(cell.depth)
            {
                // reversed so the top-left child is popped first
                self.stack.extend(cell.children().into_iter().rev());
            }

            if drawn.is_some() {
                return drawn;
            }
        }
        None
    }
}
