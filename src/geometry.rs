// Shape outlines.
// `ShapePath` is the plain description of an outline; `to_path` builds the
// tiny-skia path the canvas fills, strokes or turns into a clip mask.

use tiny_skia::{Path, PathBuilder};

use crate::math::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Square,
    Triangle,
    Circle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Square, ShapeKind::Triangle, ShapeKind::Circle];

    /// Outline of this kind centred on `center` at nominal size `size`.
    pub fn path(self, center: Point, size: f32) -> ShapePath {
        match self {
            ShapeKind::Square => ShapePath::RoundedRect {
                center,
                width: size,
                height: size,
                radius: 10.0,
            },
            ShapeKind::Circle => ShapePath::Circle { center, diameter: size },
            ShapeKind::Triangle => {
                let h = size * 0.95;
                ShapePath::Triangle([
                    Point::new(center.x, center.y - h * 0.62),
                    Point::new(center.x - size * 0.62, center.y + h * 0.42),
                    Point::new(center.x + size * 0.62, center.y + h * 0.42),
                ])
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapePath {
    RoundedRect { center: Point, width: f32, height: f32, radius: f32 },
    Circle { center: Point, diameter: f32 },
    Triangle([Point; 3]),
}

impl ShapePath {
    pub fn rect(center: Point, width: f32, height: f32) -> Self {
        ShapePath::RoundedRect { center, width, height, radius: 0.0 }
    }

    /// Builds the outline; `None` for degenerate (zero-area) shapes.
    pub fn to_path(&self) -> Option<Path> {
        match *self {
            ShapePath::RoundedRect { center, width, height, radius } => {
                rounded_rect(center, width.abs(), height.abs(), radius)
            }
            ShapePath::Circle { center, diameter } => {
                PathBuilder::from_circle(center.x, center.y, diameter.abs() / 2.0)
            }
            ShapePath::Triangle([a, b, c]) => {
                let mut pb = PathBuilder::new();
                pb.move_to(a.x, a.y);
                pb.line_to(b.x, b.y);
                pb.line_to(c.x, c.y);
                pb.close();
                pb.finish()
            }
        }
    }
}

fn rounded_rect(center: Point, w: f32, h: f32, radius: f32) -> Option<Path> {
    let x = center.x - w / 2.0;
    let y = center.y - h / 2.0;
    let r = radius.clamp(0.0, w.min(h) / 2.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}
