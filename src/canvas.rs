// Drawing surface backed by a tiny-skia pixmap.
// Every draw goes through the current clip mask, if any; `present` converts
// to the 0RGB `u32` layout minifb wants.

use std::ops::{Deref, DerefMut};

use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, LineJoin, Mask, Paint, Pixmap, PixmapPaint,
    PremultipliedColorU8, Stroke, Transform,
};

use crate::error::{Result, SketchError};
use crate::fractal::DrawPrimitive;
use crate::geometry::ShapePath;
use crate::math::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Rgba::new(v, v, v, 255)
    }

    fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.r, self.g, self.b, self.a);
        paint.anti_alias = true;
        paint
    }
}

pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

pub fn unpack_rgb(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

fn to_0rgb(c: PremultipliedColorU8) -> u32 {
    let c = c.demultiply();
    pack_rgb(c.red(), c.green(), c.blue())
}

/// Premultiplies a decoded image into a pixmap `draw_image` can blit.
/// `None` for an empty image.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

pub struct Canvas {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let pixmap = u32::try_from(width)
            .ok()
            .zip(u32::try_from(height).ok())
            .and_then(|(w, h)| Pixmap::new(w, h))
            .ok_or_else(|| SketchError::Config(format!("cannot allocate a {width}x{height} canvas")))?;
        Ok(Canvas { pixmap, clip: None })
    }

    pub fn width(&self) -> usize {
        self.pixmap.width() as usize
    }

    pub fn height(&self) -> usize {
        self.pixmap.height() as usize
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// 0RGB value at (x, y); black outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixmap.pixel(x as u32, y as u32).map_or(0, to_0rgb)
    }

    /// Copies the frame into `out` as 0RGB, resizing it to fit.
    pub fn present(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.pixmap.pixels().iter().map(|&c| to_0rgb(c)));
    }

    pub fn is_clipped(&self) -> bool {
        self.clip.is_some()
    }

    pub fn clear(&mut self, gray: u8) {
        self.pixmap.fill(Color::from_rgba8(gray, gray, gray, 255));
    }

    pub fn fill_path(&mut self, shape: &ShapePath, color: Rgba) {
        let Some(path) = shape.to_path() else { return };
        self.pixmap.fill_path(
            &path,
            &color.paint(),
            FillRule::Winding,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    /// Strokes a band of `weight` pixels centred on the outline.
    pub fn stroke_path(&mut self, shape: &ShapePath, color: Rgba, weight: f32) {
        let Some(path) = shape.to_path() else { return };
        let stroke = Stroke {
            width: weight,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &color.paint(),
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    pub fn fill_primitive(&mut self, primitive: &DrawPrimitive) {
        self.fill_path(&primitive.path(), Rgba::new(0, 0, 0, primitive.alpha));
    }

    /// Draws `image` stretched over the square of side `side` centred on
    /// `center`, sampling nearest-neighbour.
    pub fn draw_image(&mut self, image: &Pixmap, center: Point, side: f32) {
        if side <= 0.0 {
            return;
        }
        let sx = side / image.width() as f32;
        let sy = side / image.height() as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, center.x - side / 2.0, center.y - side / 2.0);
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..Default::default()
        };
        self.pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, self.clip.as_ref());
    }

    /// Restricts drawing to the interior of `shape` until the returned scope
    /// is dropped. Nested scopes intersect with the enclosing clip.
    pub fn with_clip(&mut self, shape: &ShapePath) -> ClipScope<'_> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let next = match (shape.to_path(), &self.clip) {
            (Some(path), Some(current)) => {
                let mut mask = current.clone();
                mask.intersect_path(&path, FillRule::Winding, true, Transform::identity());
                Some(mask)
            }
            (Some(path), None) => Mask::new(w, h).map(|mut mask| {
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            }),
            // a degenerate outline has no interior, so nothing gets through
            (None, _) => Mask::new(w, h),
        };
        let previous = std::mem::replace(&mut self.clip, next);
        ClipScope { canvas: self, previous }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
            let (r, g, b) = unpack_rgb(self.pixel(x as usize, y as usize));
            image::Rgba([r, g, b, 255])
        })
    }
}

/// Clipped view of a [`Canvas`]; restores the previous clip on drop.
pub struct ClipScope<'a> {
    canvas: &'a mut Canvas,
    previous: Option<Mask>,
}

impl Deref for ClipScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        &*self.canvas
    }
}

impl DerefMut for ClipScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        &mut *self.canvas
    }
}

impl Drop for ClipScope<'_> {
    fn drop(&mut self) {
        self.canvas.clip = self.previous.take();
    }
}
