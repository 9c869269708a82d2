use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let d = *self - other;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_moves_fraction_of_the_gap() {
        assert_eq!(lerp(0.0, 100.0, 0.08), 8.0);
        assert_eq!(lerp(50.0, 50.0, 0.08), 50.0);
        assert!(lerp(120.0, 30.0, 0.08) < 120.0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
        assert_eq!(Point::new(1.0, 1.0) + Point::new(2.0, -1.0), Point::new(3.0, 0.0));
    }
}
