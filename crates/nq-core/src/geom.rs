use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A planar coordinate in the units of the source data (usually decimal degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Planar Euclidean distance. No geodesic correction is applied.
    pub fn distance(self, other: Point2d) -> f64 {
        (self - other).norm()
    }

    /// Inclusive tolerance test: `distance <= tolerance`.
    ///
    /// With a zero tolerance the coordinates must be bit-for-bit equal, so
    /// `0.0` and `-0.0` do not match.
    pub fn within(self, other: Point2d, tolerance: f64) -> bool {
        if tolerance == 0.0 {
            return self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits();
        }
        self.distance(other) <= tolerance
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point2d {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl Vec2d {
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add<Vec2d> for Point2d {
    type Output = Point2d;

    fn add(self, rhs: Vec2d) -> Self::Output {
        Point2d {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Point2d> for Point2d {
    type Output = Vec2d;

    fn sub(self, rhs: Point2d) -> Self::Output {
        Vec2d {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Vec2d {
    type Output = Vec2d;

    fn mul(self, rhs: f64) -> Self::Output {
        Vec2d {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Axis-aligned bounding box, `min` and `max` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox2d {
    pub min: Point2d,
    pub max: Point2d,
}

impl Bbox2d {
    /// Builds a box from `[xmin, ymin, xmax, ymax]`, normalising swapped bounds.
    pub fn from_bounds(b: [f64; 4]) -> Self {
        Self {
            min: Point2d::new(b[0].min(b[2]), b[1].min(b[3])),
            max: Point2d::new(b[0].max(b[2]), b[1].max(b[3])),
        }
    }

    pub fn intersects(&self, other: &Bbox2d) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains(&self, p: Point2d) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline2d {
    pub points: Vec<Point2d>,
}

impl Polyline2d {
    pub fn new(points: Vec<Point2d>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive vertex pairs.
    pub fn pieces(&self) -> impl Iterator<Item = (Point2d, Point2d)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn bbox(&self) -> Option<Bbox2d> {
        let first = *self.points.first()?;
        let mut bb = Bbox2d {
            min: first,
            max: first,
        };
        for p in &self.points[1..] {
            bb.min.x = bb.min.x.min(p.x);
            bb.min.y = bb.min.y.min(p.y);
            bb.max.x = bb.max.x.max(p.x);
            bb.max.y = bb.max.y.max(p.y);
        }
        Some(bb)
    }
}

impl From<Vec<[f64; 2]>> for Polyline2d {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::new(points.into_iter().map(Point2d::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Bbox2d, Point2d, Polyline2d, Vec2d};

    #[test]
    fn vec_ops_and_distance() {
        let a = Vec2d { x: 3.0, y: 4.0 };
        let b = Vec2d { x: 1.0, y: -2.0 };

        assert!((a.dot(b) + 5.0).abs() < 1e-12);
        assert!((a.cross(b) + 10.0).abs() < 1e-12);
        assert!((a.norm() - 5.0).abs() < 1e-12);

        let p = Point2d::new(1.0, 1.0);
        let q = Point2d::new(4.0, 5.0);
        assert!((p.distance(q) - 5.0).abs() < 1e-12);
        assert_eq!(p + Vec2d { x: 0.5, y: -1.0 }, Point2d::new(1.5, 0.0));
    }

    #[test]
    fn within_is_inclusive_and_exact_at_zero() {
        let p = Point2d::new(0.0, 0.0);
        assert!(p.within(Point2d::new(3.0, 4.0), 5.0));
        assert!(!p.within(Point2d::new(3.0, 4.0), 4.999));
        assert!(p.within(p, 0.0));
        assert!(!p.within(Point2d::new(f64::MIN_POSITIVE, 0.0), 0.0));
    }

    #[test]
    fn zero_tolerance_tells_signed_zeros_apart() {
        let p = Point2d::new(0.0, 1.0);
        let q = Point2d::new(-0.0, 1.0);
        assert!(!p.within(q, 0.0));
        assert!(p.within(q, 1e-12));
    }

    #[test]
    fn polyline_bbox_and_pieces() {
        let line = Polyline2d::from(vec![[0.0, 1.0], [2.0, -1.0], [1.0, 3.0]]);
        let bb = line.bbox().expect("non-empty polyline has a bbox");
        assert_eq!(bb.min, Point2d::new(0.0, -1.0));
        assert_eq!(bb.max, Point2d::new(2.0, 3.0));
        assert_eq!(line.pieces().count(), 2);
        assert!(Polyline2d::default().bbox().is_none());
    }

    #[test]
    fn bbox_intersection() {
        let a = Bbox2d::from_bounds([0.0, 0.0, 1.0, 1.0]);
        let b = Bbox2d::from_bounds([1.0, 1.0, 2.0, 2.0]);
        let c = Bbox2d::from_bounds([3.0, 3.0, 2.5, 2.5]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(c.contains(Point2d::new(2.75, 2.6)));
    }
}
