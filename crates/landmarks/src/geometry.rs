//! Screen-plane joint geometry

use serde::{Deserialize, Serialize};

/// A point in normalized screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }
}

/// Interior angle at `vertex` formed by `a` and `b`, in degrees.
///
/// Returns `None` when either arm of the angle has zero length.
pub fn angle_at(a: Point2, vertex: Point2, b: Point2) -> Option<f64> {
    let v1 = a.sub(vertex);
    let v2 = b.sub(vertex);

    let magnitude = v1.norm() * v2.norm();
    if magnitude <= f64::EPSILON {
        return None;
    }

    // Rounding can push the cosine just past +/-1
    let cos = (v1.dot(v2) / magnitude).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Midpoint of two points
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Absolute deviation from vertical of the segment `bottom -> top`, in degrees.
///
/// 0 means `top` is straight above or below `bottom`; 90 means level.
pub fn tilt_from_vertical(top: Point2, bottom: Point2) -> f64 {
    let dx = top.x - bottom.x;
    let dy = top.y - bottom.y;
    dx.atan2(dy).to_degrees().abs()
}
