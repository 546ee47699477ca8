//! Plane geometry shared by the shape model and hit-testing.
//!
//! All coordinates are canvas pixels with the origin at the top-left corner
//! of the drawable region.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Shortest distance from this point to the segment `a`–`b`.
    ///
    /// The projection is clamped to the segment, so points beyond either end
    /// measure against the nearest endpoint. A zero-length segment degrades to
    /// the distance to `a`.
    #[must_use]
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx.mul_add(dx, dy * dy);
        if len_sq <= f64::EPSILON {
            return self.distance_to(a);
        }
        let t = ((self.x - a.x).mul_add(dx, (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        let foot = Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y));
        self.distance_to(foot)
    }
}
