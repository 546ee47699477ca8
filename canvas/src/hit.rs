//! Hit-testing and selection-handle placement.
//!
//! Each variant has its own containment predicate:
//! - circle: distance from the centre is at most the radius
//! - rectangle: inside the axis-aligned bounds spanned by origin and end
//! - line: within half the stroke width of the segment
//! - brush: within half the stroke width of any polyline segment
//!
//! [`hit_test`] walks the store topmost-first, so the most recently created
//! shape under the pointer wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::ShapeStore;
use crate::geom::Point;
use crate::shape::{Geometry, Shape, ShapeId};

/// Return the id of the topmost shape containing `pt`, if any.
#[must_use]
pub fn hit_test(pt: Point, doc: &ShapeStore) -> Option<ShapeId> {
    doc.iter().rev().find(|shape| contains(shape, pt)).map(|shape| shape.id.clone())
}

/// Whether `pt` lies on or inside `shape`.
#[must_use]
pub fn contains(shape: &Shape, pt: Point) -> bool {
    let origin = shape.origin();
    let half_width = shape.size / 2.0;
    match &shape.geometry {
        Geometry::Circle { end_x, end_y } => {
            let radius = origin.distance_to(Point::new(*end_x, *end_y));
            pt.distance_to(origin) <= radius
        }
        Geometry::Rectangle { end_x, end_y } => {
            let (left, right) = ordered(origin.x, *end_x);
            let (top, bottom) = ordered(origin.y, *end_y);
            (left..=right).contains(&pt.x) && (top..=bottom).contains(&pt.y)
        }
        Geometry::Line { end_x, end_y } => pt.distance_to_segment(origin, Point::new(*end_x, *end_y)) <= half_width,
        Geometry::Brush { points } => points
            .windows(2)
            .any(|seg| pt.distance_to_segment(seg[0], seg[1]) <= half_width),
    }
}

/// Centres of the selection handles drawn for `shape`.
///
/// Circle: centre, then top, right, bottom and left points on the radius.
/// Rectangle: the four corners. Line: both endpoints. Brush: none.
#[must_use]
pub fn handle_positions(shape: &Shape) -> Vec<Point> {
    let (x, y) = (shape.x, shape.y);
    match &shape.geometry {
        Geometry::Circle { end_x, end_y } => {
            let r = Point::new(x, y).distance_to(Point::new(*end_x, *end_y));
            vec![
                Point::new(x, y),
                Point::new(x, y - r),
                Point::new(x + r, y),
                Point::new(x, y + r),
                Point::new(x - r, y),
            ]
        }
        Geometry::Rectangle { end_x, end_y } => vec![
            Point::new(x, y),
            Point::new(*end_x, y),
            Point::new(x, *end_y),
            Point::new(*end_x, *end_y),
        ],
        Geometry::Line { end_x, end_y } => vec![Point::new(x, y), Point::new(*end_x, *end_y)],
        Geometry::Brush { .. } => Vec::new(),
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
