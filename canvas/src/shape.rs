//! Shape model: the four drawable variants and their geometry.
//!
//! A [`Shape`] carries the fields common to every variant (identifier, colours,
//! stroke width, origin) plus a [`Geometry`] sum type holding the
//! variant-specific parameters. Circles, rectangles and lines are defined by an
//! end point; brush strokes by an ordered polyline.
//!
//! The serde representation is the relay wire format: camelCase fields with
//! the variant flattened under a `"type"` tag, e.g.
//! `{"id":"…","x":1,"y":2,"strokeColor":"#000000","fillColor":"#00FF00","size":2,"type":"line","endX":9,"endY":9}`.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;
use crate::input::ToolProperties;

/// Unique identifier for a shape.
///
/// Locally created shapes get a UUID; identifiers received from the relay are
/// kept verbatim, whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a shape, which doubles as the active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circle centred on the origin, radius reaching the end point.
    #[default]
    Circle,
    /// Axis-aligned rectangle spanning origin and end point.
    Rectangle,
    /// Straight segment from origin to end point.
    Line,
    /// Freehand polyline.
    Brush,
}

impl ShapeKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Line => "line",
            Self::Brush => "brush",
        }
    }
}

/// Error returned when parsing an unknown shape kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shape kind: {0}")]
pub struct UnknownShapeKind(pub String);

impl FromStr for ShapeKind {
    type Err = UnknownShapeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "rectangle" => Ok(Self::Rectangle),
            "line" => Ok(Self::Line),
            "brush" => Ok(Self::Brush),
            other => Err(UnknownShapeKind(other.to_owned())),
        }
    }
}

/// Variant-specific geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Circle {
        #[serde(rename = "endX")]
        end_x: f64,
        #[serde(rename = "endY")]
        end_y: f64,
    },
    Rectangle {
        #[serde(rename = "endX")]
        end_x: f64,
        #[serde(rename = "endY")]
        end_y: f64,
    },
    Line {
        #[serde(rename = "endX")]
        end_x: f64,
        #[serde(rename = "endY")]
        end_y: f64,
    },
    Brush {
        points: Vec<Point>,
    },
}

/// A shape on the canvas, as stored locally and sent over the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Unique identifier within a client's shape list.
    pub id: ShapeId,
    /// Origin x: circle centre, rectangle corner, line or stroke start.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Outline colour as a CSS colour string.
    pub stroke_color: String,
    /// Fill colour as a CSS colour string. Lines and brush strokes are drawn with it.
    pub fill_color: String,
    /// Stroke width in pixels.
    pub size: f64,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Shape {
    /// Start a new shape at `at` using the current tool properties.
    ///
    /// End-point variants start collapsed onto their origin; a brush stroke
    /// starts with a single point.
    #[must_use]
    pub fn begin(id: ShapeId, at: Point, props: &ToolProperties) -> Self {
        let geometry = match props.kind {
            ShapeKind::Circle => Geometry::Circle { end_x: at.x, end_y: at.y },
            ShapeKind::Rectangle => Geometry::Rectangle { end_x: at.x, end_y: at.y },
            ShapeKind::Line => Geometry::Line { end_x: at.x, end_y: at.y },
            ShapeKind::Brush => Geometry::Brush { points: vec![at] },
        };
        Self {
            id,
            x: at.x,
            y: at.y,
            stroke_color: props.stroke_color.clone(),
            fill_color: props.fill_color.clone(),
            size: props.size,
            geometry,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Line { .. } => ShapeKind::Line,
            Geometry::Brush { .. } => ShapeKind::Brush,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End point for circle, rectangle and line. `None` for brush strokes.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        match self.geometry {
            Geometry::Circle { end_x, end_y }
            | Geometry::Rectangle { end_x, end_y }
            | Geometry::Line { end_x, end_y } => Some(Point::new(end_x, end_y)),
            Geometry::Brush { .. } => None,
        }
    }

    /// Polyline of a brush stroke. `None` for the other variants.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        match &self.geometry {
            Geometry::Brush { points } => Some(points),
            _ => None,
        }
    }

    /// Circle radius: distance from origin to end point. `None` for non-circles.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Circle { end_x, end_y } => Some(self.origin().distance_to(Point::new(end_x, end_y))),
            _ => None,
        }
    }

    /// Grow the shape towards `pt` while it is being drawn: moves the end
    /// point, or appends to the brush polyline.
    pub fn extend_to(&mut self, pt: Point) {
        match &mut self.geometry {
            Geometry::Circle { end_x, end_y } | Geometry::Rectangle { end_x, end_y } | Geometry::Line { end_x, end_y } => {
                *end_x = pt.x;
                *end_y = pt.y;
            }
            Geometry::Brush { points } => points.push(pt),
        }
    }

    /// Whether the end point coincides exactly with the origin.
    ///
    /// Brush strokes have no end point and are never degenerate.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_degenerate(&self) -> bool {
        self.end().is_some_and(|end| end.x == self.x && end.y == self.y)
    }
}
