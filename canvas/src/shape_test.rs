#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn props(kind: ShapeKind) -> ToolProperties {
    ToolProperties { kind, ..ToolProperties::default() }
}

// =============================================================
// ShapeId
// =============================================================

#[test]
fn generated_ids_are_unique() {
    let a = ShapeId::generate();
    let b = ShapeId::generate();
    assert_ne!(a, b);
    assert!(!a.as_str().is_empty());
}

#[test]
fn id_serializes_as_plain_string() {
    let id = ShapeId::from("lq2x9abcde");
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("lq2x9abcde"));
    assert_eq!(id.to_string(), "lq2x9abcde");
}

// =============================================================
// ShapeKind
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (ShapeKind::Circle, "\"circle\""),
        (ShapeKind::Rectangle, "\"rectangle\""),
        (ShapeKind::Line, "\"line\""),
        (ShapeKind::Brush, "\"brush\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        assert_eq!(kind.as_str(), expected.trim_matches('"'));
    }
}

#[test]
fn kind_from_str_parses_wire_names() {
    assert_eq!("circle".parse::<ShapeKind>(), Ok(ShapeKind::Circle));
    assert_eq!("rectangle".parse::<ShapeKind>(), Ok(ShapeKind::Rectangle));
    assert_eq!("line".parse::<ShapeKind>(), Ok(ShapeKind::Line));
    assert_eq!("brush".parse::<ShapeKind>(), Ok(ShapeKind::Brush));
}

#[test]
fn kind_from_str_rejects_unknown() {
    let err = "hexagon".parse::<ShapeKind>().unwrap_err();
    assert_eq!(err, UnknownShapeKind("hexagon".into()));
    assert_eq!(err.to_string(), "unknown shape kind: hexagon");
}

// =============================================================
// Shape::begin
// =============================================================

#[test]
fn begin_circle_collapses_end_onto_origin() {
    let shape = Shape::begin(ShapeId::from("a"), Point::new(10.0, 20.0), &props(ShapeKind::Circle));
    assert_eq!(shape.kind(), ShapeKind::Circle);
    assert_eq!(shape.origin(), Point::new(10.0, 20.0));
    assert_eq!(shape.end(), Some(Point::new(10.0, 20.0)));
    assert_eq!(shape.radius(), Some(0.0));
    assert!(shape.points().is_none());
}

#[test]
fn begin_brush_starts_single_point_polyline() {
    let shape = Shape::begin(ShapeId::from("b"), Point::new(3.0, 4.0), &props(ShapeKind::Brush));
    assert_eq!(shape.kind(), ShapeKind::Brush);
    assert_eq!(shape.points(), Some(&[Point::new(3.0, 4.0)][..]));
    assert!(shape.end().is_none());
    assert!(shape.radius().is_none());
}

#[test]
fn begin_copies_tool_style() {
    let tool = ToolProperties {
        kind: ShapeKind::Rectangle,
        stroke_color: "#111111".into(),
        fill_color: "#222222".into(),
        size: 7.0,
    };
    let shape = Shape::begin(ShapeId::from("c"), Point::new(0.0, 0.0), &tool);
    assert_eq!(shape.stroke_color, "#111111");
    assert_eq!(shape.fill_color, "#222222");
    assert_eq!(shape.size, 7.0);
}

// =============================================================
// Geometry mutation
// =============================================================

#[test]
fn extend_moves_end_point_for_line() {
    let mut shape = Shape::begin(ShapeId::from("l"), Point::new(0.0, 0.0), &props(ShapeKind::Line));
    shape.extend_to(Point::new(5.0, 6.0));
    shape.extend_to(Point::new(7.0, 8.0));
    assert_eq!(shape.end(), Some(Point::new(7.0, 8.0)));
    assert_eq!(shape.origin(), Point::new(0.0, 0.0));
}

#[test]
fn extend_appends_brush_points_in_order() {
    let mut shape = Shape::begin(ShapeId::from("b"), Point::new(0.0, 0.0), &props(ShapeKind::Brush));
    shape.extend_to(Point::new(1.0, 1.0));
    shape.extend_to(Point::new(2.0, 1.0));
    let pts = shape.points().unwrap();
    assert_eq!(pts.len(), 3);
    assert_eq!(pts[2], Point::new(2.0, 1.0));
}

#[test]
fn circle_radius_is_distance_to_end() {
    let mut shape = Shape::begin(ShapeId::from("c"), Point::new(100.0, 100.0), &props(ShapeKind::Circle));
    shape.extend_to(Point::new(103.0, 104.0));
    assert_eq!(shape.radius(), Some(5.0));
}

#[test]
fn degenerate_only_when_end_equals_origin() {
    let mut shape = Shape::begin(ShapeId::from("r"), Point::new(1.0, 1.0), &props(ShapeKind::Rectangle));
    assert!(shape.is_degenerate());
    shape.extend_to(Point::new(1.0, 9.0));
    assert!(!shape.is_degenerate());
    shape.extend_to(Point::new(1.0, 1.0));
    assert!(shape.is_degenerate());
}

#[test]
fn brush_is_never_degenerate() {
    let shape = Shape::begin(ShapeId::from("b"), Point::new(1.0, 1.0), &props(ShapeKind::Brush));
    assert!(!shape.is_degenerate());
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn line_serializes_to_wire_fields() {
    let mut shape = Shape::begin(ShapeId::from("id1"), Point::new(1.0, 2.0), &props(ShapeKind::Line));
    shape.extend_to(Point::new(3.0, 4.0));
    let value = serde_json::to_value(&shape).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "id1",
            "type": "line",
            "x": 1.0,
            "y": 2.0,
            "endX": 3.0,
            "endY": 4.0,
            "strokeColor": "#000000",
            "fillColor": "#00FF00",
            "size": 2.0,
        })
    );
}

#[test]
fn brush_serializes_points_without_end() {
    let shape = Shape::begin(ShapeId::from("id2"), Point::new(1.0, 2.0), &props(ShapeKind::Brush));
    let value = serde_json::to_value(&shape).unwrap();
    assert_eq!(value["type"], "brush");
    assert_eq!(value["points"], json!([{ "x": 1.0, "y": 2.0 }]));
    assert!(value.get("endX").is_none());
}

#[test]
fn deserializes_payload_from_browser_client() {
    let raw = r##"{
        "type": "circle", "x": 50, "y": 60, "endX": 53, "endY": 64,
        "strokeColor": "#000000", "size": 2, "fillColor": "#00FF00",
        "id": "lq2x9k3f1a"
    }"##;
    let shape: Shape = serde_json::from_str(raw).unwrap();
    assert_eq!(shape.id.as_str(), "lq2x9k3f1a");
    assert_eq!(shape.kind(), ShapeKind::Circle);
    assert_eq!(shape.radius(), Some(5.0));
}

#[test]
fn deserialize_rejects_unknown_type() {
    let raw = r#"{"type":"hexagon","x":0,"y":0,"strokeColor":"","fillColor":"","size":1,"id":"x"}"#;
    assert!(serde_json::from_str::<Shape>(raw).is_err());
}

#[test]
fn deserialize_rejects_circle_without_end() {
    let raw = r#"{"type":"circle","x":0,"y":0,"strokeColor":"","fillColor":"","size":1,"id":"x"}"#;
    assert!(serde_json::from_str::<Shape>(raw).is_err());
}
