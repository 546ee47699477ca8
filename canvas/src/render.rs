//! Rendering: draws the full canvas scene to a 2D context.
//!
//! All drawing calls on [`web_sys::CanvasRenderingContext2d`] live here;
//! [`crate::engine::Engine`] only obtains the context and hands it over.
//! The functions receive read-only views of the store and UI state and
//! produce pixels. They do not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{HANDLE_SIZE_PX, SELECTION_COLOR, SELECTION_LINE_WIDTH};
use crate::doc::ShapeStore;
use crate::geom::Point;
use crate::hit;
use crate::input::UiState;
use crate::shape::{Geometry, Shape};

/// Draw the full scene: shapes in creation order, then handles on the selection.
///
/// `width` and `height` are the canvas dimensions in pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &ShapeStore,
    ui: &UiState,
    width: f64,
    height: f64,
) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, width, height);

    for shape in doc.iter() {
        draw_shape(ctx, shape)?;
        if ui.selected_id.as_ref() == Some(&shape.id) {
            draw_handles(ctx, shape);
        }
    }
    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    ctx.set_stroke_style_str(&shape.stroke_color);
    ctx.set_fill_style_str(&shape.fill_color);
    ctx.set_line_width(shape.size);

    match &shape.geometry {
        Geometry::Circle { .. } => draw_circle(ctx, shape),
        Geometry::Rectangle { end_x, end_y } => {
            draw_rect(ctx, shape, *end_x, *end_y);
            Ok(())
        }
        Geometry::Line { end_x, end_y } => {
            draw_polyline(ctx, shape, &[shape.origin(), Point::new(*end_x, *end_y)]);
            Ok(())
        }
        Geometry::Brush { points } => {
            draw_polyline(ctx, shape, points);
            Ok(())
        }
    }
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_circle(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let radius = shape.radius().unwrap_or_default();
    ctx.begin_path();
    ctx.arc(shape.x, shape.y, radius, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.stroke();
    Ok(())
}

fn draw_rect(ctx: &CanvasRenderingContext2d, shape: &Shape, end_x: f64, end_y: f64) {
    let w = end_x - shape.x;
    let h = end_y - shape.y;
    ctx.fill_rect(shape.x, shape.y, w, h);
    ctx.stroke_rect(shape.x, shape.y, w, h);
}

/// Lines and brush strokes are stroked with the fill colour.
fn draw_polyline(ctx: &CanvasRenderingContext2d, shape: &Shape, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.set_stroke_style_str(&shape.fill_color);
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
}

// =============================================================
// Selection UI
// =============================================================

fn draw_handles(ctx: &CanvasRenderingContext2d, shape: &Shape) {
    let half = HANDLE_SIZE_PX / 2.0;
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str(SELECTION_COLOR);
    ctx.set_line_width(SELECTION_LINE_WIDTH);
    for pos in hit::handle_positions(shape) {
        ctx.fill_rect(pos.x - half, pos.y - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX);
    }
    ctx.restore();
}
