use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::doc::ShapeStore;
use crate::geom::Point;
use crate::hit;
use crate::input::{InputState, ToolProperties, UiState};
use crate::render;
use crate::shape::{Shape, ShapeId, ShapeKind};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A stroke was completed; the host pushes it to the relay.
    ShapeFinalized(Shape),
    /// The canvas was cleared; the host drops persisted local state.
    StorageCleared,
    /// The scene changed and should be redrawn.
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: ShapeStore,
    pub ui: UiState,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Pointer input ---

    /// Pointer pressed at `pt`.
    ///
    /// Outside brush mode, existing shapes are hit-tested topmost-first. A hit
    /// selects that shape and nothing is drawn. Otherwise the selection is
    /// cleared and a new shape begins with the current tool properties.
    ///
    /// A gesture whose release was never seen is finalized first.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = self.finish_gesture();

        if self.ui.props.kind != ShapeKind::Brush {
            if let Some(id) = hit::hit_test(pt, &self.doc) {
                self.ui.selected_id = Some(id);
                actions.push(Action::RenderNeeded);
                return actions;
            }
            self.ui.selected_id = None;
        }

        let shape = Shape::begin(ShapeId::generate(), pt, &self.ui.props);
        self.input = InputState::Drawing { id: shape.id.clone() };
        self.doc.insert(shape);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pointer moved to `pt`. Grows the in-progress shape, if any.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let InputState::Drawing { id } = &self.input else {
            return Vec::new();
        };
        let Some(shape) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        shape.extend_to(pt);
        vec![Action::RenderNeeded]
    }

    /// Pointer released. Finalizes the in-progress shape for the relay.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Leave `Drawing`, yielding the in-progress shape for the relay.
    fn finish_gesture(&mut self) -> Vec<Action> {
        let InputState::Drawing { id } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        self.doc
            .get(&id)
            .map(|shape| vec![Action::ShapeFinalized(shape.clone())])
            .unwrap_or_default()
    }

    // --- Selection edits ---

    /// Delete the selected shape. No-op without a selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.take() else {
            return Vec::new();
        };
        if self.doc.remove(&id).is_none() {
            return Vec::new();
        }
        vec![Action::RenderNeeded]
    }

    /// Set the fill colour of the selected shape.
    pub fn set_fill_color(&mut self, color: &str) -> Vec<Action> {
        self.edit_selected(|shape| shape.fill_color = color.to_owned())
    }

    /// Set the stroke colour of the selected shape.
    pub fn set_stroke_color(&mut self, color: &str) -> Vec<Action> {
        self.edit_selected(|shape| shape.stroke_color = color.to_owned())
    }

    /// Set the stroke width of the selected shape.
    pub fn set_stroke_size(&mut self, size: f64) -> Vec<Action> {
        self.edit_selected(|shape| shape.size = size)
    }

    fn edit_selected<F>(&mut self, edit: F) -> Vec<Action>
    where
        F: FnOnce(&mut Shape),
    {
        let Some(id) = &self.ui.selected_id else {
            return Vec::new();
        };
        let Some(shape) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        edit(shape);
        vec![Action::RenderNeeded]
    }

    // --- Property panel ---

    /// Choose the shape kind drawn by the next pointer-down.
    pub fn set_tool(&mut self, kind: ShapeKind) {
        self.ui.props.kind = kind;
    }

    pub fn set_tool_fill_color(&mut self, color: &str) {
        self.ui.props.fill_color = color.to_owned();
    }

    pub fn set_tool_stroke_color(&mut self, color: &str) {
        self.ui.props.stroke_color = color.to_owned();
    }

    pub fn set_tool_size(&mut self, size: f64) {
        self.ui.props.size = size;
    }

    /// Fill colour from the panel: edits the selection if there is one,
    /// otherwise the tool default.
    pub fn change_fill_color(&mut self, color: &str) -> Vec<Action> {
        if self.ui.selected_id.is_some() {
            return self.set_fill_color(color);
        }
        self.set_tool_fill_color(color);
        Vec::new()
    }

    /// Stroke colour from the panel, routed like [`Self::change_fill_color`].
    pub fn change_stroke_color(&mut self, color: &str) -> Vec<Action> {
        if self.ui.selected_id.is_some() {
            return self.set_stroke_color(color);
        }
        self.set_tool_stroke_color(color);
        Vec::new()
    }

    /// Stroke width from the panel, routed like [`Self::change_fill_color`].
    pub fn change_size(&mut self, size: f64) -> Vec<Action> {
        if self.ui.selected_id.is_some() {
            return self.set_stroke_size(size);
        }
        self.set_tool_size(size);
        Vec::new()
    }

    // --- Whole-document operations ---

    /// Remove every shape, the selection, and any stroke in progress.
    pub fn clear(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        vec![Action::StorageCleared, Action::RenderNeeded]
    }

    /// Drop zero-length shapes (end point exactly on the origin).
    ///
    /// The shape currently being drawn is exempt: it starts zero-length and
    /// only grows on the next pointer-move.
    pub fn sweep(&mut self) -> Vec<Action> {
        let drawing = match &self.input {
            InputState::Drawing { id } => Some(id.clone()),
            InputState::Idle => None,
        };
        let removed = self
            .doc
            .retain(|shape| !shape.is_degenerate() || drawing.as_ref() == Some(&shape.id));
        if removed == 0 {
            return Vec::new();
        }
        if let Some(sel) = &self.ui.selected_id {
            if !self.doc.contains(sel) {
                self.ui.selected_id = None;
            }
        }
        vec![Action::RenderNeeded]
    }

    // --- Relay input ---

    /// Ingest a shape broadcast by another client.
    pub fn apply_remote(&mut self, shape: Shape) -> Vec<Action> {
        self.doc.insert(shape);
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ShapeId> {
        self.ui.selected_id.as_ref()
    }

    /// All shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.doc.as_slice()
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn tool_properties(&self) -> &ToolProperties {
        &self.ui.props
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.input, InputState::Drawing { .. })
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // --- Delegated input ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_down(pt)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn apply_remote(&mut self, shape: Shape) -> Vec<Action> {
        self.core.apply_remote(shape)
    }

    pub fn sweep(&mut self) -> Vec<Action> {
        self.core.sweep()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear()
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.core.delete_selected()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// Silently does nothing when the element has no 2D context.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.context()? else {
            return Ok(());
        };
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        render::draw(&ctx, &self.core.doc, &self.core.ui, width, height)
    }

    fn context(&self) -> Result<Option<CanvasRenderingContext2d>, JsValue> {
        let Some(obj) = self.canvas.get_context("2d")? else {
            return Ok(None);
        };
        match obj.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => Ok(Some(ctx)),
            Err(_) => Ok(None),
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&ShapeId> {
        self.core.selection()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.core.shapes()
    }
}
