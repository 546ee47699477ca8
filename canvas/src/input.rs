//! Input model: tool properties, selection, and the drawing gesture state.
//!
//! `ToolProperties` captures what the property panel has chosen for new
//! shapes. `UiState` is what the renderer needs to know beyond the document
//! (which shape is selected). `InputState` tracks the gesture between
//! pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_FILL_COLOR, DEFAULT_SIZE, DEFAULT_STROKE_COLOR};
use crate::shape::{ShapeId, ShapeKind};

/// Properties applied to newly drawn shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolProperties {
    /// Which shape the next pointer-down draws.
    pub kind: ShapeKind,
    /// Outline colour for new shapes.
    pub stroke_color: String,
    /// Fill colour for new shapes.
    pub fill_color: String,
    /// Stroke width for new shapes, in pixels.
    pub size: f64,
}

impl Default for ToolProperties {
    fn default() -> Self {
        Self {
            kind: ShapeKind::default(),
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            fill_color: DEFAULT_FILL_COLOR.to_owned(),
            size: DEFAULT_SIZE,
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Properties used for the next shape.
    pub props: ToolProperties,
    /// The currently selected shape, if any.
    pub selected_id: Option<ShapeId>,
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A new shape is being drawn; it already sits provisionally in the store.
    Drawing {
        /// Id of the in-progress shape.
        id: ShapeId,
    },
}
