//! Shared constants for the canvas crate.

// ── Surface ─────────────────────────────────────────────────────

/// Width of the drawable region in CSS pixels.
pub const CANVAS_WIDTH_PX: u32 = 800;

/// Height of the drawable region in CSS pixels.
pub const CANVAS_HEIGHT_PX: u32 = 600;

/// How often degenerate shapes are swept from the document.
pub const SWEEP_INTERVAL_MS: u32 = 500;

/// Local storage key holding persisted shapes.
pub const STORAGE_KEY: &str = "shapes";

// ── Tool defaults ───────────────────────────────────────────────

pub const DEFAULT_STROKE_COLOR: &str = "#000000";
pub const DEFAULT_FILL_COLOR: &str = "#00FF00";
pub const DEFAULT_SIZE: f64 = 2.0;

// ── Selection ───────────────────────────────────────────────────

/// Side length of the square selection handles, in pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Colour of selection handles.
pub const SELECTION_COLOR: &str = "blue";

/// Line width used while drawing selection handles.
pub const SELECTION_LINE_WIDTH: f64 = 2.0;

// ── Relay ───────────────────────────────────────────────────────

/// First reconnect delay after the relay socket drops.
pub const RECONNECT_INITIAL_MS: u32 = 1_000;

/// Reconnect delays double up to this ceiling.
pub const RECONNECT_MAX_MS: u32 = 10_000;
