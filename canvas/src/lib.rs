//! Drawing surface for the collaborative sketch canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! shape model, translates pointer input into shapes, hit-tests selections,
//! renders the scene to a 2D canvas context, and exchanges finalized shapes
//! with peers through the relay server. Everything except [`host`] and the
//! canvas-bound half of [`engine`] is plain Rust and tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`shape`] | Shape variants, identifiers, and the wire format |
//! | [`doc`] | Ordered in-memory shape store |
//! | [`geom`] | Points and distance helpers |
//! | [`input`] | Tool properties, selection, and the gesture state |
//! | [`hit`] | Hit-testing and selection handle placement |
//! | [`render`] | Scene rendering to `CanvasRenderingContext2d` |
//! | [`relay`] | Relay frames and the client connection lifecycle |
//! | [`consts`] | Shared constants (surface size, defaults, timings) |
//! | `host` | Browser bindings (`browser` feature only) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod relay;
pub mod render;
pub mod shape;

#[cfg(feature = "browser")]
pub mod host;
