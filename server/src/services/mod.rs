//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own registry and fan-out logic so route handlers can stay
//! focused on protocol translation.

pub mod relay;
