//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the relay configuration and the registry of connected clients, each
//! represented by the sender half of its bounded outbound queue.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::frame::Frame;

/// Connected clients: `client_id` -> sender for outgoing frames.
pub type ClientMap = HashMap<Uuid, mpsc::Sender<Frame>>;

/// Clone is required by Axum; every field is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<RwLock<ClientMap>>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self { clients: Arc::new(RwLock::new(HashMap::new())), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
