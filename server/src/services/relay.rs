//! Relay service: client registry and shape fan-out.
//!
//! DESIGN
//! ======
//! The relay keeps no shape history. A saved shape is validated only for the
//! presence of its payload, rewrapped as a `get shape data` broadcast, and
//! pushed onto every other client's bounded queue. Payload contents are
//! opaque here; clients own the shape model.
//!
//! BACKPRESSURE
//! ============
//! Broadcast uses `try_send`, so a full or closed queue drops that client's
//! copy instead of stalling the sender. Drops are logged at warn.

#[cfg(test)]
#[path = "relay_test.rs"]
mod relay_test;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::frame::{Data, ErrorCode, Frame};
use crate::state::AppState;

// =============================================================================
// EVENTS
// =============================================================================

/// Inbound: a client finalized a shape.
pub const EVENT_SAVE_SHAPE: &str = "save shape data";

/// Outbound: a shape saved by some client.
pub const EVENT_SHAPE_BROADCAST: &str = "get shape data";

/// Outbound: first frame on every connection.
pub const EVENT_SESSION_CONNECTED: &str = "session:connected";

/// Outbound: the inbound text could not be parsed as a frame.
pub const EVENT_GATEWAY_ERROR: &str = "gateway:error";

/// Frame data key holding the shape payload.
pub const DATA_SHAPE: &str = "shape";

/// Frame data key holding the server-assigned client id.
pub const DATA_CLIENT_ID: &str = "client_id";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0} requires a shape")]
    ShapeRequired(String),
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

impl ErrorCode for RelayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ShapeRequired(_) => "E_SHAPE_REQUIRED",
            Self::UnknownEvent(_) => "E_UNKNOWN_EVENT",
        }
    }
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Register a client's outbound queue.
pub async fn join(state: &AppState, client_id: Uuid, tx: mpsc::Sender<Frame>) {
    let count = {
        let mut clients = state.clients.write().await;
        clients.insert(client_id, tx);
        clients.len()
    };
    info!(%client_id, clients = count, "relay: client joined");
}

/// Remove a client. Returns whether it was registered.
pub async fn part(state: &AppState, client_id: Uuid) -> bool {
    let (removed, count) = {
        let mut clients = state.clients.write().await;
        let removed = clients.remove(&client_id).is_some();
        (removed, clients.len())
    };
    if removed {
        info!(%client_id, clients = count, "relay: client parted");
    }
    removed
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Send `frame` to every registered client except `exclude`.
///
/// Returns the number of clients the frame was queued for.
pub async fn broadcast(state: &AppState, frame: &Frame, exclude: Option<Uuid>) -> usize {
    let clients = state.clients.read().await;
    let mut delivered = 0;

    for (client_id, tx) in clients.iter() {
        if exclude == Some(*client_id) {
            continue;
        }
        match tx.try_send(frame.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                warn!(%client_id, event = %frame.event, "relay: client queue full, frame dropped");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(%client_id, event = %frame.event, "relay: client queue closed");
            }
        }
    }
    delivered
}

// =============================================================================
// SHAPES
// =============================================================================

/// Build the broadcast frame for a `save shape data` request.
///
/// # Errors
///
/// Returns [`RelayError::ShapeRequired`] when the request carries no shape.
pub fn shape_broadcast(req: &Frame, from: Uuid) -> Result<Frame, RelayError> {
    let Some(shape) = req.data.get(DATA_SHAPE) else {
        return Err(RelayError::ShapeRequired(req.event.clone()));
    };
    let mut data = Data::new();
    data.insert(DATA_SHAPE.into(), shape.clone());
    Ok(Frame::request(EVENT_SHAPE_BROADCAST, data).with_from(from.to_string()))
}

/// Fan a saved shape out to peers (or to everyone when echo is on).
///
/// Returns the number of clients the broadcast was queued for.
///
/// # Errors
///
/// Returns [`RelayError::ShapeRequired`] when the request carries no shape.
pub async fn relay_shape(state: &AppState, client_id: Uuid, req: &Frame) -> Result<usize, RelayError> {
    let frame = shape_broadcast(req, client_id)?;
    let exclude = if state.config.echo { None } else { Some(client_id) };
    Ok(broadcast(state, &frame, exclude).await)
}
