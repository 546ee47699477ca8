//! WebSocket handler: bidirectional frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by event
//! - Broadcast frames from peers → forward to client
//!
//! Dispatch returns the frames owed to the sender; fan-out to peers goes
//! through the client's bounded queue in `services::relay`.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `session:connected` with `client_id`
//! 2. Register the client's queue with the relay
//! 3. `save shape data` → broadcast `get shape data`, reply `done`
//! 4. Close → remove the client from the relay

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::frame::{Data, FRAME_CODE, FRAME_MESSAGE, Frame, Status};
use crate::services;
use crate::services::relay::{
    DATA_CLIENT_ID, EVENT_GATEWAY_ERROR, EVENT_SAVE_SHAPE, EVENT_SESSION_CONNECTED, RelayError,
};
use crate::state::AppState;

/// Error code carried by `gateway:error` frames.
const E_INVALID_FRAME: &str = "E_INVALID_FRAME";

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for broadcast frames from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(state.config.client_queue_capacity);

    let welcome = Frame::request(EVENT_SESSION_CONNECTED, Data::new()).with_data(DATA_CLIENT_ID, client_id.to_string());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    services::relay::join(&state, client_id, client_tx).await;
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        debug!(%client_id, error = %e, "ws: recv failed");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => {
                        if dispatch_frame(&state, &mut socket, client_id, text.as_str()).await.is_err() {
                            break;
                        }
                    }
                    Message::Binary(_) => {
                        warn!(%client_id, "ws: binary frames are not supported");
                    }
                    Message::Close(_) => break,
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    services::relay::part(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

async fn dispatch_frame(state: &AppState, socket: &mut WebSocket, client_id: Uuid, text: &str) -> Result<(), ()> {
    for frame in process_inbound_text(state, client_id, text).await {
        send_frame(socket, &frame).await?;
    }
    Ok(())
}

/// Parse and process one inbound text frame and return frames for the sender.
///
/// Kept apart from the socket so tests can drive dispatch directly.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<Frame> {
    let mut req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            return vec![gateway_error(format!("invalid frame: {e}"))];
        }
    };

    // Stamp the connection's id as `from`.
    req.from = Some(client_id.to_string());

    if req.status != Status::Request {
        debug!(%client_id, id = %req.id, event = %req.event, status = ?req.status, "ws: ignoring non-request frame");
        return Vec::new();
    }

    info!(%client_id, id = %req.id, event = %req.event, "ws: recv frame");

    match req.event.as_str() {
        EVENT_SAVE_SHAPE => match services::relay::relay_shape(state, client_id, &req).await {
            Ok(delivered) => {
                debug!(%client_id, id = %req.id, delivered, "ws: shape relayed");
                vec![req.done()]
            }
            Err(e) => vec![req.error_from(&e)],
        },
        other => vec![req.error_from(&RelayError::UnknownEvent(other.to_string()))],
    }
}

fn gateway_error(message: String) -> Frame {
    let mut frame = Frame::request(EVENT_GATEWAY_ERROR, Data::new())
        .with_data(FRAME_CODE, E_INVALID_FRAME)
        .with_data(FRAME_MESSAGE, message);
    frame.status = Status::Error;
    frame
}

// =============================================================================
// SEND
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let code = frame
            .data
            .get(FRAME_CODE)
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        let message = frame
            .data
            .get(FRAME_MESSAGE)
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        warn!(id = %frame.id, event = %frame.event, code, message, "ws: send frame status=Error");
    } else {
        debug!(id = %frame.id, event = %frame.event, status = ?frame.status, "ws: send frame");
    }
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| debug!(error = %e, "ws: send failed"))
}
