//! Client side of the shape relay.
//!
//! DESIGN
//! ======
//! `RelayChannel` owns the connection lifecycle explicitly instead of relying
//! on a global socket. The transport (a browser websocket in the host) hands
//! the channel an outbound queue when it connects and takes it back when the
//! socket closes. While detached, `send` fails with
//! [`RelayError::Disconnected`]; nothing is buffered or retried here.
//!
//! WIRE
//! ====
//! Text frames are JSON objects with an `event` name, a `status`, and a flat
//! `data` map. Finalized shapes go out as `save shape data` with the shape
//! under `data.shape`; the server fans them out as `get shape data`.

#[cfg(test)]
#[path = "relay_test.rs"]
mod relay_test;

use futures::channel::mpsc::UnboundedSender;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::Shape;

/// Outbound event carrying a finalized shape.
pub const EVENT_SAVE_SHAPE: &str = "save shape data";

/// Inbound event carrying a shape broadcast by a peer.
pub const EVENT_SHAPE_BROADCAST: &str = "get shape data";

/// First frame the server sends on a new connection.
pub const EVENT_SESSION_CONNECTED: &str = "session:connected";

/// Frame data key holding the shape payload.
pub const DATA_SHAPE: &str = "shape";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay channel is disconnected")]
    Disconnected,
    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("frame carries no shape")]
    MissingShape,
}

/// Connection lifecycle of the relay channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No socket; sends fail.
    #[default]
    Disconnected,
    /// Socket handshake in progress.
    Connecting,
    /// The server has spoken on the socket; sends are queued to it.
    Connected,
}

/// Lifecycle position of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    #[default]
    Request,
    Done,
    Error,
}

/// A relay frame as seen by the browser client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayFrame {
    pub id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Milliseconds since the Unix epoch. Stamped by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub from: Option<String>,
    pub event: String,
    #[serde(default)]
    pub status: FrameStatus,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RelayFrame {
    /// Build a request frame for `event`.
    #[must_use]
    pub fn request(event: impl Into<String>, data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: None,
            ts: None,
            from: None,
            event: event.into(),
            status: FrameStatus::Request,
            data,
        }
    }
}

/// What an inbound text frame meant for the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A peer's finalized shape to append locally.
    Shape(Shape),
    /// The server accepted the connection and assigned an id.
    Connected { client_id: String },
    /// The server acknowledged one of our sends.
    Ack,
    /// The server rejected one of our frames.
    Error { message: String },
    /// An event this client does not handle.
    Ignored { event: String },
}

/// Encode a finalized shape as an outbound `save shape data` frame.
///
/// # Errors
///
/// Returns [`RelayError::Encode`] if the shape cannot be serialized.
pub fn encode_shape(shape: &Shape) -> Result<String, RelayError> {
    let value = serde_json::to_value(shape).map_err(RelayError::Encode)?;
    let mut data = serde_json::Map::new();
    data.insert(DATA_SHAPE.into(), value);
    serde_json::to_string(&RelayFrame::request(EVENT_SAVE_SHAPE, data)).map_err(RelayError::Encode)
}

/// Interpret an inbound text frame.
///
/// # Errors
///
/// Returns [`RelayError::Decode`] for malformed JSON or a malformed shape, and
/// [`RelayError::MissingShape`] for a broadcast without a shape.
pub fn decode_inbound(text: &str) -> Result<Inbound, RelayError> {
    let mut frame: RelayFrame = serde_json::from_str(text).map_err(RelayError::Decode)?;

    if frame.status == FrameStatus::Error {
        let message = frame
            .data
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("relay error")
            .to_owned();
        return Ok(Inbound::Error { message });
    }

    match frame.event.as_str() {
        EVENT_SHAPE_BROADCAST => {
            let value = frame.data.remove(DATA_SHAPE).ok_or(RelayError::MissingShape)?;
            let shape = serde_json::from_value(value).map_err(RelayError::Decode)?;
            Ok(Inbound::Shape(shape))
        }
        EVENT_SESSION_CONNECTED => {
            let client_id = frame
                .data
                .get("client_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned();
            Ok(Inbound::Connected { client_id })
        }
        EVENT_SAVE_SHAPE if frame.status == FrameStatus::Done => Ok(Inbound::Ack),
        _ => Ok(Inbound::Ignored { event: frame.event }),
    }
}

/// The surface's handle on the relay connection.
#[derive(Debug, Default)]
pub struct RelayChannel {
    status: ConnectionStatus,
    outbound: Option<UnboundedSender<String>>,
    /// Sender for a socket that has not yet delivered a frame.
    pending: Option<UnboundedSender<String>>,
    client_id: Option<String>,
}

impl RelayChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Server-assigned id of this connection, once `session:connected` arrived.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// A socket is being opened.
    pub fn connecting(&mut self) {
        self.outbound = None;
        self.pending = None;
        self.status = ConnectionStatus::Connecting;
    }

    /// A socket was opened with `outbound` as its write half. The channel
    /// stays `Connecting` until [`receive`](Self::receive) sees the first
    /// frame from the server.
    pub fn attach(&mut self, outbound: UnboundedSender<String>) {
        self.outbound = None;
        self.pending = Some(outbound);
        self.status = ConnectionStatus::Connecting;
    }

    /// Tear the channel down. Dropping the sender ends the transport's write loop.
    pub fn detach(&mut self) {
        for tx in [self.outbound.take(), self.pending.take()].into_iter().flatten() {
            tx.close_channel();
        }
        self.client_id = None;
        self.status = ConnectionStatus::Disconnected;
    }

    /// Broadcast a finalized shape. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Disconnected`] when no socket is attached or the
    /// transport already went away, and [`RelayError::Encode`] if the shape
    /// cannot be serialized.
    pub fn send(&mut self, shape: &Shape) -> Result<(), RelayError> {
        let Some(tx) = self.outbound.as_ref() else {
            return Err(RelayError::Disconnected);
        };
        let text = encode_shape(shape)?;
        if tx.unbounded_send(text).is_err() {
            self.detach();
            return Err(RelayError::Disconnected);
        }
        Ok(())
    }

    /// Interpret an inbound frame, tracking the session id as a side effect.
    ///
    /// Any frame, even one that fails to decode, proves the socket is live and
    /// promotes an attached sender to `Connected`.
    ///
    /// # Errors
    ///
    /// See [`decode_inbound`].
    pub fn receive(&mut self, text: &str) -> Result<Inbound, RelayError> {
        if let Some(tx) = self.pending.take() {
            self.outbound = Some(tx);
            self.status = ConnectionStatus::Connected;
        }
        let inbound = decode_inbound(text)?;
        if let Inbound::Connected { client_id } = &inbound {
            self.client_id = Some(client_id.clone());
        }
        Ok(inbound)
    }
}
