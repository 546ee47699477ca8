//! Browser host: wires a canvas element, the engine, and the relay socket.
//!
//! Only compiled with the `browser` feature. The host owns every JS-facing
//! resource (DOM listeners, the sweep timer, the websocket task) and funnels
//! all of them through one `Rc<RefCell<Shared>>`, so the engine never sees
//! the browser directly.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::Message;
use gloo_net::websocket::futures::WebSocket;
use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, PointerEvent};

use crate::consts::{
    CANVAS_HEIGHT_PX, CANVAS_WIDTH_PX, RECONNECT_INITIAL_MS, RECONNECT_MAX_MS, STORAGE_KEY, SWEEP_INTERVAL_MS,
};
use crate::engine::{Action, Engine};
use crate::geom::Point;
use crate::relay::{ConnectionStatus, Inbound, RelayChannel};
use crate::shape::{ShapeKind, UnknownShapeKind};

type Listener = Closure<dyn FnMut(PointerEvent)>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).unwrap_or_default();
}

struct Shared {
    engine: Engine,
    relay: RelayChannel,
    /// Cleared on drop; stops the reconnect loop.
    alive: bool,
}

/// A drawing surface bound to one `<canvas>` and one relay endpoint.
#[wasm_bindgen]
pub struct SketchHost {
    shared: Rc<RefCell<Shared>>,
    listeners: Vec<(&'static str, Listener)>,
    /// Dropping the interval cancels the sweep.
    _sweeper: Interval,
}

#[wasm_bindgen]
impl SketchHost {
    /// Attach to `canvas` and start relaying through the websocket at `relay_url`.
    ///
    /// # Errors
    ///
    /// Fails if a DOM listener cannot be registered or the first render fails.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, relay_url: String) -> Result<SketchHost, JsValue> {
        canvas.set_width(CANVAS_WIDTH_PX);
        canvas.set_height(CANVAS_HEIGHT_PX);

        let shared = Rc::new(RefCell::new(Shared {
            engine: Engine::new(canvas.clone()),
            relay: RelayChannel::new(),
            alive: true,
        }));

        // Capture keeps the release on this canvas when it happens outside it.
        let listeners = vec![
            listen(&canvas, "pointerdown", &shared, |engine, ev| {
                if let Err(err) = engine.canvas().set_pointer_capture(ev.pointer_id()) {
                    log::debug!("pointer capture refused: {err:?}");
                }
                engine.on_pointer_down(pointer_point(ev))
            })?,
            listen(&canvas, "pointermove", &shared, |engine, ev| engine.on_pointer_move(pointer_point(ev)))?,
            listen(&canvas, "pointerup", &shared, release)?,
            listen(&canvas, "pointercancel", &shared, release)?,
        ];

        let sweeper = {
            let shared = Rc::clone(&shared);
            Interval::new(SWEEP_INTERVAL_MS, move || {
                let actions = shared.borrow_mut().engine.sweep();
                process(&shared, actions);
            })
        };

        wasm_bindgen_futures::spawn_local(relay_loop(Rc::clone(&shared), relay_url));
        shared.borrow().engine.render()?;
        log::info!("sketch host attached");

        Ok(SketchHost { shared, listeners, _sweeper: sweeper })
    }

    /// Select the kind drawn by the next gesture: `circle`, `rectangle`, `line` or `brush`.
    ///
    /// # Errors
    ///
    /// Rejects unknown kind names.
    pub fn set_tool(&self, kind: &str) -> Result<(), JsValue> {
        let kind: ShapeKind = kind.parse().map_err(|err: UnknownShapeKind| JsValue::from_str(&err.to_string()))?;
        self.shared.borrow_mut().engine.core.set_tool(kind);
        Ok(())
    }

    pub fn change_fill_color(&self, color: &str) {
        let actions = self.shared.borrow_mut().engine.core.change_fill_color(color);
        process(&self.shared, actions);
    }

    pub fn change_stroke_color(&self, color: &str) {
        let actions = self.shared.borrow_mut().engine.core.change_stroke_color(color);
        process(&self.shared, actions);
    }

    pub fn change_size(&self, size: f64) {
        let actions = self.shared.borrow_mut().engine.core.change_size(size);
        process(&self.shared, actions);
    }

    pub fn delete_selected(&self) {
        let actions = self.shared.borrow_mut().engine.delete_selected();
        process(&self.shared, actions);
    }

    pub fn clear(&self) {
        let actions = self.shared.borrow_mut().engine.clear();
        process(&self.shared, actions);
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.shared.borrow().engine.selection().is_some()
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shared.borrow().engine.shapes().len()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.borrow().relay.status() == ConnectionStatus::Connected
    }
}

impl Drop for SketchHost {
    fn drop(&mut self) {
        let canvas = self.shared.borrow().engine.canvas().clone();
        for (event, listener) in &self.listeners {
            if let Err(err) = canvas.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
                log::warn!("failed to remove {event} listener: {err:?}");
            }
        }
        let mut shared = self.shared.borrow_mut();
        shared.alive = false;
        shared.relay.detach();
    }
}

// =============================================================
// Actions
// =============================================================

fn process(shared: &Rc<RefCell<Shared>>, actions: Vec<Action>) {
    let mut shared = shared.borrow_mut();
    for action in actions {
        match action {
            Action::ShapeFinalized(shape) => {
                if let Err(err) = shared.relay.send(&shape) {
                    log::warn!("shape {} not relayed: {err}", shape.id);
                }
            }
            Action::StorageCleared => clear_storage(),
            Action::RenderNeeded => {
                if let Err(err) = shared.engine.render() {
                    log::error!("render failed: {err:?}");
                }
            }
        }
    }
}

fn clear_storage() {
    let Some(window) = web_sys::window() else {
        return;
    };
    match window.local_storage() {
        Ok(Some(storage)) => {
            if let Err(err) = storage.remove_item(STORAGE_KEY) {
                log::warn!("failed to drop persisted shapes: {err:?}");
            }
        }
        Ok(None) => {}
        Err(err) => log::warn!("local storage unavailable: {err:?}"),
    }
}

fn pointer_point(ev: &PointerEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

fn release(engine: &mut Engine, ev: &PointerEvent) -> Vec<Action> {
    let canvas = engine.canvas();
    if canvas.has_pointer_capture(ev.pointer_id()) {
        if let Err(err) = canvas.release_pointer_capture(ev.pointer_id()) {
            log::debug!("pointer release refused: {err:?}");
        }
    }
    engine.on_pointer_up()
}

fn listen<F>(
    canvas: &HtmlCanvasElement,
    event: &'static str,
    shared: &Rc<RefCell<Shared>>,
    handler: F,
) -> Result<(&'static str, Listener), JsValue>
where
    F: Fn(&mut Engine, &PointerEvent) -> Vec<Action> + 'static,
{
    let shared = Rc::clone(shared);
    let listener: Listener = Closure::wrap(Box::new(move |ev: PointerEvent| {
        let actions = handler(&mut shared.borrow_mut().engine, &ev);
        process(&shared, actions);
    }) as Box<dyn FnMut(PointerEvent)>);
    canvas.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
    Ok((event, listener))
}

// =============================================================
// Relay socket
// =============================================================

/// Keep a relay socket open for as long as the host lives, backing off
/// between attempts.
async fn relay_loop(shared: Rc<RefCell<Shared>>, url: String) {
    let mut backoff_ms = RECONNECT_INITIAL_MS;
    loop {
        if !shared.borrow().alive {
            break;
        }
        shared.borrow_mut().relay.connecting();
        match connect_and_run(&shared, &url).await {
            Ok(()) => log::info!("relay disconnected"),
            Err(err) => log::warn!("relay connect failed: {err}"),
        }
        shared.borrow_mut().relay.detach();
        if !shared.borrow().alive {
            break;
        }

        gloo_timers::future::sleep(Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(RECONNECT_MAX_MS);
    }
}

async fn connect_and_run(shared: &Rc<RefCell<Shared>>, url: &str) -> Result<(), String> {
    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();
    let (tx, mut rx) = mpsc::unbounded::<String>();
    // Stays `Connecting` until the server's first frame reaches `handle_inbound`.
    shared.borrow_mut().relay.attach(tx);

    // Ends when the channel is detached or the socket refuses a write.
    let send_task = async move {
        while let Some(text) = rx.next().await {
            if let Err(err) = ws_write.send(Message::Text(text)).await {
                log::warn!("relay send failed: {err}");
                break;
            }
        }
    };

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => handle_inbound(shared, &text),
                Ok(Message::Bytes(_)) => log::debug!("ignoring binary relay frame"),
                Err(err) => {
                    log::warn!("relay recv error: {err}");
                    break;
                }
            }
        }
    };

    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;
    Ok(())
}

fn handle_inbound(shared: &Rc<RefCell<Shared>>, text: &str) {
    let inbound = shared.borrow_mut().relay.receive(text);
    match inbound {
        Ok(Inbound::Shape(shape)) => {
            let actions = shared.borrow_mut().engine.apply_remote(shape);
            process(shared, actions);
        }
        Ok(Inbound::Connected { client_id }) => log::info!("relay session {client_id}"),
        Ok(Inbound::Ack) => {}
        Ok(Inbound::Error { message }) => log::warn!("relay rejected frame: {message}"),
        Ok(Inbound::Ignored { event }) => log::debug!("ignoring relay event {event}"),
        Err(err) => log::warn!("dropping malformed relay frame: {err}"),
    }
}
