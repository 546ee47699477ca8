//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The relay exposes a single websocket endpoint plus a health check. When
//! `STATIC_DIR` is configured, the built canvas bundle is served from `/`
//! so one process hosts both the page and its relay.

pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz));

    if let Some(dir) = state.config.static_dir.as_ref() {
        tracing::info!(dir = %dir.display(), "serving static assets");
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
