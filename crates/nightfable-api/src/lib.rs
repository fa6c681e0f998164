//! Nightfable HTTP API.
//!
//! Exposes the story session lifecycle and the read-only story catalogs over
//! JSON. The binary in `main.rs` wires configuration, telemetry, and the
//! Gemini backend into [`app`].

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the full router over the given state.
pub fn app(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the web client's origin once it is deployed.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/narrative", routes::narrative::router())
        .nest("/api/v1/sessions", routes::session::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
