//! Routes for the Story Progression bounded context.
//!
//! Read-only catalogs a client needs to build the setup form and show pacing.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use nightfable_narrative::application::query_handlers::{self, PhaseView};

use crate::state::AppState;

/// Response body for GET /themes.
#[derive(Debug, Serialize)]
pub struct ThemesResponse {
    /// Theme names in display order; the first is the default.
    pub themes: Vec<&'static str>,
}

/// GET /themes
async fn list_themes() -> Json<ThemesResponse> {
    Json(ThemesResponse {
        themes: query_handlers::list_themes(),
    })
}

/// GET /phases
async fn list_phases() -> Json<Vec<PhaseView>> {
    Json(query_handlers::list_phases())
}

/// Returns the router for the narrative context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/themes", get(list_themes))
        .route("/phases", get(list_phases))
}
