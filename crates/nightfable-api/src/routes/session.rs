//! Routes for the Profile & Session bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use nightfable_core::profile::Profile;
use nightfable_session::application::command_handlers;
use nightfable_session::application::query_handlers::{self, SessionView};
use nightfable_session::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{id}/choices.
#[derive(Debug, Deserialize)]
pub struct ChooseActionRequest {
    /// Text of the chosen choice.
    pub chosen_action: String,
}

/// POST /
#[instrument(skip(state))]
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let command = commands::CreateSession {
        correlation_id: Uuid::new_v4(),
    };

    let view =
        command_handlers::handle_create_session(&command, state.clock.as_ref(), &*state.sessions)?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /{id}
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_by_id(session_id, &*state.sessions)?;
    Ok(Json(view))
}

/// POST /{id}/age-confirmation
#[instrument(skip(state))]
async fn confirm_age(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ConfirmAge {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling confirm_age command");

    let view =
        command_handlers::handle_confirm_age(&command, state.clock.as_ref(), &*state.sessions)?;
    Ok(Json(view))
}

/// POST /{id}/story
#[instrument(skip(state, profile), fields(theme = %profile.theme))]
async fn begin_story(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(profile): Json<Profile>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::BeginStory {
        correlation_id: Uuid::new_v4(),
        session_id,
        profile,
    };

    info!(correlation_id = %command.correlation_id, "handling begin_story command");

    let view = command_handlers::handle_begin_story(
        &command,
        state.clock.as_ref(),
        &state.settings,
        state.backend.as_ref(),
        &*state.sessions,
    )
    .await?;
    Ok(Json(view))
}

/// POST /{id}/choices
#[instrument(skip(state, request))]
async fn choose_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChooseActionRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ChooseAction {
        correlation_id: Uuid::new_v4(),
        session_id,
        chosen_action: request.chosen_action,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_action command");

    let view = command_handlers::handle_choose_action(
        &command,
        state.clock.as_ref(),
        &state.settings,
        state.backend.as_ref(),
        &*state.sessions,
    )
    .await?;
    Ok(Json(view))
}

/// POST /{id}/dismiss-error
async fn dismiss_error(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::DismissError {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    let view =
        command_handlers::handle_dismiss_error(&command, state.clock.as_ref(), &*state.sessions)?;
    Ok(Json(view))
}

/// POST /{id}/reset
#[instrument(skip(state))]
async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ResetSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    let view =
        command_handlers::handle_reset_session(&command, state.clock.as_ref(), &*state.sessions)?;
    Ok(Json(view))
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session))
        .route("/{id}/age-confirmation", post(confirm_age))
        .route("/{id}/story", post(begin_story))
        .route("/{id}/choices", post(choose_action))
        .route("/{id}/dismiss-error", post(dismiss_error))
        .route("/{id}/reset", post(reset_session))
}
