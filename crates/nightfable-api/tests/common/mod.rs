//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use nightfable_core::generation::GenerationBackend;
use nightfable_narrative::domain::prompt::NarrativeSettings;
use nightfable_session::store::InMemorySessionRepository;
use nightfable_test_support::FixedClock;
use tower::ServiceExt;

use nightfable_api::app;
use nightfable_api::state::AppState;

/// Build the full app router over an in-memory session store and a fixed
/// clock. Uses the same route structure as `main.rs`.
pub fn build_test_app(backend: Arc<dyn GenerationBackend>) -> Router {
    let app_state = AppState::new(
        Arc::new(FixedClock::default()),
        backend,
        Arc::new(InMemorySessionRepository::new()),
        NarrativeSettings::default(),
    );
    app(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// A complete, valid profile body.
pub fn profile_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Lucía",
        "identity": "non_binary",
        "orientation": "all",
        "theme": "Encounter at a Bar"
    })
}

/// Create a session and confirm age; returns the session ID.
pub async fn session_in_setup(app: &Router) -> String {
    let (status, json) = post_empty(app.clone(), "/api/v1/sessions").await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["session_id"].as_str().unwrap().to_owned();

    let (status, json) =
        post_empty(app.clone(), &format!("/api/v1/sessions/{id}/age-confirmation")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "setup");

    id
}
