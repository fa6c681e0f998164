//! Integration tests for the Profile & Session bounded context.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use nightfable_core::generation::GenerationResponse;
use nightfable_test_support::{ScriptedBackend, fenced, segment_json};
use serde_json::json;

#[tokio::test]
async fn test_story_plays_through_to_ending_and_resets() {
    // Intro, eleven ordinary turns, one premature ending at turn 13, then a
    // real ending once turn 25 is reached.
    let mut texts = vec![segment_json("Intro.", false)];
    for turn in (1..25).step_by(2) {
        texts.push(fenced(&segment_json(&format!("Scene {turn}."), turn == 13)));
    }
    texts.push(segment_json("Dawn breaks.", true));
    let backend = Arc::new(ScriptedBackend::with_texts(texts));
    let app = common::build_test_app(backend.clone());
    let id = common::session_in_setup(&app).await;

    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/story"),
        &common::profile_body(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["turn_count"], 1);

    let mut last = json;
    while last["step"] == "playing" {
        let action = last["current_segment"]["choices"][0]["text"]
            .as_str()
            .unwrap()
            .to_owned();
        let (status, json) = common::post_json(
            app.clone(),
            &format!("/api/v1/sessions/{id}/choices"),
            &json!({ "chosen_action": action }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        last = json;
    }

    assert_eq!(last["step"], "ended");
    assert_eq!(last["turn_count"], 27);
    assert_eq!(last["current_segment"]["content"], "Dawn breaks.");
    assert_eq!(last["transcript"][1]["role"], "reader");
    assert_eq!(last["transcript"][1]["text"], "Lean closer");
    assert_eq!(backend.call_count(), 14);

    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/choices"),
        &json!({ "chosen_action": "Stay" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_step");

    let (status, once) =
        common::post_empty(app.clone(), &format!("/api/v1/sessions/{id}/reset")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, twice) = common::post_empty(app, &format!("/api/v1/sessions/{id}/reset")).await;
    assert_eq!(once["step"], "setup");
    assert_eq!(once["transcript"], json!([]));
    assert!(once["current_segment"].is_null());
    assert_eq!(once["profile"], twice["profile"]);
    assert_eq!(once["step"], twice["step"]);
    assert_eq!(twice["profile"]["name"], "");
}

#[tokio::test]
async fn test_soft_retry_recovers_blocked_scene() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(GenerationResponse::text(segment_json("Intro.", false))),
        Ok(GenerationResponse::blocked()),
        Ok(GenerationResponse::text(segment_json("A gentler scene.", false))),
    ]));
    let app = common::build_test_app(backend.clone());
    let id = common::session_in_setup(&app).await;
    common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/story"),
        &common::profile_body(),
    )
    .await;

    // Act
    let (status, json) = common::post_json(
        app,
        &format!("/api/v1/sessions/{id}/choices"),
        &json!({ "chosen_action": "Lean closer" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["turn_count"], 3);
    assert_eq!(json["current_segment"]["content"], "A gentler scene.");
    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2].temperature.is_none());
}

#[tokio::test]
async fn test_failed_choice_keeps_transcript_and_error_can_be_dismissed() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(GenerationResponse::text(segment_json("Intro.", false))),
        Ok(GenerationResponse::blocked()),
        Ok(GenerationResponse::text("definitely not json")),
        Ok(GenerationResponse::text(segment_json("Second try works.", false))),
    ]));
    let app = common::build_test_app(backend);
    let id = common::session_in_setup(&app).await;
    common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/story"),
        &common::profile_body(),
    )
    .await;

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/choices"),
        &json!({ "chosen_action": "Lean closer" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "scene_blocked");

    let (_, session) = common::get_json(app.clone(), &format!("/api/v1/sessions/{id}")).await;
    assert_eq!(session["turn_count"], 1);
    assert!(session["last_error"].is_string());
    assert_eq!(session["is_loading"], false);

    let (status, session) =
        common::post_empty(app.clone(), &format!("/api/v1/sessions/{id}/dismiss-error")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(session["last_error"].is_null());

    let (status, session) = common::post_json(
        app,
        &format!("/api/v1/sessions/{id}/choices"),
        &json!({ "chosen_action": "Lean closer" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["turn_count"], 3);
}

#[tokio::test]
async fn test_unknown_theme_is_rejected() {
    let app = common::build_test_app(Arc::new(ScriptedBackend::default()));
    let id = common::session_in_setup(&app).await;
    let mut profile = common::profile_body();
    profile["theme"] = json!("Space Opera");

    let (status, json) =
        common::post_json(app, &format!("/api/v1/sessions/{id}/story"), &profile).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_nonexistent_session_returns_404() {
    let app = common::build_test_app(Arc::new(ScriptedBackend::default()));

    let (status, json) = common::post_empty(
        app,
        &format!("/api/v1/sessions/{}/reset", uuid::Uuid::new_v4()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "session_not_found");
}
