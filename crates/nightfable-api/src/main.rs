//! Nightfable API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use nightfable_api::config::ServerConfig;
use nightfable_api::error::AppError;
use nightfable_api::state::AppState;
use nightfable_api::{app, telemetry};
use nightfable_core::clock::SystemClock;
use nightfable_gemini::GeminiClient;
use nightfable_narrative::domain::prompt::NarrativeSettings;
use nightfable_session::store::InMemorySessionRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ServerConfig::from_env()?;
    let _telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(model = %config.gemini_model, "Starting Nightfable API server");

    let backend = GeminiClient::new(config.gemini_api_key.clone())
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());

    let mut settings = NarrativeSettings::default();
    if let Some(language) = &config.narration_language {
        settings.language.clone_from(language);
    }

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(backend),
        Arc::new(InMemorySessionRepository::new()),
        settings,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
