//! Shared application state.

use std::sync::Arc;

use nightfable_core::clock::Clock;
use nightfable_core::generation::GenerationBackend;
use nightfable_narrative::domain::prompt::NarrativeSettings;
use nightfable_session::store::SessionRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Wall clock for session timestamps.
    pub clock: Arc<dyn Clock>,
    /// Hosted model the story orchestrator calls.
    pub backend: Arc<dyn GenerationBackend>,
    /// Story sessions.
    pub sessions: Arc<dyn SessionRepository>,
    /// Prompt tunables.
    pub settings: Arc<NarrativeSettings>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        backend: Arc<dyn GenerationBackend>,
        sessions: Arc<dyn SessionRepository>,
        settings: NarrativeSettings,
    ) -> Self {
        Self {
            clock,
            backend,
            sessions,
            settings: Arc::new(settings),
        }
    }
}
