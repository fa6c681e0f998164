//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session exists with the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A generation call is already running for the session.
    #[error("a story segment is already being generated for session {0}")]
    GenerationInFlight(Uuid),

    /// The requested action is not valid for the session's current step.
    #[error("cannot {action} while session {session_id} is in step {step}")]
    InvalidStep {
        /// The session that rejected the action.
        session_id: Uuid,
        /// The step the session was in.
        step: &'static str,
        /// The rejected action.
        action: &'static str,
    },

    /// Caller input failed validation before any backend call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The primary generation attempt failed.
    #[error("{0}")]
    Generation(String),

    /// Both the primary attempt and the soft retry failed.
    #[error("{0}")]
    SceneBlocked(String),

    /// An infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
