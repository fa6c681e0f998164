//! Query handlers for the Profile & Session context.
//!
//! Read-only view DTOs over stored sessions.

use chrono::{DateTime, Utc};
use nightfable_core::error::DomainError;
use nightfable_core::profile::Profile;
use nightfable_core::transcript::TranscriptEntry;
use nightfable_narrative::domain::phase::{Phase, rule_for_turn};
use nightfable_narrative::domain::segment::StorySegment;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Step, StorySession};
use crate::store::SessionRepository;

/// Read-only view of a story session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Current step.
    pub step: Step,
    /// The reader profile.
    pub profile: Profile,
    /// Full transcript, oldest first.
    pub transcript: Vec<TranscriptEntry>,
    /// The segment whose choices are on offer.
    pub current_segment: Option<StorySegment>,
    /// Whether a generation call is running.
    pub is_loading: bool,
    /// User-facing message of the last failure.
    pub last_error: Option<String>,
    /// Number of transcript entries.
    pub turn_count: usize,
    /// Phase the next continuation will be paced in, while playing.
    pub next_phase: Option<Phase>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last state change.
    pub updated_at: DateTime<Utc>,
}

impl From<&StorySession> for SessionView {
    fn from(session: &StorySession) -> Self {
        let turn_count = session.turn_count();
        Self {
            session_id: session.id,
            step: session.step(),
            profile: session.profile().clone(),
            transcript: session.transcript().to_vec(),
            current_segment: session.current_segment().cloned(),
            is_loading: session.is_loading(),
            last_error: session.last_error().map(str::to_owned),
            turn_count,
            next_phase: (session.step() == Step::Playing)
                .then(|| rule_for_turn(turn_count).phase),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

/// Retrieves a session by its ID.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no session exists for the ID.
pub fn get_session_by_id(
    session_id: Uuid,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session = repo.load(session_id)?;
    Ok(SessionView::from(&session))
}
