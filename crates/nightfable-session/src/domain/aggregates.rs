//! Aggregate root for the Profile & Session context.

use chrono::{DateTime, Utc};
use nightfable_core::clock::Clock;
use nightfable_core::error::DomainError;
use nightfable_core::profile::Profile;
use nightfable_core::transcript::TranscriptEntry;
use nightfable_narrative::domain::segment::StorySegment;
use serde::Serialize;
use uuid::Uuid;

/// Where the reader is in the experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Waiting for the reader to confirm they are an adult.
    AgeGate,
    /// Collecting the profile.
    Setup,
    /// Story in progress.
    Playing,
    /// The current segment ended the story.
    Ended,
}

impl Step {
    /// Lower-case name used in errors and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AgeGate => "age_gate",
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::Ended => "ended",
        }
    }
}

/// Inputs captured when a continuation is started, so the backend call can
/// run without holding the session.
#[derive(Debug, Clone)]
pub struct PendingContinuation {
    /// Transcript before this exchange.
    pub transcript: Vec<TranscriptEntry>,
    /// The reader profile.
    pub profile: Profile,
}

/// The aggregate root for one reader's story session.
#[derive(Debug, Clone)]
pub struct StorySession {
    /// Aggregate identifier.
    pub id: Uuid,
    pub(crate) step: Step,
    pub(crate) profile: Profile,
    pub(crate) transcript: Vec<TranscriptEntry>,
    pub(crate) current_segment: Option<StorySegment>,
    pub(crate) loading: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl StorySession {
    /// Creates a new session at the age gate.
    #[must_use]
    pub fn new(id: Uuid, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            step: Step::AgeGate,
            profile: Profile::default(),
            transcript: Vec::new(),
            current_segment: None,
            loading: false,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// The profile (defaults until a story is started).
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The transcript so far.
    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// The most recent segment, if any.
    #[must_use]
    pub fn current_segment(&self) -> Option<&StorySegment> {
        self.current_segment.as_ref()
    }

    /// Whether a generation call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The user-facing message of the last failed call.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last state change.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of transcript entries.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    fn require_step(&self, expected: Step, action: &'static str) -> Result<(), DomainError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidStep {
                session_id: self.id,
                step: self.step.name(),
                action,
            })
        }
    }

    fn require_idle(&self) -> Result<(), DomainError> {
        if self.loading {
            Err(DomainError::GenerationInFlight(self.id))
        } else {
            Ok(())
        }
    }

    /// Confirms the reader is an adult and moves to setup.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` if not at the age gate.
    pub fn confirm_age(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_step(Step::AgeGate, "confirm age")?;
        self.step = Step::Setup;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Validates and records the profile and marks the session loading.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` outside setup,
    /// `DomainError::GenerationInFlight` while loading, and
    /// `DomainError::Validation` for an incomplete profile.
    pub fn begin_story(&mut self, profile: Profile, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_step(Step::Setup, "start a story")?;
        self.require_idle()?;
        profile.validate()?;

        self.profile = profile;
        self.loading = true;
        self.last_error = None;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Records the introduction segment and moves to play.
    pub fn complete_story_start(&mut self, segment: StorySegment, clock: &dyn Clock) {
        self.transcript = vec![TranscriptEntry::author(segment.content.clone())];
        self.current_segment = Some(segment);
        self.step = Step::Playing;
        self.loading = false;
        self.updated_at = clock.now();
    }

    /// Marks the session loading for a continuation and captures its inputs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` unless playing,
    /// `DomainError::GenerationInFlight` while loading, and
    /// `DomainError::Validation` for a blank action.
    pub fn begin_choice(
        &mut self,
        chosen_action: &str,
        clock: &dyn Clock,
    ) -> Result<PendingContinuation, DomainError> {
        self.require_step(Step::Playing, "choose an action")?;
        self.require_idle()?;
        if chosen_action.trim().is_empty() {
            return Err(DomainError::Validation(
                "chosen action must not be empty".to_owned(),
            ));
        }

        self.loading = true;
        self.last_error = None;
        self.updated_at = clock.now();
        Ok(PendingContinuation {
            transcript: self.transcript.clone(),
            profile: self.profile.clone(),
        })
    }

    /// Appends the exchange and the new segment; an ending segment ends the
    /// session.
    pub fn complete_choice(&mut self, chosen_action: &str, segment: StorySegment, clock: &dyn Clock) {
        self.transcript.push(TranscriptEntry::reader(chosen_action));
        self.transcript
            .push(TranscriptEntry::author(segment.content.clone()));
        if segment.is_ending {
            self.step = Step::Ended;
        }
        self.current_segment = Some(segment);
        self.loading = false;
        self.updated_at = clock.now();
    }

    /// Clears the loading flag and records a user-facing error. The
    /// transcript is left untouched.
    pub fn fail_generation(&mut self, message: impl Into<String>, clock: &dyn Clock) {
        self.loading = false;
        self.last_error = Some(message.into());
        self.updated_at = clock.now();
    }

    /// Clears the last error.
    pub fn dismiss_error(&mut self, clock: &dyn Clock) {
        self.last_error = None;
        self.updated_at = clock.now();
    }

    /// Discards the profile, transcript, and segment and returns to setup.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GenerationInFlight` while loading.
    pub fn reset(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_idle()?;
        self.step = Step::Setup;
        self.profile = Profile::default();
        self.transcript.clear();
        self.current_segment = None;
        self.last_error = None;
        self.updated_at = clock.now();
        Ok(())
    }
}
