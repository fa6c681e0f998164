//! Command handlers for the Profile & Session context.
//!
//! Generation handlers flip the loading flag under the store lock, call the
//! story orchestrator without holding it, then apply the outcome. Failures
//! leave the transcript untouched and record a user-facing message.

use nightfable_core::clock::Clock;
use nightfable_core::command::Command;
use nightfable_core::error::DomainError;
use nightfable_core::generation::GenerationBackend;
use nightfable_narrative::application::command_handlers::{
    handle_continue_story, handle_start_story,
};
use nightfable_narrative::domain::commands::{ContinueStory, StartStory};
use nightfable_narrative::domain::errors::StoryError;
use nightfable_narrative::domain::prompt::NarrativeSettings;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::query_handlers::SessionView;
use crate::domain::aggregates::{PendingContinuation, StorySession};
use crate::domain::commands::{
    BeginStory, ChooseAction, ConfirmAge, CreateSession, DismissError, ResetSession,
};
use crate::store::SessionRepository;

/// Shown when the introduction could not be generated.
pub const START_FAILED_MESSAGE: &str = "Failed to start the story. Please try again.";

/// Shown when a continuation failed after the soft retry.
pub const CONTINUE_FAILED_MESSAGE: &str =
    "Connection interrupted or content blocked. Try choosing again.";

/// Shown when the model's reply could not be read as a segment.
pub const FORMAT_ERROR_MESSAGE: &str =
    "The story came back in an unreadable format. Please try again.";

/// Shown when a generation call was abandoned before it completed.
pub const INTERRUPTED_MESSAGE: &str = "The request was interrupted. Please try again.";

/// Clears the loading flag if a generation call is dropped mid-flight, so a
/// cancelled request cannot wedge the session.
struct LoadingGuard<'a> {
    session_id: Uuid,
    repo: &'a dyn SessionRepository,
    clock: &'a dyn Clock,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(session_id: Uuid, repo: &'a dyn SessionRepository, clock: &'a dyn Clock) -> Self {
        Self {
            session_id,
            repo,
            clock,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(session_id = %self.session_id, "generation abandoned; clearing loading flag");
            if let Err(e) = self.repo.update(self.session_id, &mut |session| {
                session.fail_generation(INTERRUPTED_MESSAGE, self.clock);
                Ok(())
            }) {
                warn!(session_id = %self.session_id, error = %e, "could not clear loading flag");
            }
        }
    }
}

fn user_message(error: &StoryError, fallback: &'static str) -> &'static str {
    if error.is_decode_failure() {
        FORMAT_ERROR_MESSAGE
    } else {
        fallback
    }
}

fn record_failure(
    session_id: Uuid,
    message: &'static str,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) {
    if let Err(e) = repo.update(session_id, &mut |session| {
        session.fail_generation(message, clock);
        Ok(())
    }) {
        warn!(%session_id, error = %e, "could not record generation failure");
    }
}

/// Handles the `CreateSession` command: opens a session at the age gate.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store is unusable.
pub fn handle_create_session(
    command: &CreateSession,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session = StorySession::new(Uuid::new_v4(), clock);
    let view = SessionView::from(&session);
    repo.insert(session)?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        session_id = %view.session_id,
        "session created"
    );
    Ok(view)
}

/// Handles the `ConfirmAge` command.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` or `DomainError::InvalidStep`.
pub fn handle_confirm_age(
    command: &ConfirmAge,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session = repo.update(command.session_id, &mut |s| s.confirm_age(clock))?;
    Ok(SessionView::from(&session))
}

/// Handles the `BeginStory` command: validates the profile, requests the
/// introduction, and moves the session to play.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an incomplete profile,
/// `DomainError::GenerationInFlight` if a call is already running, and
/// `DomainError::Generation` if the introduction could not be produced.
pub async fn handle_begin_story(
    command: &BeginStory,
    clock: &dyn Clock,
    settings: &NarrativeSettings,
    backend: &dyn GenerationBackend,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session_id = command.session_id;
    repo.update(session_id, &mut |s| {
        s.begin_story(command.profile.clone(), clock)
    })?;
    let mut guard = LoadingGuard::new(session_id, repo, clock);

    let start = StartStory {
        correlation_id: command.correlation_id,
        profile: command.profile.clone(),
    };
    let outcome = handle_start_story(&start, settings, backend).await;
    guard.disarm();

    match outcome {
        Ok(segment) => {
            let mut segment = Some(segment);
            let session = repo.update(session_id, &mut |s| {
                if let Some(segment) = segment.take() {
                    s.complete_story_start(segment, clock);
                }
                Ok(())
            })?;
            info!(%session_id, "story started");
            Ok(SessionView::from(&session))
        }
        Err(e) => {
            let message = user_message(&e, START_FAILED_MESSAGE);
            record_failure(session_id, message, clock, repo);
            Err(DomainError::Generation(message.to_owned()))
        }
    }
}

/// Handles the `ChooseAction` command: requests the next segment and appends
/// the exchange to the transcript.
///
/// # Errors
///
/// Returns `DomainError::InvalidStep` unless the story is in progress,
/// `DomainError::GenerationInFlight` if a call is already running, and
/// `DomainError::SceneBlocked` if the scene could not be produced even after
/// the soft retry.
pub async fn handle_choose_action(
    command: &ChooseAction,
    clock: &dyn Clock,
    settings: &NarrativeSettings,
    backend: &dyn GenerationBackend,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session_id = command.session_id;
    let mut pending: Option<PendingContinuation> = None;
    repo.update(session_id, &mut |s| {
        pending = Some(s.begin_choice(&command.chosen_action, clock)?);
        Ok(())
    })?;
    let PendingContinuation {
        transcript,
        profile,
    } = pending.ok_or_else(|| DomainError::Infrastructure("continuation not captured".into()))?;
    let mut guard = LoadingGuard::new(session_id, repo, clock);

    let next = ContinueStory {
        correlation_id: command.correlation_id,
        transcript,
        chosen_action: command.chosen_action.clone(),
        profile,
    };
    let outcome = handle_continue_story(&next, settings, backend).await;
    guard.disarm();

    match outcome {
        Ok(segment) => {
            let is_ending = segment.is_ending;
            let mut segment = Some(segment);
            let session = repo.update(session_id, &mut |s| {
                if let Some(segment) = segment.take() {
                    s.complete_choice(&command.chosen_action, segment, clock);
                }
                Ok(())
            })?;
            info!(%session_id, turn_count = session.turn_count(), is_ending, "story continued");
            Ok(SessionView::from(&session))
        }
        Err(e) => {
            let message = user_message(&e, CONTINUE_FAILED_MESSAGE);
            record_failure(session_id, message, clock, repo);
            Err(match e {
                StoryError::SceneBlocked(_) => DomainError::SceneBlocked(message.to_owned()),
                StoryError::Generation(_) => DomainError::Generation(message.to_owned()),
            })
        }
    }
}

/// Handles the `DismissError` command.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session.
pub fn handle_dismiss_error(
    command: &DismissError,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session = repo.update(command.session_id, &mut |s| {
        s.dismiss_error(clock);
        Ok(())
    })?;
    Ok(SessionView::from(&session))
}

/// Handles the `ResetSession` command: discards the story and returns to
/// setup. Resetting twice is the same as resetting once.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session and
/// `DomainError::GenerationInFlight` while a call is running.
pub fn handle_reset_session(
    command: &ResetSession,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<SessionView, DomainError> {
    let session = repo.update(command.session_id, &mut |s| s.reset(clock))?;
    info!(
        correlation_id = %command.correlation_id(),
        session_id = %command.session_id,
        "session reset"
    );
    Ok(SessionView::from(&session))
}

#[cfg(test)]
mod tests {
    use nightfable_core::error::DomainError;
    use nightfable_core::generation::GenerationResponse;
    use nightfable_core::transcript::TranscriptEntry;
    use nightfable_narrative::domain::prompt::NarrativeSettings;
    use nightfable_test_support::{
        FailingBackend, FixedClock, ScriptedBackend, sample_profile, segment_json,
        transcript_of_len,
    };
    use uuid::Uuid;

    use super::*;
    use crate::domain::aggregates::Step;
    use crate::store::InMemorySessionRepository;

    fn create(repo: &InMemorySessionRepository, clock: &FixedClock) -> Uuid {
        let view = handle_create_session(
            &CreateSession {
                correlation_id: Uuid::new_v4(),
            },
            clock,
            repo,
        )
        .unwrap();
        view.session_id
    }

    fn confirm(repo: &InMemorySessionRepository, clock: &FixedClock, session_id: Uuid) {
        handle_confirm_age(
            &ConfirmAge {
                correlation_id: Uuid::new_v4(),
                session_id,
            },
            clock,
            repo,
        )
        .unwrap();
    }

    fn begin(session_id: Uuid) -> BeginStory {
        BeginStory {
            correlation_id: Uuid::new_v4(),
            session_id,
            profile: sample_profile(),
        }
    }

    fn choose(session_id: Uuid, action: &str) -> ChooseAction {
        ChooseAction {
            correlation_id: Uuid::new_v4(),
            session_id,
            chosen_action: action.to_owned(),
        }
    }

    async fn playing(
        repo: &InMemorySessionRepository,
        clock: &FixedClock,
    ) -> Uuid {
        let id = create(repo, clock);
        confirm(repo, clock, id);
        let backend = ScriptedBackend::with_texts([segment_json("Intro.", false)]);
        handle_begin_story(&begin(id), clock, &NarrativeSettings::default(), &backend, repo)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_begin_story_produces_single_entry_transcript() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = create(&repo, &clock);
        confirm(&repo, &clock, id);
        let backend = ScriptedBackend::with_texts([segment_json("The office empties out.", false)]);

        // Act
        let view = handle_begin_story(
            &begin(id),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(view.step, Step::Playing);
        assert_eq!(view.transcript, vec![TranscriptEntry::author("The office empties out.")]);
        assert_eq!(view.turn_count, 1);
        assert!(!view.is_loading);
        assert_eq!(view.profile, sample_profile());
        assert_eq!(view.current_segment.unwrap().choices.len(), 3);
    }

    #[tokio::test]
    async fn test_begin_story_rejects_invalid_profile_without_calling_backend() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = create(&repo, &clock);
        confirm(&repo, &clock, id);
        let backend = ScriptedBackend::default();
        let mut command = begin(id);
        command.profile.theme = "Space Opera".to_owned();

        // Act
        let result =
            handle_begin_story(&command, &clock, &NarrativeSettings::default(), &backend, &repo)
                .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_begin_story_failure_stays_in_setup_with_message() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = create(&repo, &clock);
        confirm(&repo, &clock, id);

        // Act
        let result = handle_begin_story(
            &begin(id),
            &clock,
            &NarrativeSettings::default(),
            &FailingBackend,
            &repo,
        )
        .await;

        // Assert
        match result {
            Err(DomainError::Generation(message)) => assert_eq!(message, START_FAILED_MESSAGE),
            other => panic!("expected Generation, got {other:?}"),
        }
        let session = repo.load(id).unwrap();
        assert_eq!(session.step(), Step::Setup);
        assert!(!session.is_loading());
        assert_eq!(session.last_error(), Some(START_FAILED_MESSAGE));
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_begin_story_reports_format_error_for_garbled_reply() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = create(&repo, &clock);
        confirm(&repo, &clock, id);
        let backend = ScriptedBackend::with_texts(["{\"content\": \"no choices\"}"]);

        // Act
        let result =
            handle_begin_story(&begin(id), &clock, &NarrativeSettings::default(), &backend, &repo)
                .await;

        // Assert
        match result {
            Err(DomainError::Generation(message)) => assert_eq!(message, FORMAT_ERROR_MESSAGE),
            other => panic!("expected Generation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_choose_action_appends_exchange() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        let backend = ScriptedBackend::with_texts([segment_json("They meet halfway.", false)]);

        // Act
        let view = handle_choose_action(
            &choose(id, "Lean closer"),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(view.turn_count, 3);
        assert_eq!(view.transcript[1], TranscriptEntry::reader("Lean closer"));
        assert_eq!(view.transcript[2], TranscriptEntry::author("They meet halfway."));
        assert_eq!(view.step, Step::Playing);
        assert!(backend.requests()[0].prompt.contains("(turn 1)"));
    }

    #[tokio::test]
    async fn test_choose_action_at_turn_30_with_ending_ends_session() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        repo.update(id, &mut |s| {
            s.transcript = transcript_of_len(30);
            Ok(())
        })
        .unwrap();
        let backend = ScriptedBackend::with_texts([segment_json("Dawn breaks.", true)]);

        // Act
        let view = handle_choose_action(
            &choose(id, "Stay"),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(view.step, Step::Ended);
        assert_eq!(view.turn_count, 32);
        assert!(view.current_segment.unwrap().is_ending);

        let again = handle_choose_action(
            &choose(id, "More"),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await;
        assert!(matches!(again, Err(DomainError::InvalidStep { .. })));
    }

    #[tokio::test]
    async fn test_choose_action_double_block_at_turn_3_leaves_transcript_unchanged() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        repo.update(id, &mut |s| {
            s.transcript = transcript_of_len(3);
            Ok(())
        })
        .unwrap();
        let before = repo.load(id).unwrap().transcript().to_vec();
        let backend = ScriptedBackend::new(vec![
            Ok(GenerationResponse::blocked()),
            Ok(GenerationResponse::blocked()),
        ]);

        // Act
        let result = handle_choose_action(
            &choose(id, "Lean closer"),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await;

        // Assert
        match result {
            Err(DomainError::SceneBlocked(message)) => {
                assert_eq!(message, CONTINUE_FAILED_MESSAGE);
            }
            other => panic!("expected SceneBlocked, got {other:?}"),
        }
        let session = repo.load(id).unwrap();
        assert_eq!(session.transcript(), before.as_slice());
        assert_eq!(session.step(), Step::Playing);
        assert!(!session.is_loading());
        assert_eq!(session.last_error(), Some(CONTINUE_FAILED_MESSAGE));
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_choose_action_rejected_while_generation_in_flight() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        repo.update(id, &mut |s| s.begin_choice("first", &clock).map(|_| ()))
            .unwrap();
        let backend = ScriptedBackend::default();

        // Act
        let result = handle_choose_action(
            &choose(id, "second"),
            &clock,
            &NarrativeSettings::default(),
            &backend,
            &repo,
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::GenerationInFlight(_))));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_choose_action_before_story_start_is_invalid_step() {
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = create(&repo, &clock);

        let result = handle_choose_action(
            &choose(id, "Lean closer"),
            &clock,
            &NarrativeSettings::default(),
            &ScriptedBackend::default(),
            &repo,
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::InvalidStep { step: "age_gate", .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_generation_clears_loading_flag() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        repo.update(id, &mut |s| s.begin_choice("first", &clock).map(|_| ()))
            .unwrap();

        // Act
        drop(LoadingGuard::new(id, &repo, &clock));

        // Assert
        let session = repo.load(id).unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.last_error(), Some(INTERRUPTED_MESSAGE));
    }

    #[test]
    fn test_dropped_generation_for_missing_session_leaves_store_untouched() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = Uuid::new_v4();

        // Act
        drop(LoadingGuard::new(id, &repo, &clock));

        // Assert
        assert!(matches!(
            repo.load(id),
            Err(DomainError::SessionNotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_dismiss_error_clears_message() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        let _ = handle_choose_action(
            &choose(id, "Lean closer"),
            &clock,
            &NarrativeSettings::default(),
            &FailingBackend,
            &repo,
        )
        .await;

        // Act
        let view = handle_dismiss_error(
            &DismissError {
                correlation_id: Uuid::new_v4(),
                session_id: id,
            },
            &clock,
            &repo,
        )
        .unwrap();

        // Assert
        assert!(view.last_error.is_none());
        assert_eq!(view.turn_count, 1);
    }

    #[tokio::test]
    async fn test_reset_twice_matches_reset_once() {
        // Arrange
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();
        let id = playing(&repo, &clock).await;
        let reset = ResetSession {
            correlation_id: Uuid::new_v4(),
            session_id: id,
        };

        // Act
        let once = handle_reset_session(&reset, &clock, &repo).unwrap();
        let twice = handle_reset_session(&reset, &clock, &repo).unwrap();

        // Assert
        assert_eq!(once.step, Step::Setup);
        assert_eq!(twice.step, once.step);
        assert_eq!(twice.profile, once.profile);
        assert_eq!(twice.transcript, once.transcript);
        assert!(twice.transcript.is_empty());
        assert!(twice.current_segment.is_none());
    }

    #[test]
    fn test_reset_unknown_session_returns_not_found() {
        let clock = FixedClock::default();
        let repo = InMemorySessionRepository::new();

        let result = handle_reset_session(
            &ResetSession {
                correlation_id: Uuid::new_v4(),
                session_id: Uuid::new_v4(),
            },
            &clock,
            &repo,
        );

        assert!(matches!(result, Err(DomainError::SessionNotFound(_))));
    }
}
