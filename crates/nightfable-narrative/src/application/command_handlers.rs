//! Command handlers for the Story Progression context.
//!
//! Each handler builds one generation request, calls the injected backend,
//! and decodes the reply. Appending the result to the transcript is the
//! caller's job.

use nightfable_core::command::Command;
use nightfable_core::generation::{GenerationBackend, GenerationRequest};
use tracing::{info, warn};

use crate::domain::commands::{ContinueStory, StartStory};
use crate::domain::decode::decode_segment;
use crate::domain::errors::{GenerationFailure, StoryError};
use crate::domain::phase::rule_for_turn;
use crate::domain::prompt::{
    NarrativeSettings, continuation_request, introduction_request, soft_retry_request,
};
use crate::domain::segment::StorySegment;

/// One backend call plus decoding. Blank or absent text counts as a block.
async fn attempt(
    backend: &dyn GenerationBackend,
    request: &GenerationRequest,
) -> Result<StorySegment, GenerationFailure> {
    let response = backend.generate(request).await?;
    let text = response
        .non_empty_text()
        .ok_or(GenerationFailure::Blocked)?;
    Ok(decode_segment(text)?)
}

fn clamp_ending(mut segment: StorySegment, phase: &'static str) -> StorySegment {
    if segment.is_ending {
        warn!(phase, "model ended the story before the resolution phase; ignoring");
        segment.is_ending = false;
    }
    segment
}

/// Handles the `StartStory` command: requests an introduction segment.
///
/// There is no retry; the segment returned never ends the story.
///
/// # Errors
///
/// Returns `StoryError::Generation` if the backend fails, returns no text,
/// or returns text that is not a valid segment.
pub async fn handle_start_story(
    command: &StartStory,
    settings: &NarrativeSettings,
    backend: &dyn GenerationBackend,
) -> Result<StorySegment, StoryError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        theme = %command.profile.theme,
        "requesting story introduction"
    );

    let request = introduction_request(&command.profile, settings);
    let segment = attempt(backend, &request).await.map_err(|failure| {
        warn!(correlation_id = %command.correlation_id, error = %failure, "story start failed");
        StoryError::Generation(failure)
    })?;

    Ok(clamp_ending(segment, "introduction"))
}

/// Handles the `ContinueStory` command: paces the request by turn count and
/// retries once with softened instructions if the primary attempt fails.
///
/// # Errors
///
/// Returns `StoryError::SceneBlocked` if both the primary attempt and the
/// soft retry fail.
pub async fn handle_continue_story(
    command: &ContinueStory,
    settings: &NarrativeSettings,
    backend: &dyn GenerationBackend,
) -> Result<StorySegment, StoryError> {
    let turn = command.turn();
    let rule = rule_for_turn(turn);

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        turn,
        phase = rule.phase.name(),
        "requesting story continuation"
    );

    let request = continuation_request(
        &command.transcript,
        &command.chosen_action,
        &command.profile,
        rule,
        settings,
    );

    let segment = match attempt(backend, &request).await {
        Ok(segment) => segment,
        Err(primary) => {
            warn!(
                correlation_id = %command.correlation_id,
                error = %primary,
                "primary attempt failed; retrying with softened instructions"
            );
            let retry = soft_retry_request(&request, settings);
            attempt(backend, &retry).await.map_err(|failure| {
                warn!(correlation_id = %command.correlation_id, error = %failure, "soft retry failed");
                StoryError::SceneBlocked(failure)
            })?
        }
    };

    if rule.forces_non_ending {
        Ok(clamp_ending(segment, rule.phase.name()))
    } else {
        Ok(segment)
    }
}
