//! Commands for the Story Progression context.

use nightfable_core::command::Command;
use nightfable_core::profile::Profile;
use nightfable_core::transcript::TranscriptEntry;
use uuid::Uuid;

/// Command to open a new story.
#[derive(Debug, Clone)]
pub struct StartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reader profile. The name is assumed non-empty.
    pub profile: Profile,
}

impl Command for StartStory {
    fn command_type(&self) -> &'static str {
        "narrative.start_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to continue a story with the reader's chosen action.
#[derive(Debug, Clone)]
pub struct ContinueStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The full transcript before this exchange.
    pub transcript: Vec<TranscriptEntry>,
    /// Literal text of the selected action.
    pub chosen_action: String,
    /// The reader profile.
    pub profile: Profile,
}

impl ContinueStory {
    /// Turn count used for pacing.
    #[must_use]
    pub fn turn(&self) -> usize {
        self.transcript.len()
    }
}

impl Command for ContinueStory {
    fn command_type(&self) -> &'static str {
        "narrative.continue_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
