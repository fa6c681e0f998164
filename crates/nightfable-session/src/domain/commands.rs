//! Commands for the Profile & Session context.

use nightfable_core::command::Command;
use nightfable_core::profile::Profile;
use uuid::Uuid;

/// Command to open a new session at the age gate.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for CreateSession {
    fn command_type(&self) -> &'static str {
        "session.create_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to confirm the reader is an adult.
#[derive(Debug, Clone)]
pub struct ConfirmAge {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for ConfirmAge {
    fn command_type(&self) -> &'static str {
        "session.confirm_age"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to submit the profile and request the introduction.
#[derive(Debug, Clone)]
pub struct BeginStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// The reader profile.
    pub profile: Profile,
}

impl Command for BeginStory {
    fn command_type(&self) -> &'static str {
        "session.begin_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pick a choice and request the next segment.
#[derive(Debug, Clone)]
pub struct ChooseAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// Text of the chosen choice.
    pub chosen_action: String,
}

impl Command for ChooseAction {
    fn command_type(&self) -> &'static str {
        "session.choose_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to clear the last error.
#[derive(Debug, Clone)]
pub struct DismissError {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for DismissError {
    fn command_type(&self) -> &'static str {
        "session.dismiss_error"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to discard the story and return to setup.
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
}

impl Command for ResetSession {
    fn command_type(&self) -> &'static str {
        "session.reset_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
