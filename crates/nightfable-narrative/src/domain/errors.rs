//! Failure types for story progression.

use nightfable_core::generation::BackendError;
use thiserror::Error;

use super::decode::DecodeError;

/// Why a single generation attempt produced no segment.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    /// The provider returned no text, i.e. it blocked the content.
    #[error("the provider returned no text (content blocked)")]
    Blocked,

    /// The backend call itself failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Text came back but was not a valid segment.
    #[error("story format error: {0}")]
    Decode(#[from] DecodeError),
}

/// Failure of a story-progression operation.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The primary attempt failed and no retry applies.
    #[error("story generation failed: {0}")]
    Generation(GenerationFailure),

    /// The primary attempt and the soft retry both failed.
    #[error("scene blocked after soft retry: {0}")]
    SceneBlocked(GenerationFailure),
}

impl StoryError {
    /// The failure of the last attempt made.
    #[must_use]
    pub fn failure(&self) -> &GenerationFailure {
        match self {
            Self::Generation(failure) | Self::SceneBlocked(failure) => failure,
        }
    }

    /// Whether the last attempt returned text that failed to decode.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self.failure(), GenerationFailure::Decode(_))
    }
}
