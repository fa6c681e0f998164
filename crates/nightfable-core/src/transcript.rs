//! Transcript of narrative turns exchanged so far.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Generated narrative.
    Author,
    /// The reader's chosen action.
    Reader,
}

/// One entry in the append-only transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who produced the text.
    pub role: Role,
    /// The text itself.
    pub text: String,
}

impl TranscriptEntry {
    /// Narrative written by the model.
    #[must_use]
    pub fn author(text: impl Into<String>) -> Self {
        Self {
            role: Role::Author,
            text: text.into(),
        }
    }

    /// An action chosen by the reader.
    #[must_use]
    pub fn reader(text: impl Into<String>) -> Self {
        Self {
            role: Role::Reader,
            text: text.into(),
        }
    }
}

/// Returns at most the last `limit` entries, preserving order.
#[must_use]
pub fn trailing(entries: &[TranscriptEntry], limit: usize) -> &[TranscriptEntry] {
    &entries[entries.len().saturating_sub(limit)..]
}
