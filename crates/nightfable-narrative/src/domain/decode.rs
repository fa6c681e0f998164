//! Decoding of the model's structured reply into a [`StorySegment`].
//!
//! The model sometimes wraps its JSON in Markdown code fences even when asked
//! for raw JSON, so fence markers are stripped before parsing. Everything else
//! is strict: a missing or mistyped field is an error, never a default.

use serde::Deserialize;
use thiserror::Error;

use super::segment::{CHOICES_PER_SEGMENT, Choice, StorySegment};

/// Why a payload could not be turned into a segment.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not JSON of the expected shape.
    #[error("payload does not match the segment schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// The segment has no narrative text.
    #[error("segment content is empty")]
    EmptyContent,

    /// The segment offers the wrong number of choices.
    #[error("expected 3 choices, got {0}")]
    ChoiceCount(usize),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    content: String,
    choices: Vec<Choice>,
    is_ending: bool,
}

/// Removes every ```` ```json ```` and ```` ``` ```` marker and trims the
/// result.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

/// Parses a raw model reply into a segment.
///
/// # Errors
///
/// Returns `DecodeError` if the payload is not schema-conformant JSON, has
/// blank content, or does not carry exactly three choices.
pub fn decode_segment(text: &str) -> Result<StorySegment, DecodeError> {
    let raw: RawSegment = serde_json::from_str(&strip_code_fences(text))?;

    if raw.content.trim().is_empty() {
        return Err(DecodeError::EmptyContent);
    }

    let count = raw.choices.len();
    let choices: [Choice; CHOICES_PER_SEGMENT] = raw
        .choices
        .try_into()
        .map_err(|_| DecodeError::ChoiceCount(count))?;

    Ok(StorySegment {
        content: raw.content,
        choices,
        is_ending: raw.is_ending,
    })
}
