//! Fixture builders shared across crates.

use nightfable_core::profile::{Identity, Orientation, Profile, THEMES};
use nightfable_core::transcript::TranscriptEntry;

/// A complete, valid profile.
#[must_use]
pub fn sample_profile() -> Profile {
    Profile {
        name: "Lucía".to_owned(),
        identity: Identity::Woman,
        orientation: Orientation::Men,
        theme: THEMES[0].to_owned(),
    }
}

/// A schema-conformant segment payload as the model would return it.
#[must_use]
pub fn segment_json(content: &str, is_ending: bool) -> String {
    serde_json::json!({
        "content": content,
        "choices": [
            { "text": "Lean closer", "tone": "romantic" },
            { "text": "Hold the stare", "tone": "passionate" },
            { "text": "Ask what they are hiding", "tone": "investigative" }
        ],
        "isEnding": is_ending
    })
    .to_string()
}

/// Wraps a payload in Markdown JSON code fences.
#[must_use]
pub fn fenced(payload: &str) -> String {
    format!("```json\n{payload}\n```")
}

/// A transcript of `len` alternating author/reader entries starting with the
/// author.
#[must_use]
pub fn transcript_of_len(len: usize) -> Vec<TranscriptEntry> {
    (0..len)
        .map(|i| {
            if i % 2 == 0 {
                TranscriptEntry::author(format!("narration {i}"))
            } else {
                TranscriptEntry::reader(format!("action {i}"))
            }
        })
        .collect()
}
