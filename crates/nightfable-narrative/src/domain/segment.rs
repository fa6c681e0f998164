//! Story segments and the choices they offer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of continuations every segment offers.
pub const CHOICES_PER_SEGMENT: usize = 3;

/// Affective register of a choice. Presentation hint only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tone {
    /// Forceful.
    Aggressive,
    /// Tender.
    Romantic,
    /// Yielding.
    Submissive,
    /// Curious.
    Investigative,
    /// Neutral.
    Neutral,
    /// Sensual.
    Erotic,
    /// Rough.
    Rough,
    /// Intense.
    Passionate,
    /// Any tag outside the known set, kept verbatim.
    Other(String),
}

impl From<String> for Tone {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "aggressive" => Self::Aggressive,
            "romantic" => Self::Romantic,
            "submissive" => Self::Submissive,
            "investigative" => Self::Investigative,
            "neutral" => Self::Neutral,
            "erotic" => Self::Erotic,
            "rough" => Self::Rough,
            "passionate" => Self::Passionate,
            _ => Self::Other(value),
        }
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.to_string()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Aggressive => "aggressive",
            Self::Romantic => "romantic",
            Self::Submissive => "submissive",
            Self::Investigative => "investigative",
            Self::Neutral => "neutral",
            Self::Erotic => "erotic",
            Self::Rough => "rough",
            Self::Passionate => "passionate",
            Self::Other(raw) => raw,
        };
        f.write_str(tag)
    }
}

/// A continuation the reader can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Action text shown to the reader and sent back when chosen.
    pub text: String,
    /// Affective register.
    pub tone: Tone,
}

/// One unit of generated narrative plus its follow-up choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySegment {
    /// Narrative prose.
    pub content: String,
    /// Exactly three continuations.
    pub choices: [Choice; CHOICES_PER_SEGMENT],
    /// Whether the story has concluded.
    pub is_ending: bool,
}
