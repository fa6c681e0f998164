//! Generation backend abstraction.
//!
//! The hosted text-generation model is an opaque call/response boundary. The
//! narrative context builds a [`GenerationRequest`], an adapter crate turns it
//! into a provider call, and the result comes back as a
//! [`GenerationResponse`] whose text is absent when the provider blocked the
//! content.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Harm categories the provider filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    /// Sexually explicit content.
    SexuallyExplicit,
    /// Hate speech.
    HateSpeech,
    /// Harassment.
    Harassment,
    /// Dangerous content.
    DangerousContent,
}

/// Blocking threshold applied to a harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    /// Never block on this category.
    BlockNone,
    /// Block only high-probability harm.
    BlockOnlyHigh,
    /// Block medium-probability harm and above.
    BlockMediumAndAbove,
    /// Block low-probability harm and above.
    BlockLowAndAbove,
}

/// A single category/threshold pair sent with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    /// The harm category.
    pub category: HarmCategory,
    /// The threshold for that category.
    pub threshold: BlockThreshold,
}

impl SafetySetting {
    /// All four standard categories set to [`BlockThreshold::BlockNone`].
    #[must_use]
    pub fn least_restrictive() -> Vec<Self> {
        [
            HarmCategory::SexuallyExplicit,
            HarmCategory::HateSpeech,
            HarmCategory::Harassment,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| Self {
            category,
            threshold: BlockThreshold::BlockNone,
        })
        .collect()
    }
}

/// One structured-output generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Persona, style, and safety posture for the model.
    pub system_instruction: String,
    /// The composed user prompt.
    pub prompt: String,
    /// JSON schema the response must conform to.
    pub response_schema: serde_json::Value,
    /// Sampling temperature; `None` leaves the provider default.
    pub temperature: Option<f32>,
    /// Safety filter configuration.
    pub safety: Vec<SafetySetting>,
}

/// Raw result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    /// The returned text; `None` when the provider blocked the content.
    pub text: Option<String>,
}

impl GenerationResponse {
    /// A response carrying text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A response with no text, i.e. a content block.
    #[must_use]
    pub fn blocked() -> Self {
        Self { text: None }
    }

    /// Returns the text if present and not blank.
    #[must_use]
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Errors raised by a backend call itself (as opposed to a content block).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// The provider's envelope could not be parsed.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Seam between the orchestrator and a hosted generation model.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Issue one generation call.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_restrictive_covers_four_categories_with_block_none() {
        let settings = SafetySetting::least_restrictive();

        assert_eq!(settings.len(), 4);
        assert!(
            settings
                .iter()
                .all(|s| s.threshold == BlockThreshold::BlockNone)
        );
        assert!(
            settings
                .iter()
                .any(|s| s.category == HarmCategory::DangerousContent)
        );
    }

    #[test]
    fn test_non_empty_text_treats_blank_as_blocked() {
        assert_eq!(GenerationResponse::text("  \n").non_empty_text(), None);
        assert_eq!(GenerationResponse::blocked().non_empty_text(), None);
        assert_eq!(GenerationResponse::text("{}").non_empty_text(), Some("{}"));
    }
}
