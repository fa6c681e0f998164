//! Gemini adapter for the generation backend seam.
//!
//! [`GeminiClient`] posts one `generateContent` call per
//! [`GenerationRequest`](nightfable_core::generation::GenerationRequest) and
//! reports provider-side content blocks as a response with no text.

mod client;
pub mod wire;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
