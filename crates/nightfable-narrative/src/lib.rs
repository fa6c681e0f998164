//! Nightfable — Story Progression bounded context.
//!
//! Responsible for turning a reader profile and transcript into a generation
//! request, pacing the story by turn count, decoding the model's structured
//! reply, and retrying once with softened instructions when a scene is
//! blocked.

pub mod application;
pub mod domain;
