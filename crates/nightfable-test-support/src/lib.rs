//! Shared test doubles and fixtures for the Nightfable story service.

mod backend;
mod clock;
mod fixtures;

pub use backend::{BlockedBackend, FailingBackend, ScriptedBackend};
pub use clock::FixedClock;
pub use fixtures::{fenced, sample_profile, segment_json, transcript_of_len};
