//! Nightfable — Profile & Session bounded context.
//!
//! Responsible for the reader's journey through a story: age gate, profile
//! setup, play, and ending. Holds the transcript and the current segment, and
//! guarantees at most one generation call is in flight per session.

pub mod application;
pub mod domain;
pub mod store;
