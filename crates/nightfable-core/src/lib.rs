//! Nightfable Core — shared domain vocabulary.
//!
//! This crate defines the types every bounded context speaks: the reader
//! profile, the transcript, the generation backend seam, and the domain
//! error. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod generation;
pub mod profile;
pub mod transcript;
