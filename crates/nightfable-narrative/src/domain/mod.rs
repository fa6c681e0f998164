//! Domain model for the Story Progression context.

pub mod commands;
pub mod decode;
pub mod errors;
pub mod phase;
pub mod prompt;
pub mod segment;
