//! Application services for the Story Progression context.

pub mod command_handlers;
pub mod query_handlers;
