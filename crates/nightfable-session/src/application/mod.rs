//! Application services for the Profile & Session context.

pub mod command_handlers;
pub mod query_handlers;
