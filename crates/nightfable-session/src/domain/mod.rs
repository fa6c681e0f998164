//! Domain model for the Profile & Session context.

pub mod aggregates;
pub mod commands;
