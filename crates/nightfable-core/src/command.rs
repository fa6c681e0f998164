//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name for this command, e.g. `session.choose_action`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID that ties log lines for one request together.
    fn correlation_id(&self) -> Uuid;
}
