//! Commands and the envelope they travel in.

use uuid::Uuid;

/// Trait that all session commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name for logging.
    fn command_type(&self) -> &'static str;
}

/// A command plus the correlation id it is traced under.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<C> {
    /// Correlation ID to trace this command through logs and responses.
    pub correlation_id: Uuid,
    /// The command itself.
    pub command: C,
}

impl<C: Command> Envelope<C> {
    /// Wraps `command` under a fresh correlation id.
    #[must_use]
    pub fn new(command: C) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            command,
        }
    }

    /// Name of the wrapped command.
    #[must_use]
    pub fn command_type(&self) -> &'static str {
        self.command.command_type()
    }
}
