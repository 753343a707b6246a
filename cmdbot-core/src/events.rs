//! Observability hooks for the invocation lifecycle.
//!
//! Fire-and-forget: the runner calls these and never inspects a result. All
//! methods default to no-ops; [`TracingEvents`] is the stock implementation
//! that routes every hook through `tracing`.

use std::fmt;

use tracing::{error, info};

/// Why an invocation was refused before its command logic ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The command is guild-only and the trigger came from a private channel.
    GuildOnly,
    /// The command's permission predicate rejected the invoking user.
    Permission,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GuildOnly => write!(f, "guildOnly"),
            Self::Permission => write!(f, "permission"),
        }
    }
}

/// Lifecycle hooks emitted by the invocation runner.
pub trait CommandEvents: Send + Sync {
    /// An invocation was refused at the gate.
    fn blocked(&self, _command: &str, _reason: BlockReason) {}

    /// Command logic is about to run with the resolved arguments.
    fn invocation_started(&self, _command: &str, _args: &[String], _from_pattern: bool) {}

    /// Command logic failed; emitted exactly once per failed invocation.
    fn invocation_failed(&self, _command: &str, _error: &str, _args: &[String], _from_pattern: bool) {
    }
}

/// Routes every lifecycle hook through structured tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl CommandEvents for TracingEvents {
    fn blocked(&self, command: &str, reason: BlockReason) {
        info!(command = %command, reason = %reason, "step: invocation blocked");
    }

    fn invocation_started(&self, command: &str, args: &[String], from_pattern: bool) {
        info!(
            command = %command,
            args = ?args,
            from_pattern = from_pattern,
            "step: invocation started"
        );
    }

    fn invocation_failed(&self, command: &str, error: &str, args: &[String], from_pattern: bool) {
        error!(
            command = %command,
            error = %error,
            args = ?args,
            from_pattern = from_pattern,
            "step: invocation failed"
        );
    }
}

/// Discards every hook. Useful as a test default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvents;

impl CommandEvents for NullEvents {}
