//! # cmdbot-runner
//!
//! The invocation runner: gates an incoming trigger against the command's
//! guild-only and permission preconditions, resolves arguments (tokenizer or
//! pattern matches), delegates to the command's logic, and catches every
//! failure at this boundary, replying with a friendly message or a generic
//! incident notice.

mod command;
mod config;
mod invocation;
mod runner;

pub use command::Command;
pub use config::RunnerConfig;
pub use invocation::Invocation;
pub use runner::Runner;
