//! # cmdbot-core
//!
//! Core types and traits for the command-invocation envelope: [`ChatClient`],
//! the error taxonomy, lifecycle event hooks, message/channel/user types, and
//! tracing initialization. Transport-agnostic; used by cmdbot-args,
//! cmdbot-respond, and cmdbot-runner.

pub mod chat;
pub mod error;
pub mod events;
pub mod logger;
pub mod types;

pub use chat::ChatClient;
pub use error::{CmdbotError, Result};
pub use events::{BlockReason, CommandEvents, NullEvents, TracingEvents};
pub use logger::init_tracing;
pub use types::{
    ArgsMode, ChannelId, CommandSpec, Destination, GuildId, MessageHandle, ResponseKind,
    SplitPolicy, Trigger, User,
};
