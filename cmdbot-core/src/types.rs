//! Core types: user, channel, trigger, message handle, response kind, split
//! policy, and command descriptor.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CmdbotError;

/// User identity (id, username, display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl User {
    /// Renders the platform mention string for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub i64);

/// Guild (server) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub i64);

/// Where an outgoing message goes: a channel, or a user's direct messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Channel(ChannelId),
    Direct(i64),
}

/// Opaque handle to a message the bot has sent. Carries its destination so
/// follow-up sends can target the same place as an existing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHandle {
    pub destination: Destination,
    pub id: String,
}

/// The inbound event that triggered a command: where it came from and who
/// sent it. `guild` is `None` for private (non-server) channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub channel: ChannelId,
    pub guild: Option<GuildId>,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Trigger {
    /// Whether this trigger originated in a private (non-guild) context.
    pub fn is_private(&self) -> bool {
        self.guild.is_none()
    }
}

/// How a response is prefixed, formatted, and addressed. Structural handling
/// (splitting, edit convergence) is identical across kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// Send to the originating channel as-is.
    Plain,
    /// Send to the originating channel, prefixed with the author's mention.
    Reply,
    /// Send to the author's direct messages.
    Direct,
    /// Send to the originating channel wrapped in a fenced code block.
    Code { lang: String },
}

/// Length-splitting policy for outgoing text. `prepend`/`append` are affixed
/// to continuation chunks the way a code fence reopens across messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPolicy {
    pub max_length: usize,
    pub separator: char,
    pub prepend: String,
    pub append: String,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            max_length: 2000,
            separator: '\n',
            prepend: String::new(),
            append: String::new(),
        }
    }
}

/// How a command consumes its raw argument string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgsMode {
    /// The whole trimmed argument string is one argument (one wrapping quote
    /// pair stripped if present).
    Single,
    /// The argument string is tokenized into discrete arguments.
    Multiple,
}

impl FromStr for ArgsMode {
    type Err = CmdbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            other => Err(CmdbotError::InvalidConfiguration(format!(
                "Unknown argument-consumption mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ArgsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multiple => write!(f, "multiple"),
        }
    }
}

/// Declarative command descriptor: name, gating, and argument handling.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub group: Option<String>,
    /// Whether the command may only run from a guild channel.
    pub guild_only: bool,
    pub args_mode: ArgsMode,
    /// Cap on discrete tokens in `Multiple` mode; the remainder past the cap
    /// becomes one final argument. `None` means unbounded.
    pub args_count: Option<usize>,
    /// Whether single-quoted spans are recognized alongside double-quoted ones.
    pub allow_single_quote: bool,
}

impl CommandSpec {
    /// Creates a descriptor with the given name: not guild-only, `Multiple`
    /// args mode, unbounded token count, single quotes allowed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            guild_only: false,
            args_mode: ArgsMode::Multiple,
            args_count: None,
            allow_single_quote: true,
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn args_mode(mut self, mode: ArgsMode) -> Self {
        self.args_mode = mode;
        self
    }

    /// Sets the args mode from configuration text. Fails with
    /// [`CmdbotError::InvalidConfiguration`] on an unrecognized mode.
    pub fn args_mode_str(mut self, mode: &str) -> crate::error::Result<Self> {
        self.args_mode = mode.parse()?;
        Ok(self)
    }

    pub fn args_count(mut self, count: usize) -> Self {
        self.args_count = Some(count);
        self
    }

    pub fn allow_single_quote(mut self, allow: bool) -> Self {
        self.allow_single_quote = allow;
        self
    }
}
