use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdbotError {
    /// Programmer error in a command descriptor (e.g. unknown argument-consumption
    /// mode). Never shown to the invoking user.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Expected failure whose message is safe to show verbatim to the invoking user.
    #[error("{0}")]
    Friendly(String),

    /// Response cursor and sent-unit list disagree. Fatal; aborts the invocation.
    #[error("Response state desynchronized: {0}")]
    Contract(String),

    /// Transport failure reported by the chat client.
    #[error("Chat error: {0}")]
    Chat(String),
}

impl CmdbotError {
    /// Shorthand for a [`CmdbotError::Friendly`] with the given user-facing message.
    pub fn friendly(message: impl Into<String>) -> Self {
        Self::Friendly(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CmdbotError>;
