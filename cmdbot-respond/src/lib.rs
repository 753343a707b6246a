//! # cmdbot-respond
//!
//! Response reconciliation: per-invocation [`ResponseState`] (sent units of
//! message handles plus an edit cursor) and the [`Responder`] that converges
//! previously sent messages onto new desired output by editing, creating,
//! and deleting with a minimum of operations.

mod reconciler;
mod state;

pub use reconciler::Responder;
pub use state::{ResponseState, SentUnit};
