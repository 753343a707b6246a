//! The command seam: descriptor lookup, permission predicate, and the
//! command's own logic. External collaborators implement this.

use async_trait::async_trait;
use cmdbot_core::{CommandSpec, MessageHandle};
use cmdbot_respond::Responder;

use crate::invocation::Invocation;

/// One bot command. The runner gates, parses, and catches failures; the
/// command only declares its descriptor and runs its logic, routing output
/// through the [`Responder`].
#[async_trait]
pub trait Command: Send + Sync {
    /// The declarative descriptor (name, gating, argument handling).
    fn spec(&self) -> &CommandSpec;

    /// Whether the invoking user may run this command. Permission semantics
    /// beyond this predicate are out of scope here.
    fn has_permission(&self, _invocation: &Invocation) -> bool {
        true
    }

    /// Runs the command with the resolved arguments. Expected failures should
    /// be `CmdbotError::Friendly`; anything else reaches the user as a
    /// generic incident notice. Returns the handles of its final answer, if
    /// it produced one.
    async fn execute(
        &self,
        responder: &mut Responder<'_>,
        args: &[String],
    ) -> anyhow::Result<Option<Vec<MessageHandle>>>;
}
