//! Maps a logical "current answer" onto the set of platform messages already
//! sent for this invocation, editing, creating, or deleting as needed to
//! converge without flicker or leftover messages.

use cmdbot_core::{
    ChatClient, CmdbotError, Destination, MessageHandle, ResponseKind, Result, SplitPolicy,
    Trigger,
};
use tracing::{debug, instrument, warn};

use crate::state::{ResponseState, SentUnit};

/// Reconciles one invocation's desired output against its previously sent
/// messages. Borrows the chat client, the originating trigger, and the
/// invocation's mutable [`ResponseState`]; all operations for one respond
/// call complete before the next begins (sequential awaits, single task).
pub struct Responder<'a> {
    client: &'a dyn ChatClient,
    trigger: &'a Trigger,
    state: &'a mut ResponseState,
}

impl<'a> Responder<'a> {
    pub fn new(
        client: &'a dyn ChatClient,
        trigger: &'a Trigger,
        state: &'a mut ResponseState,
    ) -> Self {
        Self {
            client,
            trigger,
            state,
        }
    }

    pub fn state(&self) -> &ResponseState {
        self.state
    }

    /// Sends or edits the invocation's current answer.
    ///
    /// The first respond call of a fresh invocation sends one message per
    /// length-split chunk and records the handles as a new sent unit.
    /// Subsequent calls (or a re-run against carried-over state) advance the
    /// cursor and converge the sent unit at that slot onto the new content:
    /// pairwise edits first, then sends for extra chunks, then deletes for
    /// surplus handles from the end backward, sparing index 0.
    #[instrument(skip(self, content, split), fields(channel = self.trigger.channel.0))]
    pub async fn respond(
        &mut self,
        kind: ResponseKind,
        content: &str,
        split: Option<SplitPolicy>,
    ) -> Result<Vec<MessageHandle>> {
        // Degradation is evaluated per call; permissions can change
        // mid-conversation.
        let kind = self.degrade_private_reply(kind);
        let to_direct = self.resolve_direct(&kind).await;
        let (text, policy) = self.format(&kind, content, split, to_direct);
        let chunks = self.client.split_by_length(&text, &policy);

        let destination = if to_direct {
            Destination::Direct(self.trigger.author.id)
        } else {
            Destination::Channel(self.trigger.channel)
        };

        let slot = self.state.advance();
        if self.state.unit(slot).is_some() {
            debug!(slot = slot, chunks = chunks.len(), "step: editing sent unit");
            self.edit_unit(slot, &chunks).await
        } else {
            debug!(slot = slot, chunks = chunks.len(), "step: sending fresh unit");
            self.send_fresh(&destination, &chunks).await
        }
    }

    /// Plain response to the originating channel.
    pub async fn say(&mut self, content: &str) -> Result<Vec<MessageHandle>> {
        self.respond(ResponseKind::Plain, content, None).await
    }

    /// Mention-prefixed response to the originating channel.
    pub async fn reply(&mut self, content: &str) -> Result<Vec<MessageHandle>> {
        self.respond(ResponseKind::Reply, content, None).await
    }

    /// Response to the author's direct messages.
    pub async fn direct(&mut self, content: &str) -> Result<Vec<MessageHandle>> {
        self.respond(ResponseKind::Direct, content, None).await
    }

    /// Fenced-code response to the originating channel.
    pub async fn code(&mut self, lang: &str, content: &str) -> Result<Vec<MessageHandle>> {
        self.respond(
            ResponseKind::Code {
                lang: lang.to_string(),
            },
            content,
            None,
        )
        .await
    }

    /// Starts the typing indicator in the originating channel.
    pub async fn start_typing(&self) -> Result<()> {
        self.client.start_typing(&self.trigger.channel).await
    }

    /// Stops the typing indicator in the originating channel. Best-effort.
    pub async fn stop_typing(&self) {
        self.client.stop_typing(&self.trigger.channel).await;
    }

    /// Closes out the run: deletes every sent unit past the cursor (stale
    /// output a shorter final answer superseded), rests the cursor, and
    /// returns the surviving handles. A run that produced no output deletes
    /// everything carried over.
    #[instrument(skip(self))]
    pub async fn finalize(&mut self) -> Result<Vec<MessageHandle>> {
        let keep = self.state.cursor().map_or(0, |c| c + 1);
        let stale = self.state.drain_tail(keep);
        for unit in &stale {
            for handle in unit.handles() {
                // Stale messages may already be gone (e.g. removed by a
                // moderator); a failed delete does not fail the invocation.
                if let Err(e) = self.client.delete(handle).await {
                    warn!(message_id = %handle.id, error = %e, "Failed to delete stale response");
                }
            }
        }
        self.state.rest();
        Ok(self
            .state
            .units()
            .iter()
            .flat_map(|unit| unit.handles().iter().cloned())
            .collect())
    }

    /// `reply` degrades to `plain` when the invocation originated in a
    /// private (non-guild) context: there is no one else to disambiguate for.
    fn degrade_private_reply(&self, kind: ResponseKind) -> ResponseKind {
        match kind {
            ResponseKind::Reply if self.trigger.is_private() => ResponseKind::Plain,
            ResponseKind::Plain | ResponseKind::Reply | ResponseKind::Direct => kind,
            ResponseKind::Code { .. } => kind,
        }
    }

    /// Any non-`direct` kind degrades to the author's DMs when the bot cannot
    /// post in the originating channel. Private channels are always writable.
    async fn resolve_direct(&self, kind: &ResponseKind) -> bool {
        match kind {
            ResponseKind::Direct => true,
            ResponseKind::Plain | ResponseKind::Reply | ResponseKind::Code { .. } => {
                self.trigger.guild.is_some()
                    && !self.client.has_send_permission(&self.trigger.channel).await
            }
        }
    }

    /// Applies kind-specific formatting and picks the effective split policy.
    /// Code fences become the policy's prepend/append when the caller
    /// supplied no policy, so fences reopen across length-split chunks.
    fn format(
        &self,
        kind: &ResponseKind,
        content: &str,
        split: Option<SplitPolicy>,
        to_direct: bool,
    ) -> (String, SplitPolicy) {
        match kind {
            ResponseKind::Code { lang } => {
                let escaped = self.client.escape_markup(content, true);
                let open = format!("```{}\n", lang);
                let close = "\n```";
                let text = format!("{}{}{}", open, escaped, close);
                let policy = split.unwrap_or_else(|| SplitPolicy {
                    prepend: open,
                    append: close.to_string(),
                    ..SplitPolicy::default()
                });
                (text, policy)
            }
            ResponseKind::Reply if !to_direct => (
                format!("{}, {}", self.trigger.author.mention(), content),
                split.unwrap_or_default(),
            ),
            ResponseKind::Plain | ResponseKind::Reply | ResponseKind::Direct => {
                (content.to_string(), split.unwrap_or_default())
            }
        }
    }

    async fn send_fresh(
        &mut self,
        destination: &Destination,
        chunks: &[String],
    ) -> Result<Vec<MessageHandle>> {
        let mut handles = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            handles.push(self.client.send(destination, chunk).await?);
        }
        self.state.push_unit(SentUnit::new(handles.clone()));
        Ok(handles)
    }

    /// Converges the sent unit at `slot` onto the new chunks. Exact order:
    /// pairwise edits, then sends for extra chunks (to the same destination
    /// as the unit's first handle), then deletes from the highest index down.
    /// Index 0 is always edited, never deleted.
    async fn edit_unit(&mut self, slot: usize, chunks: &[String]) -> Result<Vec<MessageHandle>> {
        let old: Vec<MessageHandle> = match self.state.unit(slot) {
            Some(unit) if !unit.is_empty() => unit.handles().to_vec(),
            _ => {
                return Err(CmdbotError::Contract(format!(
                    "edit targeted slot {} but no handles exist there",
                    slot
                )))
            }
        };

        let mut handles = Vec::with_capacity(chunks.len());
        let shared = old.len().min(chunks.len());
        for i in 0..shared {
            handles.push(self.client.edit(&old[i], &chunks[i]).await?);
        }
        if chunks.len() > old.len() {
            let destination = old[0].destination.clone();
            for chunk in &chunks[old.len()..] {
                handles.push(self.client.send(&destination, chunk).await?);
            }
        } else if old.len() > chunks.len() {
            for handle in old[chunks.len()..].iter().rev() {
                self.client.delete(handle).await?;
            }
        }

        self.state.set_unit(slot, SentUnit::new(handles.clone()));
        Ok(handles)
    }
}
