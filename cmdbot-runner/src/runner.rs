//! Orchestrates one command execution: permission gate, argument extraction,
//! delegation to command logic, and failure routing through the reconciler.

use std::sync::Arc;

use cmdbot_args::parse_args;
use cmdbot_core::{
    BlockReason, ChatClient, CmdbotError, CommandEvents, MessageHandle, ResponseKind, Result,
};
use cmdbot_respond::Responder;
use tracing::{info, instrument};

use crate::command::Command;
use crate::config::RunnerConfig;
use crate::invocation::Invocation;

/// Runs invocations against commands. `Gate → Parse → Execute → Respond`;
/// every failure from Execute is caught here, none propagate past the runner.
pub struct Runner {
    client: Arc<dyn ChatClient>,
    events: Arc<dyn CommandEvents>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(
        client: Arc<dyn ChatClient>,
        events: Arc<dyn CommandEvents>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            client,
            events,
            config,
        }
    }

    /// Runs one invocation to completion. Returns the handles of the final
    /// answer shown to the user (command output, refusal, or error reply),
    /// or `None` when the command succeeded without producing output.
    #[instrument(skip_all, fields(command = %command.spec().name))]
    pub async fn run(
        &self,
        command: &dyn Command,
        invocation: &mut Invocation,
    ) -> Result<Option<Vec<MessageHandle>>> {
        let spec = command.spec();

        // Gate
        if spec.guild_only && invocation.trigger.guild.is_none() {
            self.events.blocked(&spec.name, BlockReason::GuildOnly);
            info!(command = %spec.name, "step: invocation blocked (guild only)");
            let text = format!(
                "The `{}` command must be used in a server channel.",
                spec.name
            );
            return self.refuse(invocation, &text).await;
        }
        if !command.has_permission(invocation) {
            self.events.blocked(&spec.name, BlockReason::Permission);
            info!(command = %spec.name, "step: invocation blocked (permission)");
            let text = format!(
                "You do not have permission to use the `{}` command.",
                spec.name
            );
            return self.refuse(invocation, &text).await;
        }

        // Parse: pattern matches are already segmented, the tokenizer is
        // skipped for them.
        let (args, from_pattern) = match invocation.pattern_matches.clone() {
            Some(matches) => (matches, true),
            None => (
                parse_args(invocation.raw_args.as_deref().unwrap_or(""), spec)?,
                false,
            ),
        };

        // Execute
        let channel = invocation.trigger.channel;
        let typing_before = self.client.typing_count(&channel);
        self.events.invocation_started(&spec.name, &args, from_pattern);
        info!(command = %spec.name, args = ?args, from_pattern = from_pattern, "step: executing command");

        let Invocation { trigger, state, .. } = invocation;
        let mut responder = Responder::new(self.client.as_ref(), trigger, state);
        match command.execute(&mut responder, &args).await {
            Ok(output) => {
                responder.finalize().await?;
                info!(command = %spec.name, "step: invocation finished");
                Ok(output)
            }
            Err(err) => {
                self.events
                    .invocation_failed(&spec.name, &err.to_string(), &args, from_pattern);
                // Stop a typing indicator the command started but never got
                // to stop. Best-effort; typing started before this run is
                // left alone.
                if self.client.typing_count(&channel) > typing_before {
                    self.client.stop_typing(&channel).await;
                }
                let text = match err.downcast_ref::<CmdbotError>() {
                    Some(CmdbotError::Friendly(message)) => message.clone(),
                    _ => self.config.incident_message(&err.to_string()),
                };
                let handles = responder.respond(ResponseKind::Reply, &text, None).await?;
                responder.finalize().await?;
                Ok(Some(handles))
            }
        }
    }

    /// Replies with a fixed refusal and closes out the run.
    async fn refuse(
        &self,
        invocation: &mut Invocation,
        text: &str,
    ) -> Result<Option<Vec<MessageHandle>>> {
        let Invocation { trigger, state, .. } = invocation;
        let mut responder = Responder::new(self.client.as_ref(), trigger, state);
        let handles = responder.respond(ResponseKind::Reply, text, None).await?;
        responder.finalize().await?;
        Ok(Some(handles))
    }
}
