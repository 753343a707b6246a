//! Runner configuration: operator contact details and the incident-message
//! template. Loaded from environment variables; the operator-contact prose is
//! template data, not code.

use std::env;

/// Template placeholders: `{error}` (the failure's own string representation),
/// `{owner}` (operator contact, or "the bot owner"), `{invite}` (rendered as
/// " in this server: URL" when configured, "." otherwise).
const DEFAULT_INCIDENT_TEMPLATE: &str = "An error occurred while running the command: `{error}`\n\
     You shouldn't ever receive an error like this. Please contact {owner}{invite}";

/// Configuration for the invocation runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Who to name in incident notices (e.g. an operator's handle).
    pub owner_contact: Option<String>,
    /// Support server invite link, appended to incident notices.
    pub support_invite: Option<String>,
    /// Incident-notice template; see [`RunnerConfig::incident_message`].
    pub incident_template: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            owner_contact: None,
            support_invite: None,
            incident_template: DEFAULT_INCIDENT_TEMPLATE.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Loads from environment variables: `OWNER_CONTACT` and `SUPPORT_INVITE`,
    /// both optional.
    pub fn from_env() -> Self {
        Self {
            owner_contact: env::var("OWNER_CONTACT").ok(),
            support_invite: env::var("SUPPORT_INVITE").ok(),
            incident_template: DEFAULT_INCIDENT_TEMPLATE.to_string(),
        }
    }

    pub fn with_owner_contact(mut self, owner: impl Into<String>) -> Self {
        self.owner_contact = Some(owner.into());
        self
    }

    pub fn with_support_invite(mut self, invite: impl Into<String>) -> Self {
        self.support_invite = Some(invite.into());
        self
    }

    /// Renders the generic incident notice for an unexpected failure. Exposes
    /// nothing beyond the error's own string representation.
    pub fn incident_message(&self, error_text: &str) -> String {
        let owner = self.owner_contact.as_deref().unwrap_or("the bot owner");
        let invite = match &self.support_invite {
            Some(url) => format!(" in this server: {}", url),
            None => ".".to_string(),
        };
        self.incident_template
            .replace("{error}", error_text)
            .replace("{owner}", owner)
            .replace("{invite}", &invite)
    }
}
