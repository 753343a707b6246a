//! One user-triggered command execution.

use cmdbot_core::Trigger;
use cmdbot_respond::ResponseState;

/// Everything one command execution owns: the inbound trigger, the raw
/// argument string or precomputed pattern matches, and the mutable response
/// state. Owned exclusively by the runner for the duration of a run; the
/// response state survives into a re-run of the same logical invocation
/// (e.g. the user edited their command message) so the new answer can edit
/// the old one in place.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub trigger: Trigger,
    /// Raw text after the command prefix/name, if any.
    pub raw_args: Option<String>,
    /// Precomputed pattern-match groups; when present the tokenizer is
    /// skipped, the groups are already segmented.
    pub pattern_matches: Option<Vec<String>>,
    pub state: ResponseState,
}

impl Invocation {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            raw_args: None,
            pattern_matches: None,
            state: ResponseState::new(),
        }
    }

    pub fn with_raw_args(mut self, raw: impl Into<String>) -> Self {
        self.raw_args = Some(raw.into());
        self
    }

    pub fn with_pattern_matches(mut self, matches: Vec<String>) -> Self {
        self.pattern_matches = Some(matches);
        self
    }
}
