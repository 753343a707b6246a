//! Chat client abstraction for sending, editing, and deleting messages.
//!
//! [`ChatClient`] is transport-agnostic; a transport crate implements it over
//! its platform API. Markup escaping and length splitting ship as provided
//! methods so a transport can substitute its platform's own rules.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChannelId, Destination, MessageHandle, SplitPolicy};

/// Abstraction over the chat platform: send/edit/delete plus the capability
/// queries the invocation envelope needs. Only ever called, never mutated
/// structurally, by the core.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends a text message to the given destination and returns its handle.
    async fn send(&self, destination: &Destination, text: &str) -> Result<MessageHandle>;

    /// Edits an already-sent message in place; returns the (possibly renewed) handle.
    async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<MessageHandle>;

    /// Deletes an already-sent message.
    async fn delete(&self, handle: &MessageHandle) -> Result<()>;

    /// Whether the bot may post in the given channel. Evaluated per call;
    /// permissions can change mid-conversation, so results are never cached.
    async fn has_send_permission(&self, channel: &ChannelId) -> bool;

    /// Starts the typing indicator in the given channel.
    async fn start_typing(&self, _channel: &ChannelId) -> Result<()> {
        Ok(())
    }

    /// Stops the typing indicator. Best-effort; must not fail the caller.
    async fn stop_typing(&self, _channel: &ChannelId) {}

    /// How many times typing has been started (and not stopped) in the
    /// channel. Zero for transports without a typing indicator.
    fn typing_count(&self, _channel: &ChannelId) -> usize {
        0
    }

    /// Escapes markup control characters. In code-block-aware mode only fence
    /// runs are defused, so the text stays literal inside a fenced block.
    fn escape_markup(&self, text: &str, code_block_aware: bool) -> String {
        escape_markup(text, code_block_aware)
    }

    /// Splits text into platform-sized chunks per the policy. Never returns
    /// an empty vec.
    fn split_by_length(&self, text: &str, policy: &SplitPolicy) -> Vec<String> {
        split_by_length(text, policy)
    }
}

/// Escapes markup control characters (`*`, `_`, `` ` ``, `~`, `\`), or, in
/// code-block-aware mode, breaks up triple-backtick fence runs with a
/// zero-width space so embedded fences cannot close the surrounding block.
pub fn escape_markup(text: &str, code_block_aware: bool) -> String {
    if code_block_aware {
        return text.replace("```", "`\u{200b}``");
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '_' | '`' | '~' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Splits `text` into chunks of at most `policy.max_length` characters,
/// breaking on `policy.separator`. Continuation chunks open with
/// `policy.prepend`; every chunk that rolls over closes with `policy.append`
/// (the first chunk carries no prepend and the last no append, so affixes
/// compose with text that already starts/ends with them, e.g. code fences).
/// A separator-free run longer than the limit is chopped at the character level.
pub fn split_by_length(text: &str, policy: &SplitPolicy) -> Vec<String> {
    let max = policy.max_length.max(1);
    if text.chars().count() <= max {
        return vec![text.to_string()];
    }

    let prepend_len = policy.prepend.chars().count();
    let append_len = policy.append.chars().count();
    let piece_budget = max.saturating_sub(prepend_len + append_len).max(1);

    let mut pieces: Vec<String> = Vec::new();
    for segment in text.split(policy.separator) {
        if segment.chars().count() <= piece_budget {
            pieces.push(segment.to_string());
        } else {
            let chars: Vec<char> = segment.chars().collect();
            for chunk in chars.chunks(piece_budget) {
                pieces.push(chunk.iter().collect());
            }
        }
    }

    let mut messages: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prefix_len = 0; // the first chunk carries no prepend
    for piece in pieces {
        let current_len = current.chars().count();
        let has_payload = current_len > prefix_len;
        let sep_len = usize::from(has_payload);
        if has_payload && current_len + sep_len + piece.chars().count() + append_len > max {
            current.push_str(&policy.append);
            messages.push(current);
            current = policy.prepend.clone();
            prefix_len = prepend_len;
        }
        if current.chars().count() > prefix_len {
            current.push(policy.separator);
        }
        current.push_str(&piece);
    }
    messages.push(current);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fits_in_one_chunk() {
        let policy = SplitPolicy::default();
        assert_eq!(split_by_length("hello", &policy), vec!["hello"]);
    }

    #[test]
    fn test_split_on_separator() {
        let policy = SplitPolicy {
            max_length: 3,
            ..SplitPolicy::default()
        };
        assert_eq!(
            split_by_length("aaa\nbbb\nccc", &policy),
            vec!["aaa", "bbb", "ccc"]
        );
    }

    #[test]
    fn test_split_packs_greedily() {
        let policy = SplitPolicy {
            max_length: 7,
            ..SplitPolicy::default()
        };
        assert_eq!(
            split_by_length("aaa\nbbb\nccc", &policy),
            vec!["aaa\nbbb", "ccc"]
        );
    }

    #[test]
    fn test_split_hard_chops_oversized_run() {
        let policy = SplitPolicy {
            max_length: 4,
            ..SplitPolicy::default()
        };
        assert_eq!(split_by_length("abcdefghij", &policy), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_reopens_fences_on_continuations() {
        let policy = SplitPolicy {
            max_length: 12,
            separator: '\n',
            prepend: "```\n".to_string(),
            append: "\n```".to_string(),
        };
        let chunks = split_by_length("```\nfoo\nbar\nbaz\n```", &policy);
        assert_eq!(chunks[0], "```\nfoo\n```");
        assert!(chunks[1].starts_with("```\n"));
        assert!(chunks.last().unwrap().ends_with("```"));
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12);
        }
    }

    #[test]
    fn test_escape_markup_prefixes_control_characters() {
        assert_eq!(escape_markup("a*b_c`d~e\\f", false), "a\\*b\\_c\\`d\\~e\\\\f");
        assert_eq!(escape_markup("plain text", false), "plain text");
    }

    #[test]
    fn test_escape_markup_code_block_aware_defuses_fences() {
        let escaped = escape_markup("let s = \"```\";", true);
        assert!(!escaped.contains("```"));
        assert!(escaped.contains('\u{200b}'));
    }
}
