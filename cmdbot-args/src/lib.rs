//! # cmdbot-args
//!
//! Argument tokenizer: splits a raw argument string into positional arguments
//! honoring double- and (optionally) single-quoted spans. Pure and
//! side-effect-free; malformed quoting never fails, it falls back to
//! bare-token scanning.

use cmdbot_core::{ArgsMode, CommandSpec, Result};
use tracing::debug;

/// Splits `input` into positional arguments.
///
/// Scans left to right, repeatedly taking one of: a double-quoted span, a
/// single-quoted span (when `allow_single_quote`), or a whitespace-delimited
/// bare token. Whitespace between tokens is consumed and discarded. Inside a
/// quoted span every character is literal except the matching closing quote,
/// so spans may contain embedded whitespace and newlines. An opening quote
/// with no closer is not an error: the token falls through to bare-token
/// scanning and runs to the next whitespace, quote character included.
///
/// With `max_count = Some(n)`, at most `n - 1` discrete tokens are extracted;
/// any unconsumed text is appended as one final token, trimmed, with one
/// fully-wrapping quote pair stripped if the pair spans the whole remainder.
/// `None` (and `Some(0)`) mean unbounded.
///
/// Empty or whitespace-only input yields an empty vec.
pub fn tokenize(input: &str, max_count: Option<usize>, allow_single_quote: bool) -> Vec<String> {
    let mut args = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(cap) = max_count {
            if cap > 0 && args.len() + 1 >= cap {
                let remainder = rest.trim_end();
                args.push(strip_wrapping_quotes(remainder, allow_single_quote).to_string());
                break;
            }
        }
        let (token, remainder) = scan_token(rest, allow_single_quote);
        args.push(token);
        rest = remainder;
    }
    args
}

/// The degenerate single-argument mode: the whole trimmed input is one
/// argument, with one fully-wrapping quote pair stripped if present. No token
/// splitting. Empty input yields an empty string.
pub fn single_argument(input: &str, allow_single_quote: bool) -> String {
    strip_wrapping_quotes(input.trim(), allow_single_quote).to_string()
}

/// Resolves a command's arguments from its raw argument string per the
/// declared [`ArgsMode`].
pub fn parse_args(raw: &str, spec: &CommandSpec) -> Result<Vec<String>> {
    let args = match spec.args_mode {
        ArgsMode::Single => vec![single_argument(raw, spec.allow_single_quote)],
        ArgsMode::Multiple => tokenize(raw, spec.args_count, spec.allow_single_quote),
    };
    debug!(command = %spec.name, mode = %spec.args_mode, count = args.len(), "Parsed arguments");
    Ok(args)
}

/// Extracts one token from the front of `s` (which must start with a
/// non-whitespace character); returns the token and the unconsumed tail.
fn scan_token(s: &str, allow_single_quote: bool) -> (String, &str) {
    let Some(first) = s.chars().next() else {
        return (String::new(), s);
    };
    if first == '"' || (allow_single_quote && first == '\'') {
        // Quoted span: everything up to the matching closer is literal.
        let body = &s[1..];
        if let Some(close) = body.find(first) {
            let token = body[..close].to_string();
            return (token, &body[close + 1..]);
        }
        // Unterminated quote falls through to bare-token scanning.
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (s[..end].to_string(), &s[end..])
}

/// Strips one wrapping quote pair (double, or single when enabled) if the
/// pair spans the whole string.
fn strip_wrapping_quotes(s: &str, allow_single_quote: bool) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let quote = bytes[0];
        if (quote == b'"' || (allow_single_quote && quote == b'\''))
            && bytes[bytes.len() - 1] == quote
        {
            return &s[1..s.len() - 1];
        }
    }
    s
}
