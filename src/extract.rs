//! Pulling a single command line out of a free-form model reply.

use regex::Regex;
use std::sync::LazyLock;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:bash|zsh|sh)?\s*([\s\S]*?)```").expect("fenced block pattern is valid")
});

static INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]*)`").expect("inline span pattern is valid"));

/// Extract the command from an LLM reply.
///
/// The first fenced code block wins, then the first inline backtick span,
/// then the whole reply. The result is trimmed and every whitespace run is
/// collapsed to a single space, so it never spans more than one line.
pub fn extract_command(reply: &str) -> String {
    let text = FENCED
        .captures(reply)
        .or_else(|| INLINE.captures(reply))
        .and_then(|caps| caps.get(1))
        .map_or(reply, |m| m.as_str());

    collapse_whitespace(text)
}

/// Trim and join whitespace-separated words with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
