//! Tolerant extraction of a JSON payload from a model reply.
//!
//! Models often wrap their answer in a markdown fence and sometimes use
//! single quotes (`{'is_clean': false}`). Extraction:
//! 1. Take the first fenced block (` ```json ... ``` `, tag optional), or
//!    the whole reply if there is none
//! 2. Trim it
//! 3. Replace every `'` with `"`
//!
//! The result is *not* validated here; see [`crate::verdict::parse_verdict`].

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9]*\s*\n(.*?)```").expect("code block regex is valid")
});

/// Extract the candidate JSON text from a model reply.
pub fn extract_code(response: &str) -> String {
    let candidate = find_code_block(response).unwrap_or(response).trim();
    normalize_quotes(candidate)
}

/// Interior of the first fenced code block, untrimmed.
pub fn find_code_block(text: &str) -> Option<&str> {
    CODE_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace single quotes with double quotes.
///
/// Also rewrites apostrophes inside string values (`the part's surface`),
/// which can break the JSON or change its meaning.
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
}
