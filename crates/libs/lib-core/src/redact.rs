//! # Error Redaction
//!
//! Maps any error value to a message that is safe to show a user.
//!
//! A message is replaced by [`GENERIC_ERROR_MESSAGE`] when it mentions a
//! credential (`password`, `token`, `secret`, `key`, case-insensitive) or looks
//! like a stack frame (`at Object.handler (`). Anything else passes through
//! unchanged, so benign diagnostics such as `"Network error"` stay readable.

use std::error::Error as StdError;
use std::fmt::Display;

/// Shown in place of any message that could leak credentials or internals.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Substrings that mark a message as credential-bearing (matched lowercase).
const SENSITIVE_WORDS: &[&str] = &["password", "token", "secret", "key"];

/// Redact a raised error or a plain string.
///
/// ```
/// use lib_core::redact::{sanitize_error, GENERIC_ERROR_MESSAGE};
///
/// assert_eq!(sanitize_error("Invalid password"), GENERIC_ERROR_MESSAGE);
/// assert_eq!(sanitize_error("Network error"), "Network error");
/// ```
pub fn sanitize_error<E: Display + ?Sized>(error: &E) -> String {
    let message = error.to_string();
    if is_sensitive(&message) {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Redacted message of `error`, or `fallback` when there is no error.
pub fn error_message_or(error: Option<&dyn StdError>, fallback: &str) -> String {
    match error {
        Some(err) => sanitize_error(err),
        None => fallback.to_string(),
    }
}

/// True if the message matches any sensitive pattern.
pub fn is_sensitive(message: &str) -> bool {
    let lower = message.to_lowercase();
    SENSITIVE_WORDS.iter().any(|w| lower.contains(w)) || contains_stack_frame(message)
}

/// Matches `at` + whitespace + identifier + whitespace + `(`.
///
/// The identifier may be dotted (`Object.handler`) and may contain `$`, `<` and
/// `>` as produced by V8 for anonymous and generated frames.
fn contains_stack_frame(message: &str) -> bool {
    let bytes = message.as_bytes();
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$' | b'<' | b'>');

    let mut start = 0;
    while let Some(offset) = message[start..].find("at") {
        let mut i = start + offset + 2;
        start = start + offset + 1;

        let ws = i;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == ws {
            continue;
        }

        let ident = i;
        while i < bytes.len() && is_ident(bytes[i]) {
            i += 1;
        }
        if i == ident {
            continue;
        }

        let ws = i;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i > ws && bytes.get(i) == Some(&b'(') {
            return true;
        }
    }
    false
}
