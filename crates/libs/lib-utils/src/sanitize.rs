//! # Display Sanitization
//!
//! Helpers for user-supplied text that is rendered back to a user, and for
//! identifiers embedded in request paths.
//!
//! - [`escape_html`] / [`SanitizedText`]: neutralize markup before display
//! - [`is_dangerous_url`] / [`safe_link`]: block script-bearing URL schemes
//! - [`path_segment_hazard`]: spot identifiers that must never be sent as a path segment

use std::fmt;

/// URL schemes that can execute code when used as a link or redirect target.
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Escape the five HTML-significant characters in a single pass.
///
/// ```
/// use lib_utils::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns true if the URL uses a scheme that can carry executable content.
pub fn is_dangerous_url(url: &str) -> bool {
    let lower = url.trim().to_lowercase();
    DANGEROUS_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Returns the URL unchanged if it is safe to render as a link.
pub fn safe_link(url: &str) -> Option<&str> {
    if is_dangerous_url(url) {
        None
    } else {
        Some(url)
    }
}

// region:    --- SanitizedText

/// User-supplied text that has been HTML-escaped.
///
/// The only way to build one is through [`SanitizedText::new`], so a value of
/// this type never contains an unescaped `<`, `>`, `&`, `"` or `'`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub fn new(raw: &str) -> Self {
        Self(escape_html(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// endregion: --- SanitizedText

// region:    --- Path Segments

/// Why an identifier is unsafe to embed in a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathHazard {
    /// `..`, a separator, or an encoded separator
    Traversal,
    /// Literal or percent-encoded NUL
    NullByte,
    /// Any other control character
    ControlChar,
    /// Quote, statement terminator or comment marker
    SqlMeta,
    /// Angle brackets
    Markup,
    /// Pipe, backtick, command substitution or background operator
    ShellMeta,
}

impl fmt::Display for PathHazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PathHazard::Traversal => "path traversal sequence",
            PathHazard::NullByte => "null byte",
            PathHazard::ControlChar => "control character",
            PathHazard::SqlMeta => "SQL metacharacter",
            PathHazard::Markup => "markup character",
            PathHazard::ShellMeta => "shell metacharacter",
        };
        f.write_str(label)
    }
}

/// Inspect an identifier destined for a path segment.
///
/// Returns the first hazard found, checked in a fixed order so the same input
/// always reports the same hazard.
pub fn path_segment_hazard(segment: &str) -> Option<PathHazard> {
    let lower = segment.to_ascii_lowercase();

    if segment.contains('\0') || lower.contains("%00") {
        return Some(PathHazard::NullByte);
    }
    if segment.chars().any(char::is_control) {
        return Some(PathHazard::ControlChar);
    }
    if segment.contains("..")
        || segment.contains('/')
        || segment.contains('\\')
        || lower.contains("%2f")
        || lower.contains("%5c")
        || lower.contains("%2e%2e")
    {
        return Some(PathHazard::Traversal);
    }
    if segment.contains('<') || segment.contains('>') {
        return Some(PathHazard::Markup);
    }
    if segment.contains('\'') || segment.contains(';') || segment.contains("--") || segment.contains('"') {
        return Some(PathHazard::SqlMeta);
    }
    if segment.contains('|') || segment.contains('`') || segment.contains("$(") || segment.contains('&') {
        return Some(PathHazard::ShellMeta);
    }
    None
}

// endregion: --- Path Segments
