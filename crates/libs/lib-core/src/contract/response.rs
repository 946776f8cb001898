//! Audit of what a response reveals.
//!
//! Whatever the request, a response must not expose a 5xx or the server
//! technology on a 404. An error body must not carry a stack trace, an
//! internal path or result data. [`audit_response`] lists every such disclosure it finds.

use std::fmt;

use serde_json::Value;

/// Body substrings that betray a stack trace.
const STACK_MARKERS: [&str; 3] = ["at Object.", "Error:", "SyntaxError"];

/// Body substrings that betray filesystem layout.
const PATH_MARKERS: [&str; 3] = ["node_modules", "ENOENT", "/etc/passwd"];

/// Fields that only belong in a successful result.
const RESULT_FIELDS: [&str; 4] = ["shares", "position", "withdrawals", "isAdmin"];

/// What the client saw, detached from the HTTP library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ResponseSnapshot {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    pub fn is_rejection(&self) -> bool {
        self.status >= 400
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    ServerFault(u16),
    StackTrace(&'static str),
    InternalPath(&'static str),
    TechnologyHeader(String),
    LeakedField(String),
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disclosure::ServerFault(status) => write!(f, "server fault {status}"),
            Disclosure::StackTrace(marker) => write!(f, "stack trace marker `{marker}` in body"),
            Disclosure::InternalPath(marker) => write!(f, "internal path marker `{marker}` in body"),
            Disclosure::TechnologyHeader(value) => write!(f, "x-powered-by: {value} on 404"),
            Disclosure::LeakedField(name) => write!(f, "result field `{name}` in rejection body"),
        }
    }
}

/// Top-level keys plus those of a `data` envelope.
fn result_keys(body: &Value) -> Vec<&str> {
    let Some(map) = body.as_object() else {
        return Vec::new();
    };
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    if let Some(data) = map.get("data").and_then(Value::as_object) {
        keys.extend(data.keys().map(String::as_str));
    }
    keys
}

pub fn audit_response(response: &ResponseSnapshot) -> Vec<Disclosure> {
    let mut findings = Vec::new();

    if (500..=599).contains(&response.status) {
        findings.push(Disclosure::ServerFault(response.status));
    }

    // Success bodies carry user content; only error bodies are scanned.
    if response.is_rejection() {
        findings.extend(
            STACK_MARKERS
                .into_iter()
                .filter(|m| response.body.contains(m))
                .map(Disclosure::StackTrace),
        );
        findings.extend(
            PATH_MARKERS
                .into_iter()
                .filter(|m| response.body.contains(m))
                .map(Disclosure::InternalPath),
        );
    }

    if response.status == 404 {
        if let Some(tech) = response.header("x-powered-by") {
            findings.push(Disclosure::TechnologyHeader(tech.to_string()));
        }
    }

    if response.is_rejection() {
        if let Some(body) = response.json() {
            let keys = result_keys(&body);
            findings.extend(
                RESULT_FIELDS
                    .into_iter()
                    .filter(|f| keys.contains(f))
                    .map(|f| Disclosure::LeakedField(f.to_string())),
            );
        }
    }

    findings
}
