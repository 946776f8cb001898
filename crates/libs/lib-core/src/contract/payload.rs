//! Structural checks on outgoing JSON bodies.
//!
//! A body that carries prototype keys, pathological nesting or an oversized
//! blob must never leave the client, whatever its field values look like.

use serde_json::Value;

use super::{Boundary, ContractViolation, Preflight};

/// Keys that mutate object prototypes when merged into a JS object.
const PROTOTYPE_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimits {
    pub max_depth: usize,
    pub max_bytes: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_bytes: 64 * 1024,
        }
    }
}

fn violation(field: &str, message: impl Into<String>) -> ContractViolation {
    ContractViolation::new(Boundary::InjectionNeutrality, field, message)
}

/// Walk the value iteratively so hostile nesting cannot exhaust the stack.
pub fn inspect_payload(body: &Value, limits: &PayloadLimits) -> Preflight {
    let mut stack: Vec<(&Value, usize, String)> = vec![(body, 0, String::from("$"))];

    while let Some((value, depth, path)) = stack.pop() {
        if depth > limits.max_depth {
            return Err(violation(
                &path,
                format!("Nesting exceeds {} levels", limits.max_depth),
            ));
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if PROTOTYPE_KEYS.contains(&key.as_str()) {
                        return Err(violation(key, format!("Forbidden property `{key}`")));
                    }
                    stack.push((child, depth + 1, format!("{path}.{key}")));
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    stack.push((child, depth + 1, format!("{path}[{i}]")));
                }
            }
            _ => {}
        }
    }

    let size = serde_json::to_vec(body).map(|bytes| bytes.len()).unwrap_or(usize::MAX);
    if size > limits.max_bytes {
        return Err(violation("$", format!("Body exceeds {} bytes", limits.max_bytes)));
    }
    Ok(())
}

/// Reject operator objects (`{"$ne": null}`) and arrays where a scalar is due.
pub fn expect_scalar(value: &Value, field: &str) -> Preflight {
    match value {
        Value::Object(_) | Value::Array(_) => Err(violation(field, format!("{field} must be a scalar value"))),
        _ => Ok(()),
    }
}
