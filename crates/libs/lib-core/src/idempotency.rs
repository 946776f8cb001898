//! # Idempotency Keys
//!
//! Keys have the shape `{timestamp_ms}-{base36}`. The timestamp part is
//! monotonic within the process: if the wall clock steps back, the last issued
//! timestamp is reused rather than going backwards. The random part is a
//! 64-bit draw, so two keys issued in the same millisecond still differ.
//!
//! One logical action gets one key. Retries of that action reuse it.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

fn monotonic_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_TIMESTAMP_MS.fetch_max(now, Ordering::Relaxed);
    previous.max(now)
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Generate a fresh key string.
pub fn generate_idempotency_key() -> String {
    format!("{}-{}", monotonic_millis(), base36(rand::random::<u64>()))
}

/// Key attached to a mutating request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn new() -> Self {
        Self(generate_idempotency_key())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_shape() {
        let key = generate_idempotency_key();
        assert!(key.len() > 10);
        let (ts, rand) = key.split_once('-').unwrap();
        assert!(ts.parse::<i64>().unwrap() > 0);
        assert!(!rand.is_empty());
        assert!(rand.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_consecutive_keys_differ() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_idempotency_key()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let mut last = 0;
        for _ in 0..1000 {
            let key = generate_idempotency_key();
            let ts: i64 = key.split_once('-').unwrap().0.parse().unwrap();
            assert!(ts >= last);
            last = ts;
        }
    }

    #[test]
    fn test_clock_step_back_reuses_last_timestamp() {
        let future = Utc::now().timestamp_millis() + 60_000;
        LAST_TIMESTAMP_MS.fetch_max(future, Ordering::Relaxed);
        assert!(monotonic_millis() >= future);
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn test_key_serializes_as_string() {
        let key = IdempotencyKey::new();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.as_str()));
    }
}
