//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables with defaults.

use std::env;
use std::str::FromStr;

/// Get an environment variable, falling back to `default` when unset.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable, falling back to `default` when unset.
///
/// A variable that is set but unparsable is an error, not a silent fallback.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(val) => val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name)),
        Err(_) => Ok(default),
    }
}

/// Get a comma-separated list, trimming entries and dropping empty ones.
pub fn get_env_list(name: &'static str, default: &[&str]) -> Vec<String> {
    match env::var(name) {
        Ok(val) => val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::WrongFormat(name) => write!(fmt, "{name} has an invalid format"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
