//! Startup configuration for smallsh
//!
//! All settings come from the environment and are read once:
//! - `PS1` - prompt printed before each line (default: empty)
//! - `IFS` - word delimiter characters (default: space, tab, newline)
//! - `HOME` - target of `~/` expansion and of a bare `cd`
//! - `SMALLSH_WORD_LIMIT` - maximum words per line (default: 512)
//! - `SMALLSH_LOG` - tracing filter directive (default: `warn`)

use std::env;
use tracing::warn;

pub const DEFAULT_DELIMITERS: &str = " \t\n";
pub const DEFAULT_WORD_LIMIT: usize = 512;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt string, printed on stderr
    pub prompt: String,
    /// Characters that separate words
    pub delimiters: String,
    /// Home directory, if known
    pub home: Option<String>,
    /// Maximum number of words accepted on one line
    pub word_limit: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            delimiters: DEFAULT_DELIMITERS.to_string(),
            home: None,
            word_limit: DEFAULT_WORD_LIMIT,
        }
    }
}

impl ShellConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let word_limit = match lookup("SMALLSH_WORD_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    warn!(value = %raw, "ignoring invalid SMALLSH_WORD_LIMIT");
                    defaults.word_limit
                }
            },
            None => defaults.word_limit,
        };

        Self {
            prompt: lookup("PS1").unwrap_or(defaults.prompt),
            delimiters: lookup("IFS").unwrap_or(defaults.delimiters),
            home: lookup("HOME"),
            word_limit,
        }
    }
}

/// Filter directive for the tracing subscriber.
///
/// Read on its own so logging can be set up before the rest of the
/// configuration is parsed (and possibly warned about).
pub fn log_filter() -> String {
    env::var("SMALLSH_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}
