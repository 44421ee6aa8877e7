//! Error types for smallsh
//!
//! Every failure that aborts a single command line is a [`ShellError`]. The
//! interpreter prints it on stderr, records [`ShellError::status`] as the new
//! `$?`, and reads the next line. Only a failed `fork` is fatal.
//!
//! Leaving the interpreter on purpose is not a failure, but it travels the
//! same road: the `exit` builtin returns an [`ExitSignal`] inside an
//! `anyhow::Error`, and the top level recovers it with `downcast_ref`.

use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Status recorded for every shell-level error.
pub const SHELL_ERROR_STATUS: i32 = 1;

/// Exit status of a child that could not set up redirection or exec.
pub const CHILD_FAILURE_STATUS: i32 = 2;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("too many words: a line may hold at most {limit}")]
    TooManyWords { limit: usize },

    #[error("cannot expand ~/: HOME is not set")]
    HomeUnset,

    #[error("{builtin}: too many arguments")]
    TooManyArguments { builtin: &'static str },

    #[error("exit: {0}: numeric argument required")]
    InvalidExitCode(String),

    #[error("duplicate redirection: at most one '<' and one '>' per command")]
    DuplicateRedirection,

    #[error("cd: {}: {source}", path.display())]
    ChangeDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cd: could not determine home directory")]
    NoHomeDirectory,

    #[error("{0:?}: argument contains a NUL byte")]
    NulByte(String),

    #[error("fork failed: {0}")]
    Fork(Errno),

    #[error("wait for process {pid} failed: {source}")]
    Wait { pid: i32, source: Errno },
}

impl ShellError {
    /// Status code surfaced through `$?` after this error.
    pub fn status(&self) -> i32 {
        SHELL_ERROR_STATUS
    }

    /// Whether the interpreter can keep processing commands after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Fork(_))
    }
}

/// Request to leave the interpreter with the given exit code.
///
/// Returned by the `exit` builtin once its argument has been validated. The
/// top level (main.rs) turns it into the process group interrupt, the exit
/// notice and `std::process::exit(code)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSignal {
    pub exit_code: i32,
}

impl std::fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exit {}", self.exit_code)
    }
}

impl std::error::Error for ExitSignal {}
