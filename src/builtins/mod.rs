//! Built-in commands and command classification
//!
//! Only two commands are handled by the interpreter itself, `cd` and `exit`.
//! [`classify`] turns a parsed command line into an [`Invocation`], checking
//! the argument count of built-ins on the way; everything that is not a
//! built-in becomes an external command.

pub mod exit_builtin;

use crate::error::ShellError;
use crate::parser::ast::{CommandLine, ExternalCommand, Invocation};
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub use exit_builtin::builtin_exit;

pub const CD: &str = "cd";
pub const EXIT: &str = "exit";

pub fn is_builtin(name: &str) -> bool {
    matches!(name, CD | EXIT)
}

/// Decide what a command line runs. An empty line runs nothing.
pub fn classify(line: CommandLine) -> Result<Option<Invocation>, ShellError> {
    if line.is_empty() {
        return Ok(None);
    }

    let CommandLine {
        mut words,
        background,
        redirections,
    } = line;

    if !is_builtin(&words[0]) {
        return Ok(Some(Invocation::External(ExternalCommand {
            argv: words,
            background,
            redirections,
        })));
    }

    let invocation = if words[0] == CD {
        Invocation::ChangeDirectory {
            target: single_argument(CD, &mut words)?,
        }
    } else {
        Invocation::Exit {
            code: single_argument(EXIT, &mut words)?,
        }
    };

    Ok(Some(invocation))
}

/// The optional lone argument of a built-in
fn single_argument(
    builtin: &'static str,
    words: &mut Vec<String>,
) -> Result<Option<String>, ShellError> {
    match words.len() {
        1 => Ok(None),
        2 => Ok(words.pop()),
        _ => Err(ShellError::TooManyArguments { builtin }),
    }
}

/// `cd [DIR]`: change the working directory of the interpreter.
///
/// Without an argument the target is `home`, falling back to the platform's
/// notion of the home directory.
pub fn builtin_cd(target: Option<&str>, home: Option<&str>) -> Result<(), ShellError> {
    let path = match target {
        Some(dir) => PathBuf::from(dir),
        None => home
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(ShellError::NoHomeDirectory)?,
    };

    env::set_current_dir(&path).map_err(|source| ShellError::ChangeDirectory {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), "changed directory");
    Ok(())
}
