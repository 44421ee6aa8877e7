pub mod ast;

use crate::error::ShellError;
use ast::{CommandLine, Redirections};
use tracing::debug;

/// Marks the rest of the line as a comment
pub const COMMENT: &str = "#";
/// Runs the command without waiting for it, when it is the last word
pub const BACKGROUND: &str = "&";
pub const REDIRECT_INPUT: &str = "<";
pub const REDIRECT_OUTPUT: &str = ">";

/// Redirection checks run this many times, each against the current tail
const REDIRECTION_PASSES: usize = 2;

enum Redirect {
    Input(String),
    Output(String),
}

/// Strips directives from the words of one line.
///
/// The steps run in a fixed order, each one against what the previous one
/// left behind:
/// 1. a `#` word and everything after it is dropped;
/// 2. a trailing `&` is dropped and marks the command as background;
/// 3. twice, a trailing `< FILE` or `> FILE` pair is taken off the end.
///
/// Seeing the same direction twice rejects the whole line.
pub struct Parser;

impl Parser {
    pub fn parse(mut words: Vec<String>) -> Result<CommandLine, ShellError> {
        strip_comment(&mut words);
        let background = take_background(&mut words);

        let mut redirections = Redirections::default();
        let mut inputs = 0;
        let mut outputs = 0;

        for _ in 0..REDIRECTION_PASSES {
            match take_redirection(&mut words) {
                Some(Redirect::Input(file)) => {
                    inputs += 1;
                    redirections.input = Some(file);
                }
                Some(Redirect::Output(file)) => {
                    outputs += 1;
                    redirections.output = Some(file);
                }
                None => {}
            }
        }

        if inputs > 1 || outputs > 1 {
            return Err(ShellError::DuplicateRedirection);
        }

        let line = CommandLine {
            words,
            background,
            redirections,
        };
        debug!(?line, "parsed directives");
        Ok(line)
    }
}

fn strip_comment(words: &mut Vec<String>) {
    if let Some(start) = words.iter().position(|w| w == COMMENT) {
        words.truncate(start);
    }
}

fn take_background(words: &mut Vec<String>) -> bool {
    if words.last().is_some_and(|w| w == BACKGROUND) {
        words.pop();
        true
    } else {
        false
    }
}

fn take_redirection(words: &mut Vec<String>) -> Option<Redirect> {
    let len = words.len();
    if len < 2 {
        return None;
    }

    let is_input = match words[len - 2].as_str() {
        REDIRECT_INPUT => true,
        REDIRECT_OUTPUT => false,
        _ => return None,
    };

    let file = words.pop()?;
    words.pop();

    Some(if is_input {
        Redirect::Input(file)
    } else {
        Redirect::Output(file)
    })
}
