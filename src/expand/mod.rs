//! Word expansion
//!
//! Rewrites four two-character patterns inside a single word, in place:
//!
//! | pattern | replacement                                         |
//! |---------|-----------------------------------------------------|
//! | `$$`    | process id of the interpreter                       |
//! | `$?`    | status of the last foreground command               |
//! | `$!`    | pid of the most recent background job, or nothing   |
//! | `~/`    | `$HOME` followed by `/`                             |
//!
//! The scan runs left to right over the evolving word and resumes right
//! after each inserted replacement, so replacement text is never expanded
//! again. A lone `$` or `~` is left untouched.

use crate::error::ShellError;

/// Snapshot of the values substituted during expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander<'a> {
    pub shell_pid: i32,
    pub last_status: i32,
    pub last_background: Option<i32>,
    pub home: Option<&'a str>,
}

impl Expander<'_> {
    /// Expand every recognized pattern in `word`.
    ///
    /// Fails with [`ShellError::HomeUnset`] when the word contains `~/` and
    /// no home directory is known; `word` is left partially expanded then.
    pub fn expand(&self, word: &mut String) -> Result<(), ShellError> {
        let mut pos = 0;

        while pos + 1 < word.len() {
            let bytes = word.as_bytes();
            let replacement = match (bytes[pos], bytes[pos + 1]) {
                (b'$', b'$') => Some(self.shell_pid.to_string()),
                (b'$', b'?') => Some(self.last_status.to_string()),
                (b'$', b'!') => Some(
                    self.last_background
                        .map(|pid| pid.to_string())
                        .unwrap_or_default(),
                ),
                (b'~', b'/') => {
                    let home = self.home.ok_or(ShellError::HomeUnset)?;
                    Some(format!("{}/", home))
                }
                _ => None,
            };

            match replacement {
                // Both matched bytes are ASCII, so pos..pos + 2 is on char boundaries
                Some(text) => {
                    word.replace_range(pos..pos + 2, &text);
                    pos += text.len();
                }
                None => pos += 1,
            }
        }

        Ok(())
    }
}
