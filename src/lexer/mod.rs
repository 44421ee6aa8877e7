use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::expand::Expander;
use tracing::trace;

/// Splits a raw line into words on a configurable delimiter set.
///
/// Runs of delimiters count as one separator and produce no empty words.
/// There is no quoting: every non-delimiter character belongs to a word.
#[derive(Debug, Clone)]
pub struct Lexer {
    delimiters: String,
    word_limit: usize,
}

impl Lexer {
    pub fn new(delimiters: impl Into<String>, word_limit: usize) -> Self {
        Self {
            delimiters: delimiters.into(),
            word_limit,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.delimiters.clone(), config.word_limit)
    }

    /// Iterate over the raw, unexpanded words of `line`
    pub fn words<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        line.split(move |c: char| self.delimiters.contains(c))
            .filter(|word| !word.is_empty())
    }

    /// Split `line` into owned words, expanding each one as it is produced.
    ///
    /// A line with more words than the limit yields no words at all.
    pub fn tokenize(&self, line: &str, expander: &Expander) -> Result<Vec<String>, ShellError> {
        let mut words = Vec::new();

        for raw in self.words(line) {
            if words.len() >= self.word_limit {
                return Err(ShellError::TooManyWords {
                    limit: self.word_limit,
                });
            }

            let mut word = raw.to_string();
            expander.expand(&mut word)?;
            words.push(word);
        }

        trace!(?words, "tokenized line");
        Ok(words)
    }
}
