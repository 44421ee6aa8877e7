/// Files that replace the standard streams of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    /// Opened read-only onto stdin (`< FILE`)
    pub input: Option<String>,
    /// Created or truncated, then opened write-only onto stdout (`> FILE`)
    pub output: Option<String>,
}

/// One command line after comment, background and redirection directives
/// have been stripped from its words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name followed by its arguments
    pub words: Vec<String>,
    pub background: bool,
    pub redirections: Redirections,
}

impl CommandLine {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// What a command line asks the interpreter to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `cd [DIR]`
    ChangeDirectory { target: Option<String> },
    /// `exit [CODE]`, code not yet validated
    Exit { code: Option<String> },
    /// Anything else: run a program
    External(ExternalCommand),
}

/// A program to run. `argv` is never empty when built by
/// [`classify`](crate::builtins::classify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    /// argv; `argv[0]` is the program looked up on `PATH`
    pub argv: Vec<String>,
    pub background: bool,
    pub redirections: Redirections,
}

impl ExternalCommand {
    /// Program name, empty if `argv` is
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }
}
