pub mod process;

use crate::builtins::{self, builtin_cd, builtin_exit};
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::lexer::Lexer;
use crate::parser::ast::Invocation;
use crate::parser::Parser;
use crate::runtime::Runtime;
use anyhow::Result;

/// Runs command lines: tokenize and expand, strip directives, classify,
/// then run a built-in or an external program.
pub struct Executor {
    runtime: Runtime,
    config: ShellConfig,
    lexer: Lexer,
}

impl Executor {
    pub fn new(config: ShellConfig) -> Self {
        Self::with_runtime(config, Runtime::new())
    }

    pub fn with_runtime(config: ShellConfig, runtime: Runtime) -> Self {
        let lexer = Lexer::from_config(&config);
        Self {
            runtime,
            config,
            lexer,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// Execute one input line.
    ///
    /// A failing command is reported on stderr and its status lands in `$?`;
    /// that still counts as `Ok`. `Err` carries either an
    /// [`ExitSignal`](crate::error::ExitSignal) from the `exit` builtin or a
    /// fatal [`ShellError`].
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        let Err(err) = self.run_line(line) else {
            return Ok(());
        };

        match err.downcast_ref::<ShellError>() {
            Some(shell_err) if !shell_err.is_fatal() => {
                eprintln!("smallsh: {}", shell_err);
                self.runtime.set_last_status(shell_err.status());
                Ok(())
            }
            _ => Err(err),
        }
    }

    fn run_line(&mut self, line: &str) -> Result<()> {
        let expander = self.runtime.expander(self.config.home.as_deref());
        let words = self.lexer.tokenize(line, &expander)?;
        let parsed = Parser::parse(words)?;

        match builtins::classify(parsed)? {
            Some(invocation) => self.dispatch(invocation),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, invocation: Invocation) -> Result<()> {
        match invocation {
            Invocation::ChangeDirectory { target } => {
                builtin_cd(target.as_deref(), self.config.home.as_deref())?;
                self.runtime.set_last_status(0);
                Ok(())
            }
            Invocation::Exit { code } => {
                let signal = builtin_exit(code.as_deref(), &self.runtime)?;
                Err(signal.into())
            }
            Invocation::External(cmd) => {
                process::run_external(&cmd, &mut self.runtime)?;
                Ok(())
            }
        }
    }
}
