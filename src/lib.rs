//! smallsh: a small line-oriented command interpreter
//!
//! A line goes through [`lexer`] (splitting and [`expand`]), [`parser`]
//! (comments, `&`, `<` and `>`), [`builtins::classify`] and finally the
//! [`executor`], which runs `cd`/`exit` itself and forks everything else.
//! [`jobs`] collects background children between lines.

pub mod builtins;
pub mod config;
pub mod error;
pub mod executor;
pub mod expand;
pub mod input;
pub mod jobs;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod signal;
