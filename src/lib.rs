//! A small line-oriented command interpreter.
//!
//! Each input line goes through the same pipeline: comments are stripped, the
//! separator syntax is checked, `$` variables are expanded, and the line is split
//! into a chain of commands joined by `;`, `&&` and `||`. Every command in the
//! chain whose condition holds is run either as a builtin from the [`Registry`]
//! or as an external program found on `PATH`, and its exit status becomes the
//! session's last status.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`env`] and [`session`] expose the traits and state needed to plug in your own
//! builtins or drive the interpreter from another line source.

mod builtin;
pub mod command;
pub mod env;
mod error;
pub mod expand;
mod external;
mod help;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod session;
pub mod split;
pub mod syntax;

pub use builtin::Registry;
pub use error::ShellError;
pub use external::{Resolution, find_command_path};
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
