//! Error types for the command pipeline.

use crate::command::ExitCode;
use thiserror::Error;

/// Everything that can go wrong while a line is checked or a command runs.
///
/// None of these stop the read-eval loop: each one is printed with the
/// `<program>: <line>: ` prefix and turned into a status with [`ShellError::status`].
#[derive(Error, Debug)]
pub enum ShellError {
    /// A separator appeared where a command was expected.
    #[error("Syntax error near unexpected token '{0}'")]
    Syntax(String),

    /// No builtin and no executable on `PATH` carries this name.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// The command resolved to a file that cannot be executed.
    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    /// A builtin was given arguments it cannot work with.
    #[error("{command}: {message}")]
    Usage {
        command: &'static str,
        message: String,
        status: ExitCode,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    pub(crate) fn usage(command: &'static str, message: impl Into<String>, status: ExitCode) -> Self {
        ShellError::Usage {
            command,
            message: message.into(),
            status,
        }
    }

    /// Shell status recorded after this error is reported.
    pub fn status(&self) -> ExitCode {
        match self {
            ShellError::Syntax(_) => 2,
            ShellError::CommandNotFound(_) => 127,
            ShellError::PermissionDenied(_) => 126,
            ShellError::Usage { status, .. } => *status,
            ShellError::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_user_visible_format() {
        assert_eq!(
            ShellError::Syntax(";;".into()).to_string(),
            "Syntax error near unexpected token ';;'"
        );
        assert_eq!(
            ShellError::CommandNotFound("xyz".into()).to_string(),
            "xyz: command not found"
        );
        assert_eq!(
            ShellError::PermissionDenied("./a.txt".into()).to_string(),
            "./a.txt: Permission denied"
        );
        assert_eq!(
            ShellError::usage("exit", "Illegal number: abc", 2).to_string(),
            "exit: Illegal number: abc"
        );
    }

    #[test]
    fn statuses() {
        assert_eq!(ShellError::Syntax("|".into()).status(), 2);
        assert_eq!(ShellError::CommandNotFound("x".into()).status(), 127);
        assert_eq!(ShellError::PermissionDenied("x".into()).status(), 126);
        assert_eq!(ShellError::usage("setenv", "usage", 1).status(), 1);
    }
}
