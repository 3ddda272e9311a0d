use crate::error::ShellError;
use crate::session::Session;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Statuses stay in 0..=255 the way POSIX shells report them.
pub type ExitCode = i32;

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// Built-ins write their output to `stdout`; external programs inherit the
    /// interpreter's own standard streams.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError>;
}

/// Factory that creates a command from its argument vector.
///
/// Each registry entry owns one factory. Creation fails with
/// [`ShellError::Usage`] when the arguments don't fit the command.
pub trait CommandFactory {
    /// Create a command instance for the provided arguments (without the name).
    fn create(&self, args: &[&str]) -> Result<Box<dyn ExecutableCommand>, ShellError>;
}
