use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::ShellError;
use std::io::Write;

/// Runtime state shared by every stage of the pipeline.
///
/// Created once at startup and threaded through the checker, expander and
/// executor by mutable reference.
#[derive(Debug, Clone)]
pub struct Session {
    /// Variables and working directory visible to commands.
    pub env: Environment,
    /// Status of the most recently completed command.
    pub last_status: ExitCode,
    /// The interpreter's own process id, as expanded by `$$`.
    pub process_id: String,
    /// Input line number used in error messages. Starts at 1.
    pub command_counter: usize,
    /// Name the interpreter was invoked as (`argv[0]`).
    pub program_name: String,
    /// Set by `exit`; the loop stops once this is present.
    pub exit_request: Option<ExitCode>,
}

impl Session {
    pub fn new(program_name: impl Into<String>, env: Environment) -> Self {
        Self {
            env,
            last_status: 0,
            process_id: std::process::id().to_string(),
            command_counter: 1,
            program_name: program_name.into(),
            exit_request: None,
        }
    }

    /// Print `err` as `<program>: <line>: <message>`.
    ///
    /// Write failures are ignored: a closed stderr must not end the session.
    pub fn report(&self, err: &ShellError, stderr: &mut dyn Write) {
        let _ = writeln!(
            stderr,
            "{}: {}: {}",
            self.program_name, self.command_counter, err
        );
    }

    pub fn should_exit(&self) -> bool {
        self.exit_request.is_some()
    }
}
