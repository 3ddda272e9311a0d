use crate::builtin::Registry;
use crate::command::{ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::io_adapters::{LineSource, ReadOutcome};
use crate::session::Session;
use crate::{expand, lexer, split, syntax};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, trace};

/// A line-oriented interpreter that runs `;`, `&&` and `||` chains of built-in
/// and external commands.
///
/// The interpreter owns the [`Session`] and a [`Registry`] of builtins that is
/// consulted before any `PATH` lookup.
///
/// Example
/// ```
/// use chainsh::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = sh.process_line_with_output("setenv GREETING hi && env", &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("GREETING=hi\n"));
/// ```
pub struct Interpreter {
    session: Session,
    registry: Registry,
    interrupted: Arc<AtomicBool>,
}

impl Interpreter {
    /// Create a new interpreter with a custom session and set of builtins.
    pub fn new(session: Session, registry: Registry) -> Self {
        Self {
            session,
            registry,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Flag an interrupt handler may set; it is cleared at the top of the loop.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Run a single argument vector: a builtin if one is registered under
    /// `argv[0]`, otherwise an external program.
    ///
    /// Errors are reported on `stderr` and turned into a status; an empty vector
    /// leaves the current status unchanged.
    pub fn run(
        &mut self,
        argv: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitCode {
        let Some((name, rest)) = argv.split_first() else {
            return self.session.last_status;
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let command = match self.registry.get(name) {
            Some(factory) => factory.create(&args),
            None => ExternalCommand::resolve(name, &args, &self.session)
                .map(|cmd| Box::new(cmd) as Box<dyn ExecutableCommand>),
        };

        match command.and_then(|cmd| cmd.execute(stdout, &mut self.session)) {
            Ok(code) => code,
            Err(err) => {
                self.session.report(&err, stderr);
                err.status()
            }
        }
    }

    /// Process one input line against the process's standard streams.
    pub fn process_line(&mut self, line: &str) -> ExitCode {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let status = self.process_line_with_output(line, &mut stdout.lock(), &mut stderr.lock());
        let _ = std::io::stdout().flush();
        status
    }

    /// Strip comments, check syntax, expand variables, split the line and run
    /// each link of the chain whose condition holds.
    ///
    /// Returns the status of the last command that ran.
    pub fn process_line_with_output(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitCode {
        let Some(line) = syntax::strip_comment(line) else {
            return self.session.last_status;
        };

        if let Err(err) = syntax::check_syntax(line) {
            self.session.report(&err, stderr);
            self.session.last_status = err.status();
            self.session.command_counter += 1;
            return self.session.last_status;
        }

        let expanded = expand::expand_variables(line, &self.session);
        let chain = split::split_commands(&expanded);
        debug!(
            counter = self.session.command_counter,
            line = %expanded,
            links = chain.len(),
            "processing line"
        );

        for link in chain {
            if !link.separator.should_run(self.session.last_status) {
                trace!(separator = ?link.separator, text = %link.text, "skipped");
                continue;
            }
            let argv = lexer::split_into_tokens(&link.text);
            self.session.last_status = self.run(&argv, stdout, stderr);
            if self.session.should_exit() {
                break;
            }
        }

        self.session.command_counter += 1;
        self.session.last_status
    }

    /// Read-eval loop over `source` until end of input or `exit`.
    ///
    /// Returns the status the interpreter should exit with. Only failures of the
    /// line source itself are returned as errors.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> anyhow::Result<ExitCode> {
        while !self.session.should_exit() {
            if self.interrupted.swap(false, Ordering::SeqCst) {
                info!("interrupt received, continuing with the next line");
            }
            match source.read_line()? {
                ReadOutcome::Line(line) => {
                    self.process_line(&line);
                }
                ReadOutcome::Interrupted => {
                    debug!("line abandoned");
                }
                ReadOutcome::Eof => break,
            }
        }
        Ok(self.session.exit_request.unwrap_or(self.session.last_status))
    }
}

impl Default for Interpreter {
    /// Create an interpreter over the process environment with the default builtins.
    fn default() -> Self {
        let program_name = std::env::args().next().unwrap_or_else(|| "chainsh".into());
        Self::new(
            Session::new(program_name, Environment::new()),
            Registry::default(),
        )
    }
}
