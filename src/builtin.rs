use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::error::ShellError;
use crate::help;
use crate::session::Session;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;

/// Built-in commands known to the shell at compile time.
///
/// Builtins validate their own arguments in [`BuiltinCommand::parse`] and are
/// executed directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "env" or "cd".
    fn name() -> &'static str;

    /// Build the command from the arguments that follow its name.
    ///
    /// Hand-written rather than `argh`-derived: `argh` answers `help` and
    /// `--help` itself, rejects a bare `-` and prints its own usage text, while
    /// builtins must accept `cd -` and report their errors in the shell's format.
    fn parse(args: &[&str]) -> Result<Self, ShellError>;

    /// Executes the command against the session.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, session: &mut Session)
    -> Result<ExitCode, ShellError>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        <T as BuiltinCommand>::execute(*self, stdout, session)
    }
}

/// Factory allows creating instances of a builtin from its arguments.
pub(crate) struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn create(&self, args: &[&str]) -> Result<Box<dyn ExecutableCommand>, ShellError> {
        Ok(Box::new(T::parse(args)?))
    }
}

/// Name to handler table consulted before any `PATH` lookup.
///
/// Filled once when the interpreter is built; lookups are exact string matches.
pub struct Registry {
    builtins: HashMap<&'static str, Box<dyn CommandFactory>>,
}

impl Registry {
    /// A registry with no builtins at all.
    pub fn empty() -> Self {
        Self {
            builtins: HashMap::new(),
        }
    }

    /// Add or replace the handler for `name`.
    pub fn insert(&mut self, name: &'static str, factory: Box<dyn CommandFactory>) {
        self.builtins.insert(name, factory);
    }

    pub(crate) fn register<T: BuiltinCommand + 'static>(&mut self) {
        self.insert(T::name(), Box::new(Factory::<T>::default()));
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandFactory> {
        self.builtins.get(name).map(|factory| factory.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }
}

impl Default for Registry {
    /// `cd`, `env`, `setenv`, `unsetenv`, `exit` and `help`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register::<Cd>();
        registry.register::<Env>();
        registry.register::<Setenv>();
        registry.register::<Unsetenv>();
        registry.register::<Exit>();
        registry.register::<Help>();
        registry
    }
}

/// Change the session's current directory and update `PWD` and `OLDPWD`.
///
/// No target, `~` or `--` means `$HOME` (the directory stays put when it is unset);
/// `-` returns to `$OLDPWD` and prints the new directory.
pub struct Cd {
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        let target = args.first().map(|t| t.to_string());
        if let Some(t) = &target {
            if t.starts_with('-') && t != "-" && t != "--" {
                let option: String = t.chars().take(2).collect();
                return Err(ShellError::usage(
                    "cd",
                    format!("Illegal option {option}"),
                    2,
                ));
            }
        }
        Ok(Self { target })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        let env = &mut session.env;
        let previous = env.current_dir.to_string_lossy().into_owned();

        let (destination, announce) = match self.target.as_deref() {
            None | Some("~") | Some("--") => match env.get_var("HOME").map(str::to_string) {
                Some(home) => (home, false),
                None => {
                    env.set_var("OLDPWD", previous);
                    return Ok(0);
                }
            },
            Some("-") => (
                env.get_var("OLDPWD").unwrap_or(previous.as_str()).to_string(),
                true,
            ),
            Some(dir) => (dir.to_string(), false),
        };

        // `join` keeps absolute destinations as they are.
        let canonical = fs::canonicalize(env.current_dir.join(&destination))
            .ok()
            .filter(|path| path.is_dir())
            .ok_or_else(|| ShellError::usage("cd", format!("can't cd to {destination}"), 2))?;

        let pwd = canonical.to_string_lossy().into_owned();
        env.set_var("OLDPWD", previous);
        env.set_var("PWD", pwd.clone());
        env.current_dir = canonical;

        if announce {
            writeln!(stdout, "{pwd}")?;
        }
        Ok(0)
    }
}

/// Print every environment variable as `NAME=VALUE`.
pub struct Env;

impl BuiltinCommand for Env {
    fn name() -> &'static str {
        "env"
    }

    fn parse(_args: &[&str]) -> Result<Self, ShellError> {
        Ok(Self)
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        for (name, value) in session.env.iter() {
            writeln!(stdout, "{name}={value}")?;
        }
        Ok(0)
    }
}

/// Create or overwrite a variable.
pub struct Setenv {
    pub name: String,
    pub value: String,
}

impl BuiltinCommand for Setenv {
    fn name() -> &'static str {
        "setenv"
    }

    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        match args {
            [name, value] if !name.is_empty() && !name.contains('=') => Ok(Self {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(ShellError::usage(
                "setenv",
                "usage: setenv VARIABLE VALUE",
                1,
            )),
        }
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        session.env.set_var(self.name, self.value);
        Ok(0)
    }
}

/// Remove a variable. Removing an unset name is not an error.
pub struct Unsetenv {
    pub name: String,
}

impl BuiltinCommand for Unsetenv {
    fn name() -> &'static str {
        "unsetenv"
    }

    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        match args {
            [name] => Ok(Self {
                name: name.to_string(),
            }),
            _ => Err(ShellError::usage(
                "unsetenv",
                "usage: unsetenv VARIABLE",
                1,
            )),
        }
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        session.env.remove_var(&self.name);
        Ok(0)
    }
}

/// Exit shell process
pub struct Exit {
    /// explicit status, already reduced modulo 256; `None` reuses the last status.
    pub code: Option<ExitCode>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        let Some(arg) = args.first() else {
            return Ok(Self { code: None });
        };
        arg.bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| arg.parse::<ExitCode>().ok())
            .flatten()
            .map(|code| Self {
                code: Some(code % 256),
            })
            .ok_or_else(|| ShellError::usage("exit", format!("Illegal number: {arg}"), 2))
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        let code = self.code.unwrap_or(session.last_status);
        session.exit_request = Some(code);
        Ok(code)
    }
}

/// Print general or per-command usage text.
pub struct Help {
    pub topic: Option<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        Ok(Self {
            topic: args.first().map(|t| t.to_string()),
        })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        let text = match self.topic.as_deref() {
            None => help::format_help_list(),
            Some(topic) => match help::get_help(topic) {
                Some(cmd) => help::format_help(cmd),
                None => {
                    return Err(ShellError::usage(
                        "help",
                        format!("no help topics match '{topic}'"),
                        1,
                    ));
                }
            },
        };
        stdout.write_all(text.as_bytes())?;
        Ok(0)
    }
}
