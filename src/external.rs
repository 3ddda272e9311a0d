use crate::command::{ExecutableCommand, ExitCode};
use crate::error::ShellError;
use crate::session::Session;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::debug;

/// Command that is not a builtin.
pub struct ExternalCommand {
    /// Name as typed; becomes the child's `argv[0]` and appears in error messages.
    name: String,
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: String, program: PathBuf, args: Vec<OsString>) -> Self {
        Self {
            name,
            program,
            args,
        }
    }

    /// Resolve `name` against the session and build the command, or report why
    /// it cannot run.
    pub fn resolve(name: &str, args: &[&str], session: &Session) -> Result<Self, ShellError> {
        let resolution = match session.env.get_var("PATH") {
            Some(search_paths) => find_command_path(search_paths, &session.env.current_dir, name),
            // Without PATH only names with a slash can be found.
            None if name.contains('/') => find_command_path("", &session.env.current_dir, name),
            None => Resolution::NotFound,
        };
        match resolution {
            Resolution::Executable(program) => {
                debug!(command = name, program = %program.display(), "resolved");
                Ok(Self::new(
                    name.to_string(),
                    program,
                    args.iter().map(OsString::from).collect(),
                ))
            }
            Resolution::NotExecutable(path) => {
                debug!(command = name, path = %path.display(), "not executable");
                Err(ShellError::PermissionDenied(name.to_string()))
            }
            Resolution::NotFound => Err(ShellError::CommandNotFound(name.to_string())),
        }
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode, ShellError> {
        // The child writes to the real stdout; anything buffered must land first.
        stdout.flush()?;

        let mut command = std::process::Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(&self.name);
        }
        let spawned = command
            .args(&self.args)
            .env_clear()
            .envs(session.env.iter())
            .current_dir(&session.env.current_dir)
            .spawn();

        // The file was found, so any refusal by the OS (a missing `#!`
        // interpreter included) is a permission failure.
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                debug!(command = %self.name, error = %err, "spawn failed");
                return Err(ShellError::PermissionDenied(self.name));
            }
        };
        let exit_status = child.wait()?;
        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        debug!(command = %self.name, code, "child finished");
        Ok(code)
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else {
        255
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    255
}

/// Outcome of looking a command name up.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Executable(PathBuf),
    /// A file exists but cannot be executed: no execute bit, or a directory.
    NotExecutable(PathBuf),
    NotFound,
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Name containing `/`: checked directly, relative names against `current_dir`.
/// - Otherwise: each directory in `search_paths` (colon-separated) in order; an
///   empty entry means `current_dir`. The first executable regular file wins.
///   A non-executable match is only reported when nothing executable follows.
/// - Empty name: `NotFound`.
pub fn find_command_path(search_paths: &str, current_dir: &Path, name: &str) -> Resolution {
    if name.is_empty() {
        return Resolution::NotFound;
    }

    if name.contains('/') {
        let path = current_dir.join(name);
        return if is_executable_file(&path) {
            Resolution::Executable(path)
        } else if path.exists() {
            Resolution::NotExecutable(path)
        } else {
            Resolution::NotFound
        };
    }

    let mut fallback = None;
    for dir in search_paths.split(':') {
        let dir = if dir.is_empty() {
            current_dir.to_path_buf()
        } else {
            current_dir.join(dir)
        };
        let path = dir.join(name);
        if is_executable_file(&path) {
            return Resolution::Executable(path);
        }
        if fallback.is_none() && path.is_file() {
            fallback = Some(path);
        }
    }
    match fallback {
        Some(path) => Resolution::NotExecutable(path),
        None => Resolution::NotFound,
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write file");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");
        path
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing_true() {
        let res = find_command_path("", Path::new("/"), "/bin/sh");
        assert_eq!(res, Resolution::Executable(PathBuf::from("/bin/sh")));
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let res = find_command_path("/bin", Path::new("/"), "/bin/nonexisting");
        assert_eq!(res, Resolution::NotFound);
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let res = find_command_path("/nonexistent_dir:/bin", Path::new("/"), "sh");
        assert_eq!(res, Resolution::Executable(PathBuf::from("/bin/sh")));
    }

    #[test]
    #[cfg(unix)]
    fn single_component_not_found_in_path() {
        let res = find_command_path("/bin", Path::new("/"), "nonexisting_cmd_xyz");
        assert_eq!(res, Resolution::NotFound);
    }

    #[test]
    #[cfg(unix)]
    fn first_match_in_path_order_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let expected = make_file(first.path(), "tool", 0o755);
        make_file(second.path(), "tool", 0o755);

        let paths = format!("{}:{}", first.path().display(), second.path().display());
        let res = find_command_path(&paths, Path::new("/"), "tool");
        assert_eq!(res, Resolution::Executable(expected));
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_in_path_is_skipped_then_reported() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let plain = make_file(first.path(), "tool", 0o644);

        let only_plain = first.path().display().to_string();
        assert_eq!(
            find_command_path(&only_plain, Path::new("/"), "tool"),
            Resolution::NotExecutable(plain)
        );

        let runnable = make_file(second.path(), "tool", 0o755);
        let paths = format!("{}:{}", first.path().display(), second.path().display());
        assert_eq!(
            find_command_path(&paths, Path::new("/"), "tool"),
            Resolution::Executable(runnable)
        );
    }

    #[test]
    #[cfg(unix)]
    fn relative_path_resolves_against_current_dir() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir(base.path().join("bin")).unwrap();
        let script = make_file(&base.path().join("bin"), "run", 0o755);

        let res = find_command_path("/does/not/matter", base.path(), "bin/run");
        assert_eq!(res, Resolution::Executable(script));

        let res = find_command_path("", base.path(), "./bin/run");
        assert_eq!(
            res,
            Resolution::Executable(base.path().join("./bin/run"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn path_to_directory_or_plain_file_is_not_executable() {
        let base = tempfile::tempdir().unwrap();
        let plain = make_file(base.path(), "notes.txt", 0o644);
        fs::create_dir(base.path().join("dir")).unwrap();

        assert_eq!(
            find_command_path("", base.path(), "./notes.txt"),
            Resolution::NotExecutable(base.path().join("./notes.txt"))
        );
        assert!(plain.exists());
        assert_eq!(
            find_command_path("", base.path(), "./dir"),
            Resolution::NotExecutable(base.path().join("./dir"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn empty_path_entry_means_current_dir() {
        let base = tempfile::tempdir().unwrap();
        let script = make_file(base.path(), "local_tool", 0o755);

        let res = find_command_path("/nonexistent_dir:", base.path(), "local_tool");
        assert_eq!(res, Resolution::Executable(script));
    }

    #[test]
    fn empty_name_is_not_found() {
        assert_eq!(
            find_command_path("/bin", Path::new("/"), ""),
            Resolution::NotFound
        );
    }
}
