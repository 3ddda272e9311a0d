use std::env as stdenv;
use std::path::PathBuf;

/// The interpreter's own copy of the environment.
///
/// The environment contains:
/// - `vars`: ordered `NAME=VALUE` pairs with unique names. New names are appended,
///   existing names are updated in place, so `env` lists them in a stable order.
/// - `current_dir`: the working directory used to resolve relative paths and
///   handed to every spawned child.
///
/// Nothing here reads or writes the process environment after construction;
/// children receive exactly these variables.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: Vec<(String, String)>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Copies variables from `std::env::vars()`, initializes `current_dir` from
    /// `std::env::current_dir()` and makes `PWD` agree with it.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut env = Self::from_vars(stdenv::vars(), current_dir);
        let pwd = env.current_dir.to_string_lossy().into_owned();
        env.set_var("PWD", pwd);
        env
    }

    /// Build an environment from explicit pairs. Later duplicates overwrite earlier ones.
    pub fn from_vars<I, K, V>(vars: I, current_dir: PathBuf) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self {
            vars: Vec::new(),
            current_dir,
        };
        for (k, v) in vars {
            env.set_var(k, v);
        }
        env
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or override an environment variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        let key = key.into();
        let val = val.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = val,
            None => self.vars.push((key, val)),
        }
    }

    /// Remove a variable, returning its old value.
    pub fn remove_var(&mut self, key: &str) -> Option<String> {
        let pos = self.vars.iter().position(|(k, _)| k == key)?;
        Some(self.vars.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use std::path::PathBuf;

    fn empty() -> Environment {
        Environment::from_vars(Vec::<(String, String)>::new(), PathBuf::from("/"))
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = empty();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE"));
    }

    #[test]
    fn test_env_keeps_insertion_order_and_unique_keys() {
        let mut env = empty();
        env.set_var("B", "1");
        env.set_var("A", "2");
        env.set_var("B", "3");

        let listed: Vec<_> = env.iter().collect();
        assert_eq!(listed, vec![("B", "3"), ("A", "2")]);
    }

    #[test]
    fn test_env_remove_var() {
        let mut env = empty();
        env.set_var("FOO", "bar");
        assert_eq!(env.remove_var("FOO"), Some("bar".to_string()));
        assert_eq!(env.remove_var("FOO"), None);
        assert_eq!(env.get_var("FOO"), None);
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        let pwd = env.current_dir.to_string_lossy().into_owned();
        assert_eq!(env.get_var("PWD"), Some(pwd.as_str()));
    }
}
