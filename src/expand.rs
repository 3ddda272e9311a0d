//! `$` variable expansion over a whole input line.

use crate::session::Session;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    // `$?` and `$$` come first in the alternation so they win over names.
    Regex::new(r"\$(\?|\$|[A-Za-z0-9_]+)").expect("variable pattern is valid")
});

/// One matched `$` token and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Byte span of the token in the original line, `$` included.
    pub span: Range<usize>,
    pub value: String,
}

/// Find every variable token in `line` and resolve it against the session.
///
/// - `$?` is the last status.
/// - `$$` is the interpreter's pid.
/// - `$0` is the program name.
/// - `$NAME` is the variable's value, or empty when unset.
///
/// A `$` followed by anything else is not a token and stays as it is.
pub fn find_substitutions(line: &str, session: &Session) -> Vec<Substitution> {
    VARIABLE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = match &caps[1] {
                "?" => session.last_status.to_string(),
                "$" => session.process_id.clone(),
                "0" => session.program_name.clone(),
                name => session.env.get_var(name).unwrap_or_default().to_string(),
            };
            Some(Substitution {
                span: whole.range(),
                value,
            })
        })
        .collect()
}

/// Rewrite `line` with all substitutions applied.
///
/// Replacement text is copied verbatim and never scanned again.
pub fn expand_variables(line: &str, session: &Session) -> String {
    let substitutions = find_substitutions(line, session);
    if substitutions.is_empty() {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for sub in &substitutions {
        out.push_str(&line[last..sub.span.start]);
        out.push_str(&sub.value);
        last = sub.span.end;
    }
    out.push_str(&line[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use std::path::PathBuf;

    fn session() -> Session {
        let env = Environment::from_vars(
            [("HOME", "/home/user"), ("FOO", "bar"), ("WITH_DOLLAR", "$FOO")],
            PathBuf::from("/"),
        );
        let mut session = Session::new("./chainsh", env);
        session.process_id = "4242".into();
        session
    }

    #[test]
    fn expands_status_and_pid() {
        let mut s = session();
        s.last_status = 127;
        assert_eq!(expand_variables("echo $?", &s), "echo 127");
        assert_eq!(expand_variables("echo $$", &s), "echo 4242");
        assert_eq!(expand_variables("echo $$$?", &s), "echo 4242127");
    }

    #[test]
    fn expands_named_variables() {
        let s = session();
        assert_eq!(expand_variables("cd $HOME", &s), "cd /home/user");
        assert_eq!(expand_variables("echo $FOO-$FOO", &s), "echo bar-bar");
        assert_eq!(expand_variables("echo $0", &s), "echo ./chainsh");
    }

    #[test]
    fn unset_variable_becomes_empty() {
        let s = session();
        assert_eq!(expand_variables("echo [$UNSET_VAR]", &s), "echo []");
    }

    #[test]
    fn bare_dollar_stays_literal() {
        let s = session();
        assert_eq!(expand_variables("echo $", &s), "echo $");
        assert_eq!(expand_variables("echo $ x", &s), "echo $ x");
        assert_eq!(expand_variables("echo $-x", &s), "echo $-x");
    }

    #[test]
    fn does_not_reexpand_substituted_text() {
        let s = session();
        assert_eq!(expand_variables("echo $WITH_DOLLAR", &s), "echo $FOO");
    }

    #[test]
    fn preserves_surrounding_whitespace() {
        let s = session();
        assert_eq!(
            expand_variables("  echo\t$FOO ;  ls  ", &s),
            "  echo\tbar ;  ls  "
        );
    }

    #[test]
    fn records_spans() {
        let s = session();
        let subs = find_substitutions("a $FOO b $?", &s);
        assert_eq!(
            subs,
            vec![
                Substitution {
                    span: 2..6,
                    value: "bar".into()
                },
                Substitution {
                    span: 9..11,
                    value: "0".into()
                },
            ]
        );
    }
}
