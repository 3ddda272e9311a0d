//! Splitting an expanded line into a chain of conditionally executed commands.

use crate::command::ExitCode;

/// How a command is joined to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// First command of the line.
    None,
    /// `;`
    Sequential,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl Separator {
    /// Whether a command joined by this separator runs, given the status of the
    /// last command that actually ran.
    pub fn should_run(self, last_status: ExitCode) -> bool {
        match self {
            Separator::None | Separator::Sequential => true,
            Separator::And => last_status == 0,
            Separator::Or => last_status != 0,
        }
    }
}

/// One element of a separator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub separator: Separator,
    /// Raw command text, whitespace included.
    pub text: String,
}

/// Partition `line` at `;`, `&&` and `||`, in execution order.
///
/// Two-character operators are matched before `;`. A lone `&` or `|` is kept
/// as part of the command text.
pub fn split_commands(line: &str) -> Vec<Link> {
    let mut chain = Vec::new();
    let mut separator = Separator::None;
    let mut start = 0;
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let next = match (bytes[i], bytes.get(i + 1)) {
            (b'&', Some(b'&')) => Some((Separator::And, 2)),
            (b'|', Some(b'|')) => Some((Separator::Or, 2)),
            (b';', _) => Some((Separator::Sequential, 1)),
            _ => None,
        };
        match next {
            Some((kind, len)) => {
                chain.push(Link {
                    separator,
                    text: line[start..i].to_string(),
                });
                separator = kind;
                i += len;
                start = i;
            }
            None => i += 1,
        }
    }
    chain.push(Link {
        separator,
        text: line[start..].to_string(),
    });
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(line: &str) -> (Vec<Separator>, Vec<String>) {
        split_commands(line)
            .into_iter()
            .map(|link| (link.separator, link.text.trim().to_string()))
            .unzip()
    }

    #[test]
    fn single_command() {
        assert_eq!(shape("ls -l"), (vec![Separator::None], vec!["ls -l".to_string()]));
    }

    #[test]
    fn mixed_chain_in_order() {
        let (separators, texts) = shape("a ; b && c || d");
        assert_eq!(
            separators,
            vec![
                Separator::None,
                Separator::Sequential,
                Separator::And,
                Separator::Or
            ]
        );
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn keeps_raw_text() {
        let chain = split_commands(" echo  a ;echo b");
        assert_eq!(chain[0].text, " echo  a ");
        assert_eq!(chain[1].text, "echo b");
    }

    #[test]
    fn lone_ampersand_and_pipe_are_literal() {
        let (separators, texts) = shape("echo a&b|c");
        assert_eq!(separators, vec![Separator::None]);
        assert_eq!(texts, vec!["echo a&b|c"]);
    }

    #[test]
    fn trailing_separator_yields_empty_command() {
        let (separators, texts) = shape("ls;");
        assert_eq!(separators, vec![Separator::None, Separator::Sequential]);
        assert_eq!(texts, vec!["ls", ""]);
    }

    #[test]
    fn conditions() {
        assert!(Separator::None.should_run(1));
        assert!(Separator::Sequential.should_run(1));
        assert!(Separator::And.should_run(0));
        assert!(!Separator::And.should_run(2));
        assert!(Separator::Or.should_run(127));
        assert!(!Separator::Or.should_run(0));
    }
}
