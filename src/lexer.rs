//! A module implementing argument tokenization for a single chained command.

/// Characters that separate arguments.
const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Splits one command's text into its argument vector.
///
/// There is no quoting: every run of delimiter characters ends an argument.
/// An empty or all-blank command yields an empty vector, which the executor
/// treats as a no-op.
///
/// # Arguments
/// * `text` - The command text taken from one link of a separator chain.
pub fn split_into_tokens(text: &str) -> Vec<String> {
    text.split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `c` separates arguments.
pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}
