//! Quote-aware shell word splitting.
//!
//! This is a deliberately narrow lexer, not a shell interpreter. It understands
//! exactly what the rm-target analyzer needs:
//!
//! - whitespace word splitting
//! - single quotes (everything literal until the closing quote)
//! - double quotes (spaces preserved; backslash escapes `"` `\` `$` `` ` ``)
//! - backslash escaping outside quotes
//! - command separators (`&&`, `||`, `;`, `|`, `&`, newline) emitted as their
//!   own tokens so a compound command splits into independent invocations
//!
//! It performs no variable expansion, no globbing, and no command
//! substitution: `$TMPDIR` comes back as the literal text `$TMPDIR`.

use smallvec::SmallVec;
use std::fmt;

/// Token buffer sized for typical hook commands (rarely more than a handful
/// of words).
pub type Tokens = SmallVec<[String; 16]>;

/// The only error this lexer raises: a quote was opened and never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedQuote {
    /// The quote character left open (`'` or `"`).
    pub quote: char,
}

impl fmt::Display for UnbalancedQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbalanced {} quote in command", self.quote)
    }
}

impl std::error::Error for UnbalancedQuote {}

/// Returns true for tokens that separate independent invocations.
#[must_use]
pub fn is_separator(token: &str) -> bool {
    matches!(token, "&&" | "||" | ";" | "|" | "&" | "\n")
}

/// Split a raw command string into shell words and separator tokens.
///
/// # Errors
///
/// Returns [`UnbalancedQuote`] when a single or double quote is left open.
/// Callers doing safety analysis must treat that as "not verified safe".
pub fn tokenize(command: &str) -> Result<Tokens, UnbalancedQuote> {
    let mut tokens = Tokens::new();
    let mut current = String::new();
    // Distinguishes an empty quoted word ('' or "") from no word at all.
    let mut in_word = false;
    let mut chars = command.chars().peekable();

    let flush = |tokens: &mut Tokens, current: &mut String, in_word: &mut bool| {
        if *in_word {
            tokens.push(std::mem::take(current));
            *in_word = false;
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(UnbalancedQuote { quote: '\'' }),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(esc @ ('"' | '\\' | '$' | '`')) => current.push(esc),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(UnbalancedQuote { quote: '"' }),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(UnbalancedQuote { quote: '"' }),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(ch) => current.push(ch),
                    // Trailing backslash: keep it literal rather than erroring.
                    None => current.push('\\'),
                }
            }
            '&' | '|' => {
                flush(&mut tokens, &mut current, &mut in_word);
                if chars.peek() == Some(&c) {
                    chars.next();
                    tokens.push(format!("{c}{c}"));
                } else {
                    tokens.push(c.to_string());
                }
            }
            ';' => {
                flush(&mut tokens, &mut current, &mut in_word);
                tokens.push(";".to_string());
            }
            '\n' => {
                flush(&mut tokens, &mut current, &mut in_word);
                tokens.push("\n".to_string());
            }
            c if c.is_whitespace() => {
                flush(&mut tokens, &mut current, &mut in_word);
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }

    flush(&mut tokens, &mut current, &mut in_word);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(command: &str) -> Vec<String> {
        tokenize(command).unwrap().into_vec()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(words("rm -rf /tmp/x"), ["rm", "-rf", "/tmp/x"]);
        assert_eq!(words("  git   status  "), ["git", "status"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(words("rm 'a b'"), ["rm", "a b"]);
        assert_eq!(words("echo '$TMPDIR'"), ["echo", "$TMPDIR"]);
        assert_eq!(words("rm '/tmp/a;b'"), ["rm", "/tmp/a;b"]);
    }

    #[test]
    fn double_quotes_preserve_spaces() {
        assert_eq!(words(r#"rm "a b""#), ["rm", "a b"]);
        assert_eq!(words(r#"echo "x\"y""#), ["echo", "x\"y"]);
        assert_eq!(words(r#"echo "a\\b""#), ["echo", "a\\b"]);
    }

    #[test]
    fn no_variable_expansion() {
        // The dollar text must come back verbatim; nothing is resolved.
        assert_eq!(
            words("rm -rf ${TMPDIR:-/tmp}/x"),
            ["rm", "-rf", "${TMPDIR:-/tmp}/x"]
        );
    }

    #[test]
    fn backslash_escapes_outside_quotes() {
        assert_eq!(words(r"rm a\ b"), ["rm", "a b"]);
        assert_eq!(words(r"echo \;"), ["echo", ";"]);
    }

    #[test]
    fn separators_become_tokens() {
        assert_eq!(
            words("rm -rf /tmp/a && rm -rf /tmp/b"),
            ["rm", "-rf", "/tmp/a", "&&", "rm", "-rf", "/tmp/b"]
        );
        assert_eq!(words("a || b"), ["a", "||", "b"]);
        assert_eq!(words("a; b"), ["a", ";", "b"]);
        assert_eq!(words("a | b"), ["a", "|", "b"]);
        assert_eq!(words("a & b"), ["a", "&", "b"]);
    }

    #[test]
    fn unspaced_separators_still_split() {
        assert_eq!(
            words("rm -rf /tmp/a&&rm -rf /home"),
            ["rm", "-rf", "/tmp/a", "&&", "rm", "-rf", "/home"]
        );
        assert_eq!(words("a;b"), ["a", ";", "b"]);
    }

    #[test]
    fn newline_separates_commands() {
        assert_eq!(words("a\nb"), ["a", "\n", "b"]);
    }

    #[test]
    fn empty_quoted_word_is_kept() {
        assert_eq!(words("echo ''"), ["echo", ""]);
        assert_eq!(words(r#"echo """#), ["echo", ""]);
    }

    #[test]
    fn unbalanced_quotes_error() {
        assert_eq!(
            tokenize("rm 'oops"),
            Err(UnbalancedQuote { quote: '\'' })
        );
        assert_eq!(
            tokenize(r#"rm "oops"#),
            Err(UnbalancedQuote { quote: '"' })
        );
        assert_eq!(
            tokenize(r#"rm "trailing\"#),
            Err(UnbalancedQuote { quote: '"' })
        );
    }

    #[test]
    fn is_separator_set() {
        for sep in ["&&", "||", ";", "|", "&", "\n"] {
            assert!(is_separator(sep), "{sep:?} should be a separator");
        }
        assert!(!is_separator("rm"));
        assert!(!is_separator("-rf"));
        assert!(!is_separator("--"));
    }
}
