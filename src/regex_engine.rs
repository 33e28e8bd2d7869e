//! Dual regex engine abstraction for the rule table.
//!
//! Most rules compile on the linear-time `regex` crate (O(n) guaranteed, no
//! backtracking). A few — the checkout-ref, restore, and force-push rules —
//! need negative lookahead and therefore `fancy_regex`.
//!
//! [`LazyCompiledRegex`] defers compilation to first use so that constructing
//! the rule table costs nothing on the common allow path.

use std::sync::OnceLock;

/// A compiled regex that auto-selects between linear-time and backtracking
/// engines based on the pattern's syntax.
#[derive(Debug)]
pub enum CompiledRegex {
    /// Linear-time regex (O(n) guaranteed, no backtracking).
    Linear(regex::Regex),
    /// Backtracking regex (supports lookahead/lookbehind).
    Backtracking(fancy_regex::Regex),
}

impl CompiledRegex {
    /// Compile a pattern, auto-selecting the appropriate engine.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn new(pattern: &str) -> Result<Self, String> {
        if needs_backtracking_engine(pattern) {
            fancy_regex::Regex::new(pattern)
                .map(Self::Backtracking)
                .map_err(|e| format!("fancy_regex compile error: {e}"))
        } else {
            regex::Regex::new(pattern)
                .map(Self::Linear)
                .map_err(|e| format!("regex compile error: {e}"))
        }
    }

    /// Check if the pattern matches the text.
    ///
    /// For the backtracking engine, returns `false` on regex execution errors.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Linear(re) => re.is_match(text),
            Self::Backtracking(re) => re.is_match(text).unwrap_or(false),
        }
    }

    /// Find the first match, as start/end byte offsets.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Self::Linear(re) => re.find(text).map(|m| (m.start(), m.end())),
            Self::Backtracking(re) => re.find(text).ok().flatten().map(|m| (m.start(), m.end())),
        }
    }

    /// Get the pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linear(re) => re.as_str(),
            Self::Backtracking(re) => re.as_str(),
        }
    }

    /// Check if this regex uses the backtracking engine.
    #[must_use]
    pub const fn uses_backtracking(&self) -> bool {
        matches!(self, Self::Backtracking(_))
    }
}

/// Check if a pattern requires the backtracking engine.
///
/// Returns `true` for features the linear-time `regex` crate does not
/// support: lookahead (`(?=`, `(?!`), lookbehind (`(?<=`, `(?<!`), atomic
/// groups (`(?>`), and backreferences (`\1`..`\9`).
///
/// This is a syntax heuristic; a false positive just means the slower engine
/// runs a pattern the fast engine could have handled.
#[must_use]
pub fn needs_backtracking_engine(pattern: &str) -> bool {
    if pattern.contains("(?=")
        || pattern.contains("(?!")
        || pattern.contains("(?<=")
        || pattern.contains("(?<!")
        || pattern.contains("(?>")
    {
        return true;
    }

    let bytes = pattern.as_bytes();
    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] == b'\\' {
            let next = bytes[i + 1];
            if next.is_ascii_digit() && next != b'0' {
                return true;
            }
        }
    }

    false
}

/// A lazily-compiled regex pattern using [`CompiledRegex`].
///
/// Construction is `const` and stores only the pattern text; the regex is
/// compiled once on first use. Thread-safe via `OnceLock`.
#[derive(Debug)]
pub struct LazyCompiledRegex {
    pattern: &'static str,
    compiled: OnceLock<Result<CompiledRegex, String>>,
}

impl LazyCompiledRegex {
    /// Create a new lazy regex pattern. Performs no compilation.
    #[must_use]
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            compiled: OnceLock::new(),
        }
    }

    /// Get or compile the regex. Returns `None` if compilation fails.
    fn get_compiled(&self) -> Option<&CompiledRegex> {
        self.compiled
            .get_or_init(|| CompiledRegex::new(self.pattern))
            .as_ref()
            .ok()
    }

    /// Check if the pattern matches the text.
    ///
    /// Returns `false` on compile or execution errors.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.get_compiled()
            .is_some_and(|compiled| compiled.is_match(haystack))
    }

    /// Find the span (start, end) of the first match.
    #[must_use]
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        self.get_compiled()
            .and_then(|compiled| compiled.find(haystack))
    }

    /// Get the pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern
    }

    /// Check if the regex has been compiled (for tests).
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        matches!(self.compiled.get(), Some(Ok(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_engine_for_simple_patterns() {
        let re = CompiledRegex::new(r"rm\s+-rf").unwrap();
        assert!(!re.uses_backtracking());
        assert!(re.is_match("rm -rf /"));
    }

    #[test]
    fn backtracking_engine_for_lookahead() {
        let re = CompiledRegex::new(r"git\s+push\s+.*--force(?!-with-lease)").unwrap();
        assert!(re.uses_backtracking());
        assert!(re.is_match("git push --force origin main"));
        assert!(!re.is_match("git push --force-with-lease origin main"));
    }

    #[test]
    fn needs_backtracking_detection() {
        assert!(!needs_backtracking_engine(r"git\s+status"));
        assert!(!needs_backtracking_engine(r"\d+\.\d+")); // \d is not a backreference
        assert!(needs_backtracking_engine(r"(?=lookahead)"));
        assert!(needs_backtracking_engine(r"(?!negative)"));
        assert!(needs_backtracking_engine(r"(?<=behind)"));
        assert!(needs_backtracking_engine(r"(foo)\1"));
    }

    #[test]
    fn compile_error_is_reported() {
        let result = CompiledRegex::new(r"(unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn find_spans() {
        let re = CompiledRegex::new(r"rm").unwrap();
        assert_eq!(re.find("test rm command"), Some((5, 7)));
        assert_eq!(re.find("no match"), None);
    }

    #[test]
    fn lazy_compiles_on_first_use() {
        let lazy = LazyCompiledRegex::new(r"test\s+pattern");
        assert!(!lazy.is_compiled());
        assert!(lazy.is_match("test pattern"));
        assert!(lazy.is_compiled());
    }

    #[test]
    fn lazy_works_as_static() {
        static PATTERN: LazyCompiledRegex = LazyCompiledRegex::new(r"(?i)git\s+reset\s+--hard");
        assert!(PATTERN.is_match("git reset --hard HEAD"));
        assert!(PATTERN.is_match("GIT RESET --HARD"));
        assert!(!PATTERN.is_match("git reset --soft"));
    }

    #[test]
    fn worst_case_input_stays_linear() {
        // Classic ReDoS shape handled by the linear engine
        let re = CompiledRegex::new(r"(a+)+$").unwrap();
        assert!(!re.uses_backtracking());
        let mut input = "a".repeat(50);
        input.push('!');
        assert!(!re.is_match(&input));
    }
}
