//! Target-safety analysis for `rm` invocations.
//!
//! The rule table flags every recursive+force `rm`; this module decides
//! whether such a command may still run because everything it deletes lives
//! under an explicitly allow-listed temp prefix.
//!
//! Variables like `$TMPDIR` are never evaluated (a hostile or misconfigured
//! value could be `/`). Only the explicit fallback forms
//! `${TMPDIR:-/tmp}/...` and `${TMPDIR:-/var/tmp}/...` are accepted as
//! literal text: the fallback path is itself a safe value no matter what the
//! variable holds at runtime.

use crate::tokenizer::{is_separator, tokenize};

/// The only prefixes under which recursive force-deletion is acceptable.
pub const RM_ALLOWED_PREFIXES: [&str; 4] = [
    "/tmp/",
    "/var/tmp/",
    "${TMPDIR:-/tmp}/",
    "${TMPDIR:-/var/tmp}/",
];

/// Decide whether every `rm` invocation in a (possibly compound) command is
/// confined to the allow-listed temp prefixes.
///
/// Walks the token stream: each token equal to `"rm"` opens an invocation.
/// Options are consumed while tokens start with `-` (`--recursive` and
/// `--force` count as their short flags; a literal `--` ends options); the
/// targets are everything up to the next separator. An invocation with both
/// `r` and `f` flags must have at least one target and every target must
/// start with an allowed prefix. Invocations without both flags impose no
/// constraint.
///
/// Unbalanced quoting makes the command impossible to analyze, so it is
/// reported unsafe rather than unverified.
#[must_use]
pub fn rm_targets_are_safe(command: &str) -> bool {
    let Ok(tokens) = tokenize(command) else {
        return false;
    };

    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] != "rm" {
            i += 1;
            continue;
        }
        i += 1;

        let mut recursive = false;
        let mut force = false;

        while i < tokens.len() {
            let tok = tokens[i].as_str();
            if tok == "--" {
                i += 1;
                break;
            }
            if is_separator(tok) || !tok.starts_with('-') {
                break;
            }
            if tok == "--recursive" {
                recursive = true;
            } else if tok == "--force" {
                force = true;
            } else if !tok.starts_with("--") {
                // Short cluster like -rf, -fR, -vf
                if tok.chars().any(|c| c == 'r' || c == 'R') {
                    recursive = true;
                }
                if tok.contains('f') {
                    force = true;
                }
            }
            i += 1;
        }

        let mut target_count = 0usize;
        let mut all_allowed = true;
        while i < tokens.len() && !is_separator(&tokens[i]) {
            target_count += 1;
            if !RM_ALLOWED_PREFIXES
                .iter()
                .any(|prefix| tokens[i].starts_with(prefix))
            {
                all_allowed = false;
            }
            i += 1;
        }

        if recursive && force && (target_count == 0 || !all_allowed) {
            return false;
        }
    }

    true
}
