//! The destructive-command rule table.
//!
//! A fixed, ordered list of patterns matched case-insensitively against the
//! raw command text. Matching is substring search over the whole command, so
//! a destructive sub-command after `&&` or `;` still fires without any shell
//! parsing here.
//!
//! Rules come in two kinds: a [`RuleKind::Standard`] match denies the command
//! outright, while a [`RuleKind::RmShaped`] match defers to the rm-target
//! analyzer, which can vouch for deletions confined to temp directories. The
//! kind is part of the rule's type so the continue-vs-stop dispatch in the
//! engine is visible here, not buried in regex prefixes.

use crate::regex_engine::LazyCompiledRegex;

/// How the decision engine treats a match of this rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// First match wins: deny with this rule's reason.
    Standard,
    /// An `rm` rule: the rm-target analyzer decides whether the deletion is
    /// confined to allow-listed temp paths before this can deny.
    RmShaped,
}

/// A destructive pattern paired with the reason shown when it blocks.
pub struct Rule {
    /// Stable name for display and the `patterns` subcommand.
    pub name: &'static str,
    /// Lazily-compiled regex, matched against the raw command.
    pub regex: LazyCompiledRegex,
    /// Human-readable explanation of why this command is blocked.
    pub reason: &'static str,
    /// Standard (deny on match) or rm-shaped (analyzer decides).
    pub kind: RuleKind,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .field("kind", &self.kind)
            .finish()
    }
}

macro_rules! rule {
    ($name:literal, $re:literal, $reason:literal) => {
        Rule {
            name: $name,
            regex: LazyCompiledRegex::new($re),
            reason: $reason,
            kind: RuleKind::Standard,
        }
    };
    ($name:literal, $re:literal, $reason:literal, rm_shaped) => {
        Rule {
            name: $name,
            regex: LazyCompiledRegex::new($re),
            reason: $reason,
            kind: RuleKind::RmShaped,
        }
    };
}

/// The ordered rule table. Order is significant: the engine always favors the
/// earliest matching standard rule.
pub static RULES: [Rule; 14] = [
    // Git commands that discard uncommitted changes
    rule!(
        "checkout-discard",
        r"(?i)git\s+checkout\s+--\s+",
        "git checkout -- discards uncommitted changes permanently. Use 'git stash' first."
    ),
    rule!(
        "checkout-ref-discard",
        r"(?i)git\s+checkout\s+(?!-b\b)(?!--orphan\b)[^\s]+\s+--\s+",
        "git checkout <ref> -- <path> overwrites working tree. Use 'git stash' first."
    ),
    rule!(
        "restore-worktree",
        r"(?i)git\s+restore\s+(?!--staged\b)[^\s]*\s*$",
        "git restore discards uncommitted changes. Use 'git stash' or 'git diff' first."
    ),
    rule!(
        "restore-worktree-explicit",
        r"(?i)git\s+restore\s+--worktree",
        "git restore --worktree discards uncommitted changes permanently."
    ),
    // Git reset variants
    rule!(
        "reset-hard",
        r"(?i)git\s+reset\s+--hard",
        "git reset --hard destroys uncommitted changes. Use 'git stash' first."
    ),
    rule!(
        "reset-merge",
        r"(?i)git\s+reset\s+--merge",
        "git reset --merge can lose uncommitted changes."
    ),
    // Git clean
    rule!(
        "clean-force",
        r"(?i)git\s+clean\s+-[a-z]*f",
        "git clean -f removes untracked files permanently. Review with 'git clean -n' first."
    ),
    // Force operations
    rule!(
        "push-force-long",
        r"(?i)git\s+push\s+.*--force(?!-with-lease)",
        "Force push can destroy remote history. Use --force-with-lease if necessary."
    ),
    rule!(
        "push-force-short",
        r"(?i)git\s+push\s+-f\b",
        "Force push (-f) can destroy remote history. Use --force-with-lease if necessary."
    ),
    rule!(
        "branch-force-delete",
        r"(?i)git\s+branch\s+-D\b",
        "git branch -D force-deletes without merge check. Use -d for safety."
    ),
    // Destructive filesystem commands: both rm rules defer to the target
    // analyzer, and both may fire for the same command.
    rule!(
        "rm-recursive-force",
        r"(?i)rm\s+-[a-z]*r[a-z]*f|rm\s+-[a-z]*f[a-z]*r",
        "rm -rf is destructive. List files first, then delete individually with permission.",
        rm_shaped
    ),
    rule!(
        "rm-rf-root-home",
        r"(?i)rm\s+-rf\s+[/~]",
        "rm -rf on root or home paths is extremely dangerous.",
        rm_shaped
    ),
    // Git stash destruction
    rule!(
        "stash-drop",
        r"(?i)git\s+stash\s+drop",
        "git stash drop permanently deletes stashed changes. List stashes first."
    ),
    rule!(
        "stash-clear",
        r"(?i)git\s+stash\s+clear",
        "git stash clear permanently deletes ALL stashed changes."
    ),
];
