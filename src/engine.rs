//! The decision engine: one command in, one verdict out.
//!
//! Rules are checked in table order. The first matching standard rule denies
//! immediately. An rm-shaped match instead asks the rm-target analyzer: if
//! the deletion is confined to allow-listed temp paths the loop continues
//! (a safe `rm` must not mask a destructive sibling joined by `&&`), and if
//! not, the command is denied with a reason naming the allowed prefixes.

use crate::rm_safety::{rm_targets_are_safe, RM_ALLOWED_PREFIXES};
use crate::rules::{RuleKind, RULES};

/// The outcome of evaluating one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Command may run; the hook stays silent.
    Allow,
    /// Command must be blocked.
    Deny {
        /// Why the command was blocked.
        reason: String,
    },
}

impl Verdict {
    /// Check if the command was denied.
    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Get the denial reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny { reason } => Some(reason),
        }
    }
}

/// The reason used when an rm-shaped rule fires and the target analysis
/// cannot vouch for the command.
#[must_use]
pub fn rm_denial_reason() -> String {
    format!(
        "rm -rf is destructive. Only explicit temp paths are allowed ({}).",
        RM_ALLOWED_PREFIXES.join(", ")
    )
}

/// Evaluate a command against the rule table.
///
/// Pure: the same command always yields the same verdict. The rm-target
/// analysis is computed at most once per command even though two rm-shaped
/// rules can fire for the same input.
#[must_use]
pub fn decide(command: &str) -> Verdict {
    decide_with_rule(command).0
}

/// Like [`decide`], but also names the rule behind a denial (for the stderr
/// banner and log file).
#[must_use]
pub fn decide_with_rule(command: &str) -> (Verdict, Option<&'static str>) {
    if command.is_empty() {
        return (Verdict::Allow, None);
    }

    let mut rm_verified: Option<bool> = None;

    for rule in &RULES {
        if !rule.regex.is_match(command) {
            continue;
        }
        match rule.kind {
            RuleKind::Standard => {
                return (
                    Verdict::Deny {
                        reason: rule.reason.to_string(),
                    },
                    Some(rule.name),
                );
            }
            RuleKind::RmShaped => {
                let safe = *rm_verified.get_or_insert_with(|| rm_targets_are_safe(command));
                if !safe {
                    return (
                        Verdict::Deny {
                            reason: rm_denial_reason(),
                        },
                        Some(rule.name),
                    );
                }
                // Verified safe: keep checking later rules so a destructive
                // sibling command still denies.
            }
        }
    }

    (Verdict::Allow, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_allows(command: &str) {
        assert_eq!(decide(command), Verdict::Allow, "expected allow: {command}");
    }

    fn assert_denies(command: &str, reason_fragment: &str) {
        match decide(command) {
            Verdict::Deny { reason } => assert!(
                reason.contains(reason_fragment),
                "deny reason for {command:?} was {reason:?}, expected to contain {reason_fragment:?}"
            ),
            Verdict::Allow => panic!("expected deny: {command}"),
        }
    }

    #[test]
    fn no_matching_rule_allows() {
        assert_allows("git status");
        assert_allows("cargo test");
        assert_allows("ls -la && echo ok");
        assert_allows("");
    }

    #[test]
    fn reset_hard_denies_anywhere() {
        assert_denies("git reset --hard", "destroys uncommitted changes");
        assert_denies("git reset --hard HEAD~3", "destroys uncommitted changes");
        assert_denies("cd /repo && git reset --hard", "destroys uncommitted changes");
        assert_denies("GIT RESET --HARD", "destroys uncommitted changes");
    }

    #[test]
    fn first_matching_standard_rule_wins() {
        // Both checkout-discard and restore rules could never fire together,
        // but reset --hard + stash clear can; table order picks reset.
        assert_denies(
            "git reset --hard && git stash clear",
            "git reset --hard destroys",
        );
    }

    #[test]
    fn safe_rm_in_temp_is_allowed() {
        assert_allows("rm -rf /tmp/ubs-test-dir");
        assert_allows("rm -rf /var/tmp/cache");
        assert_allows("rm -rf ${TMPDIR:-/tmp}/scratch");
        assert_allows("rm -fr /tmp/a /tmp/b");
    }

    #[test]
    fn unsafe_rm_is_denied_with_prefix_reason() {
        assert_denies("rm -rf /home/user", "Only explicit temp paths");
        assert_denies("rm -rf /home/user", "/var/tmp/");
        assert_denies("rm -rf /home/user", "${TMPDIR:-/tmp}/");
        assert_denies("rm -rf build/", "Only explicit temp paths");
    }

    #[test]
    fn unsafe_invocation_poisons_compound_command() {
        assert_denies("rm -rf /tmp/ok && rm -rf /home/user", "Only explicit temp paths");
        assert_denies("rm -rf /home/user && rm -rf /tmp/ok", "Only explicit temp paths");
    }

    #[test]
    fn both_rm_rules_matching_safe_command_still_allows() {
        // "rm -rf /tmp/x" fires the cluster rule and the leading-slash rule;
        // both must resolve to "continue", not accumulate into a deny.
        assert_allows("rm -rf /tmp/x");
    }

    #[test]
    fn safe_rm_does_not_mask_destructive_sibling() {
        assert_denies("rm -rf /tmp/ok && git reset --hard", "destroys uncommitted");
        assert_denies("rm -rf /tmp/ok; git stash clear", "permanently deletes ALL");
    }

    #[test]
    fn unbalanced_quoting_in_rm_command_fails_closed() {
        assert_denies("rm -rf '/tmp/oops", "Only explicit temp paths");
    }

    #[test]
    fn checkout_branch_creation_is_allowed() {
        assert_allows("git checkout -b feature/x");
        assert_allows("git checkout --orphan gh-pages");
    }

    #[test]
    fn force_push_rules() {
        assert_denies("git push --force origin main", "destroy remote history");
        assert_denies("git push -f origin main", "destroy remote history");
        assert_allows("git push --force-with-lease origin main");
        assert_allows("git push origin main");
    }

    #[test]
    fn restore_rules() {
        assert_denies("git restore src/main.rs", "discards uncommitted changes");
        assert_allows("git restore --staged src/main.rs");
        assert_denies("git restore --worktree src/main.rs", "--worktree");
    }

    #[test]
    fn verdict_is_idempotent() {
        for command in [
            "git reset --hard",
            "rm -rf /tmp/x",
            "rm -rf /home/user",
            "git status",
        ] {
            assert_eq!(decide(command), decide(command), "verdict changed: {command}");
        }
    }

    #[test]
    fn rm_denial_reason_names_all_prefixes() {
        let reason = rm_denial_reason();
        for prefix in RM_ALLOWED_PREFIXES {
            assert!(reason.contains(prefix), "reason missing {prefix}");
        }
    }

    #[test]
    fn denial_names_the_deciding_rule() {
        let (verdict, rule) = decide_with_rule("git reset --hard");
        assert!(verdict.is_deny());
        assert_eq!(rule, Some("reset-hard"));

        let (verdict, rule) = decide_with_rule("rm -rf /home/user");
        assert!(verdict.is_deny());
        assert_eq!(rule, Some("rm-recursive-force"));

        // A safely-verified rm must attribute the denial to the standard
        // rule that actually decided, not to the rm rule that continued.
        let (verdict, rule) = decide_with_rule("rm -rf /tmp/ok && git stash clear");
        assert!(verdict.reason().is_some_and(|r| r.contains("ALL stashed")));
        assert_eq!(rule, Some("stash-clear"));

        assert_eq!(decide_with_rule("git status"), (Verdict::Allow, None));
    }
}
