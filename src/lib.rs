#![forbid(unsafe_code)]
//! Git/filesystem safety guard (gsg) library.
//!
//! Blocks destructive commands that can lose uncommitted work or delete
//! files, running as a Claude Code `PreToolUse` hook for the Bash tool.
//!
//! # Architecture
//!
//! ```text
//! stdin JSON ──▶ hook (protocol parsing)
//!                  │
//!                  ▼
//!               engine (ordered rule loop)
//!                  │
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//!      rules            rm_safety ──▶ tokenizer
//!  (pattern table)    (target analysis)
//! ```
//!
//! The engine checks the rule table in order. Standard rules deny on first
//! match; rm-shaped rules defer to the rm-target analyzer, which re-parses
//! the command with a quote-aware tokenizer and allows recursive force
//! deletion only under explicit temp-path prefixes.
//!
//! Failure policy: ambiguity inside rm analysis fails closed (deny), while
//! protocol-level problems (bad JSON, oversized input) fail open (allow) so
//! the guard never becomes the reason automation halts.

pub mod cli;
pub mod config;
pub mod engine;
pub mod hook;
pub mod regex_engine;
pub mod rm_safety;
pub mod rules;
pub mod tokenizer;

pub use config::Config;
pub use engine::{decide, decide_with_rule, rm_denial_reason, Verdict};
pub use hook::{HookInput, HookOutput, HookReadError, HookSpecificOutput, ToolInput};
pub use regex_engine::{needs_backtracking_engine, CompiledRegex, LazyCompiledRegex};
pub use rm_safety::{rm_targets_are_safe, RM_ALLOWED_PREFIXES};
pub use rules::{Rule, RuleKind, RULES};
pub use tokenizer::{is_separator, tokenize, Tokens, UnbalancedQuote};
