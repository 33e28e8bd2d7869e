#![forbid(unsafe_code)]
//! Git/filesystem safety guard (gsg) for Claude Code.
//!
//! Blocks destructive commands that can lose uncommitted work or delete
//! files. This hook runs before Bash commands execute and can deny dangerous
//! operations.
//!
//! Exit behavior in hook mode:
//!   - Exit 0 with JSON {"hookSpecificOutput": {"permissionDecision": "deny", ...}} = block
//!   - Exit 0 with no output = allow
//!
//! The verdict travels solely through the presence and content of the JSON
//! output; the exit code is always 0 so a guard failure can never halt the
//! hosting automation.

use clap::Parser;
use colored::Colorize;
use git_safety_guard::cli::{self, Cli};
use git_safety_guard::config::Config;
use git_safety_guard::engine::{decide_with_rule, Verdict};
use git_safety_guard::hook;

// Build metadata from vergen (set by build.rs)
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIMESTAMP: Option<&str> = option_env!("VERGEN_BUILD_TIMESTAMP");
const RUSTC_SEMVER: Option<&str> = option_env!("VERGEN_RUSTC_SEMVER");
const CARGO_TARGET: Option<&str> = option_env!("VERGEN_CARGO_TARGET_TRIPLE");

fn main() {
    hook::configure_colors();

    // --version is handled before clap so it works even with stray hook
    // arguments on the command line.
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return;
    }

    // Parse CLI arguments (subcommands). If parsing fails (e.g., unknown
    // flags), print the clap error and exit instead of falling into hook
    // mode and blocking on stdin.
    let parsed = match Cli::try_parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    if parsed.command.is_some() {
        match cli::run_command(parsed) {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    run_hook_mode();
}

/// Hook mode: read one request from stdin, emit at most one denial.
fn run_hook_mode() {
    let config = Config::load();

    // Escape hatch: allow everything without reading patterns.
    if Config::is_bypassed() {
        return;
    }

    let max_input_bytes = config.max_hook_input_bytes();
    let hook_input = match hook::read_hook_input(max_input_bytes) {
        Ok(input) => input,
        Err(hook::HookReadError::InputTooLarge(len)) => {
            eprintln!(
                "[gsg] Warning: stdin input ({len} bytes) exceeds limit ({max_input_bytes} bytes); allowing command (fail-open)"
            );
            return;
        }
        // Fail open on IO or JSON errors: a broken request must not block.
        Err(_) => return,
    };

    let Some(command) = hook::extract_command(&hook_input) else {
        return;
    };

    // Oversized commands are allowed with a warning (fail-open); truncated
    // analysis would be worse than none.
    let max_command_bytes = config.max_command_bytes();
    if command.len() > max_command_bytes {
        eprintln!(
            "[gsg] Warning: command ({} bytes) exceeds limit ({} bytes); allowing command (fail-open)",
            command.len(),
            max_command_bytes
        );
        return;
    }

    let (verdict, rule_name) = decide_with_rule(&command);
    let Verdict::Deny { reason } = verdict else {
        // Allow is silent by design.
        return;
    };

    hook::output_denial(&command, &reason, rule_name);

    if let Some(log_file) = config.general.log_file.as_deref() {
        let _ = hook::log_blocked_command(log_file, &command, &reason);
    }
}

/// Print version information.
fn print_version() {
    eprintln!();
    eprintln!(
        "  🛡  {} {}",
        "git_safety_guard".white().bold(),
        format!("v{PKG_VERSION}").cyan().bold()
    );
    if let Some(ts) = BUILD_TIMESTAMP {
        let date = ts.split('T').next().unwrap_or(ts);
        eprintln!("     {} {}", "Built:".bright_black(), date);
    }
    if let Some(rustc) = RUSTC_SEMVER {
        eprintln!("     {} {}", "Rustc:".bright_black(), rustc);
    }
    if let Some(target) = CARGO_TARGET {
        eprintln!("     {} {}", "Target:".bright_black(), target);
    }
    eprintln!();
}
