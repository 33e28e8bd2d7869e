//! CLI subcommands for interactive use.
//!
//! Hook mode (no subcommand) is the primary interface; these subcommands
//! exist so a human can test a command or inspect the rule table without
//! hand-writing hook JSON.

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::engine::{decide, Verdict};
use crate::rules::{RuleKind, RULES};

/// Git/filesystem safety guard for AI coding agents.
#[derive(Debug, Parser)]
#[command(name = "gsg", version, about, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate a command string and print the verdict.
    ///
    /// Exits 0 when the command would be allowed, 1 when it would be
    /// blocked. The exit code is meaningful only here; hook mode always
    /// exits 0.
    Check {
        /// The shell command to evaluate (quoted or as trailing words).
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,

        /// Print only the verdict, no reason.
        #[arg(long)]
        quiet: bool,
    },

    /// List the destructive-pattern rule table in evaluation order.
    Patterns,
}

/// Run a parsed subcommand. Returns the process exit code.
///
/// # Errors
///
/// Returns an error message for failures unrelated to the verdict (currently
/// none; the signature leaves room for subcommands that do I/O).
pub fn run_command(cli: Cli) -> Result<i32, String> {
    match cli.command {
        Some(Commands::Check { command, quiet }) => Ok(run_check(&command.join(" "), quiet)),
        Some(Commands::Patterns) => {
            run_patterns();
            Ok(0)
        }
        None => Ok(0),
    }
}

fn run_check(command: &str, quiet: bool) -> i32 {
    match decide(command) {
        Verdict::Allow => {
            println!("{}", "ALLOW".green().bold());
            0
        }
        Verdict::Deny { reason } => {
            println!("{}", "DENY".red().bold());
            if !quiet {
                println!("  {} {reason}", "Reason:".yellow());
                println!("  {} {command}", "Command:".cyan());
            }
            1
        }
    }
}

fn run_patterns() {
    println!(
        "{} ({} rules, checked in order)",
        "Destructive command rules".bold(),
        RULES.len()
    );
    println!();
    for rule in &RULES {
        let kind = match rule.kind {
            RuleKind::Standard => "deny on match".red(),
            RuleKind::RmShaped => "rm target analysis".yellow(),
        };
        println!("  {} [{kind}]", rule.name.bold());
        println!("    pattern: {}", rule.regex.as_str().bright_black());
        println!("    reason:  {}", rule.reason);
        println!();
    }
}
