//! Claude Code hook protocol handling.
//!
//! This module handles the JSON input/output for the Claude Code `PreToolUse`
//! hook: parsing incoming requests and formatting denial responses. Allowed
//! commands produce no output at all; the exit code is always 0 in hook mode.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{self, IsTerminal, Read, Write};

/// Input structure from Claude Code's `PreToolUse` hook.
#[derive(Debug, Deserialize)]
pub struct HookInput {
    /// The name of the tool being invoked (e.g., "Bash", "Read", "Write").
    pub tool_name: Option<String>,

    /// Tool-specific input parameters.
    pub tool_input: Option<ToolInput>,
}

/// Tool-specific input containing the command to execute.
#[derive(Debug, Deserialize)]
pub struct ToolInput {
    /// The command string (for Bash tools).
    pub command: Option<serde_json::Value>,
}

/// Output structure for denying a command.
#[derive(Debug, Serialize)]
pub struct HookOutput<'a> {
    /// Hook-specific output with the decision.
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput<'a>,
}

/// Hook-specific output with decision and reason.
#[derive(Debug, Serialize)]
pub struct HookSpecificOutput<'a> {
    /// Always "`PreToolUse`" for this hook.
    #[serde(rename = "hookEventName")]
    pub hook_event_name: &'static str,

    /// The permission decision: "allow" or "deny".
    #[serde(rename = "permissionDecision")]
    pub permission_decision: &'static str,

    /// Human-readable explanation of the decision.
    #[serde(rename = "permissionDecisionReason")]
    pub permission_decision_reason: Cow<'a, str>,
}

/// Error type for reading and parsing hook input.
#[derive(Debug)]
pub enum HookReadError {
    /// Failed to read from stdin.
    Io(io::Error),
    /// Input exceeded the configured size limit.
    InputTooLarge(usize),
    /// Failed to parse JSON input.
    Json(serde_json::Error),
}

impl std::fmt::Display for HookReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read hook input: {e}"),
            Self::InputTooLarge(len) => write!(f, "hook input too large ({len} bytes)"),
            Self::Json(e) => write!(f, "invalid hook input JSON: {e}"),
        }
    }
}

impl std::error::Error for HookReadError {}

/// Read and parse hook input from stdin.
///
/// # Errors
///
/// Returns [`HookReadError::Io`] if stdin cannot be read, [`HookReadError::Json`]
/// if the input is not valid hook JSON, or [`HookReadError::InputTooLarge`] if
/// the input exceeds `max_bytes`.
pub fn read_hook_input(max_bytes: usize) -> Result<HookInput, HookReadError> {
    let mut input = String::with_capacity(256);
    {
        let stdin = io::stdin();
        // Read up to limit + 1 to detect overflow
        let mut handle = stdin.lock().take(max_bytes as u64 + 1);
        handle
            .read_to_string(&mut input)
            .map_err(HookReadError::Io)?;
    }

    if input.len() > max_bytes {
        return Err(HookReadError::InputTooLarge(input.len()));
    }

    serde_json::from_str(&input).map_err(HookReadError::Json)
}

/// Extract the command string from hook input.
///
/// Returns `None` for non-Bash tools and missing, empty, or non-string
/// commands; all of those are allowed without evaluation.
#[must_use]
pub fn extract_command(input: &HookInput) -> Option<String> {
    if input.tool_name.as_deref() != Some("Bash") {
        return None;
    }

    let tool_input = input.tool_input.as_ref()?;
    let command_value = tool_input.command.as_ref()?;

    match command_value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Configure colored output based on TTY detection.
pub fn configure_colors() {
    if !io::stderr().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Format the denial message for the JSON output (plain text).
#[must_use]
pub fn format_denial_message(command: &str, reason: &str) -> String {
    format!(
        "BLOCKED by gsg\n\n\
         Reason: {reason}\n\n\
         Command: {command}\n\n\
         If this operation is truly needed, ask the user for explicit \
         permission and have them run the command manually."
    )
}

/// Print a boxed warning to stderr for human visibility.
pub fn print_warning_banner(command: &str, reason: &str, rule: Option<&str>) {
    const WIDTH: usize = 70;

    let stderr = io::stderr();
    let mut handle = stderr.lock();

    let border = |left: &str, right: &str| format!("{left}{}{right}", "─".repeat(WIDTH));

    let _ = writeln!(handle);
    let _ = writeln!(handle, "{}", border("╭", "╮").red());

    let header = "  🛡  BLOCKED by gsg";
    let _ = writeln!(
        handle,
        "{}{}{}{}",
        "│".red(),
        header.white().bold(),
        " ".repeat(WIDTH.saturating_sub(header.chars().count() + 1)),
        "│".red()
    );

    if let Some(rule_name) = rule {
        let line = format!("  Rule: {rule_name}");
        let _ = writeln!(
            handle,
            "{}{}{}{}",
            "│".red(),
            line.yellow(),
            " ".repeat(WIDTH.saturating_sub(line.len())),
            "│".red()
        );
    }

    let _ = writeln!(handle, "{}", border("├", "┤").red());

    let reason_indent = "  Reason: ";
    for (i, line) in wrap_text(reason, WIDTH - reason_indent.len() - 1)
        .iter()
        .enumerate()
    {
        let prefix = if i == 0 {
            reason_indent.to_string()
        } else {
            " ".repeat(reason_indent.len())
        };
        let _ = writeln!(
            handle,
            "{}{}{}{}{}",
            "│".red(),
            prefix,
            line.white(),
            " ".repeat(WIDTH.saturating_sub(reason_indent.len() + line.len())),
            "│".red()
        );
    }

    // Truncate very long commands for display (char-safe for UTF-8)
    let display_cmd = if command.chars().count() > 50 {
        let truncated: String = command.chars().take(47).collect();
        format!("{truncated}...")
    } else {
        command.to_string()
    };
    let cmd_line_len = "  Command: ".len() + display_cmd.chars().count();
    let _ = write!(handle, "{}", "│".red());
    let _ = write!(handle, "  {} ", "Command:".cyan().bold());
    let _ = write!(handle, "{}", display_cmd.bright_white().bold());
    let _ = writeln!(
        handle,
        "{}{}",
        " ".repeat(WIDTH.saturating_sub(cmd_line_len)),
        "│".red()
    );

    if let Some(msg) = contextual_suggestion(command) {
        let _ = writeln!(handle, "{}", border("├", "┤").red());
        let line = format!("  💡 {msg}");
        let _ = writeln!(
            handle,
            "{}{}{}{}",
            "│".red(),
            line.green(),
            " ".repeat(WIDTH.saturating_sub(line.chars().count() + 1)),
            "│".red()
        );
    }

    let _ = writeln!(handle, "{}", border("╰", "╯").red());
    let _ = writeln!(handle);
}

/// Wrap text to fit within a given width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Get a context-specific suggestion based on the blocked command.
fn contextual_suggestion(command: &str) -> Option<&'static str> {
    if command.contains("reset") || command.contains("checkout") || command.contains("restore") {
        Some("Consider using 'git stash' first to save your changes.")
    } else if command.contains("clean") {
        Some("Use 'git clean -n' first to preview what would be deleted.")
    } else if command.contains("push") && command.contains("force") {
        Some("Consider using '--force-with-lease' for safer force pushing.")
    } else if command.contains("rm ") {
        Some("Verify the path carefully before running rm -rf manually.")
    } else if command.contains("stash") {
        Some("Use 'git stash list' to review stashes before deleting.")
    } else {
        None
    }
}

/// Output a denial response to stdout (JSON for hook protocol).
#[cold]
#[inline(never)]
pub fn output_denial(command: &str, reason: &str, rule: Option<&str>) {
    // Human-visible warning goes to stderr
    print_warning_banner(command, reason, rule);

    // JSON response for the hook protocol goes to stdout
    let message = format_denial_message(command, reason);

    let output = HookOutput {
        hook_specific_output: HookSpecificOutput {
            hook_event_name: "PreToolUse",
            permission_decision: "deny",
            permission_decision_reason: Cow::Owned(message),
        },
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = serde_json::to_writer(&mut handle, &output);
    let _ = writeln!(handle);
}

/// Log a blocked command to a file (if logging is enabled).
///
/// # Errors
///
/// Returns any I/O errors encountered while creating directories or appending
/// to the log file.
pub fn log_blocked_command(log_file: &str, command: &str, reason: &str) -> io::Result<()> {
    use std::fs::OpenOptions;

    // Expand ~ in path
    let path = if log_file.starts_with("~/") {
        dirs::home_dir().map_or_else(
            || std::path::PathBuf::from(log_file),
            |h| h.join(&log_file[2..]),
        )
    } else {
        std::path::PathBuf::from(log_file)
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    writeln!(file, "[{}] {reason}", epoch_timestamp())?;
    writeln!(file, "  Command: {command}")?;
    writeln!(file)?;

    Ok(())
}

/// Unix epoch seconds as a string (e.g., "1704672000"); avoids pulling in a
/// date-time dependency for an append-only log.
fn epoch_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}
