//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result};

/// Captured result of one external command.
///
/// Unlike [`run_in`], a non-zero exit is not an error here: callers decide
/// what a failed command means for them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub command: String,
    pub success: bool,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CommandOutcome {
    pub fn from_output(command: impl Into<String>, output: &Output) -> Self {
        Self {
            command: command.into(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Outcome for a command that never produced an exit status.
    pub fn failed(command: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: false,
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stderr if present, stdout otherwise, trimmed.
    pub fn error_text(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim().to_string()
        } else {
            self.stdout.trim().to_string()
        }
    }
}

/// Render a program and its arguments for display.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command in a directory and capture everything it produced.
///
/// Returns an error only when the program could not be started.
pub fn capture_in(dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutcome> {
    let command = display_command(program, args);
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", command, e),
                Some(command.clone()),
            )
        })?;

    Ok(CommandOutcome::from_output(command, &output))
}

/// Run a command in a specific directory.
///
/// Returns trimmed stdout if the command succeeds.
/// Returns an error with stderr (or stdout fallback) if it fails.
pub fn run_in(dir: &Path, program: &str, args: &[&str], context: &str) -> Result<String> {
    let outcome = capture_in(dir, program, args)?;

    if !outcome.success {
        return Err(Error::internal_io(
            format!("{} failed: {}", context, outcome.error_text()),
            Some(context.to_string()),
        ));
    }

    Ok(outcome.stdout.trim().to_string())
}

/// Check if a command succeeds in a directory without capturing output.
pub fn succeeded_in(dir: &Path, program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
