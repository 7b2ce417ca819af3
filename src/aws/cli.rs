//! AWS CLI command execution.
//!
//! Runs `aws` commands and returns their stdout. The command string is
//! split on spaces with quoted substrings preserved.

use crate::config;
use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails, emits invalid UTF-8, or produces more
///   than [`config::MAX_CMD_OUTPUT`] bytes
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);

    let mut command = Command::new(cmds[0]);
    for arg in cmds.iter().skip(1) {
        command.arg(arg);
    }

    let output = command.output().map_err(|e| {
        log::error!("Could not spawn {bin}: {e}", bin = cmds[0]);
        format!("Failed to execute command: {}", e)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!(
            "{failed}: aws CLI exit code {code:?} for {cmd}",
            failed = "failed".on_red(),
            code = output.status.code(),
            cmd = cmd.on_blue()
        );
        log::debug!("aws CLI stderr:\n{}", stderr.red());
        return Err(format!("ERROR running: {stderr}").into());
    }

    log::debug!("Success cmd: {cmd}, stdout {} bytes", output.stdout.len());
    if output.stdout.len() > config::MAX_CMD_OUTPUT {
        return Err(format!(
            "Response too large: {} bytes for command: {:?}",
            output.stdout.len(),
            cmds
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}
