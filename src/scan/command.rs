//! External command execution.
//!
//! Runs a command line as a child process with a timeout and returns its stdout.

use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;

/// Largest stdout accepted from a single command.
const MAX_OUTPUT_LEN: usize = 500_000;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
/// The child is killed when `timeout` passes first.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command can't start, fails, times out or produces too much output
pub async fn run(cmd: &str, timeout: Duration) -> Result<String, Box<dyn Error + Send + Sync>> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);
    let program = cmds.first().filter(|p| !p.is_empty()).ok_or("Empty command")?;

    let mut command = Command::new(program);
    command
        .args(cmds.iter().skip(1))
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result.map_err(|e| {
            log::error!("Command execution failed: {}", e);
            format!("Failed to execute command: {}", e)
        })?,
        Err(_) => {
            log::warn!("{} after {:?}: {cmd}", "timeout".on_red(), timeout);
            return Err(format!("Timed out after {timeout:?}: {cmd}").into());
        }
    };

    if output.status.success() {
        log::debug!("Success cmd: {cmd}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_OUTPUT_LEN {
            return Err(format!(
                "Response too large: {} bytes for command: {:?}",
                output.stdout.len(),
                cmds
            )
            .into());
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running: {stderr}").into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
pub(crate) fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}
