//! Blocking subprocess helpers shared by the git and dbt adapters.
//!
//! `capture*` collects stdout and keeps stderr for the error message.
//! `stream` inherits both streams so the operator sees the tool's native
//! progress output.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::SyncError;

/// Run `program args…` in `dir` and return its raw stdout.
pub(crate) fn capture_raw<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<Vec<u8>, SyncError> {
    let line = command_line(program, args);
    tracing::debug!("running {line}");

    let output = Command::new(program)
        .args(args.iter().map(|a| a.as_ref()))
        .current_dir(dir)
        .output()
        .map_err(|e| spawn_err(program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(failed(program, line, output.status, stderr));
    }
    Ok(output.stdout)
}

/// [`capture_raw`] decoded lossily as UTF-8.
pub(crate) fn capture<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<String, SyncError> {
    let stdout = capture_raw(program, args, dir)?;
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

/// [`capture`] with surrounding whitespace removed.
pub(crate) fn capture_trimmed<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<String, SyncError> {
    Ok(capture(program, args, dir)?.trim().to_string())
}

/// Run with inherited stdout/stderr, failing on a non-zero exit.
pub(crate) fn stream<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<(), SyncError> {
    let line = command_line(program, args);
    tracing::debug!("running {line}");

    let status = Command::new(program)
        .args(args.iter().map(|a| a.as_ref()))
        .current_dir(dir)
        .status()
        .map_err(|e| spawn_err(program, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(failed(program, line, status, String::new()))
    }
}

pub(crate) fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line
}

fn failed(program: &str, command: String, status: ExitStatus, stderr: String) -> SyncError {
    SyncError::ExternalTool {
        tool: program.to_string(),
        command,
        status: status.to_string(),
        stderr,
    }
}

fn spawn_err(program: &str, source: std::io::Error) -> SyncError {
    if source.kind() == ErrorKind::NotFound {
        SyncError::ToolMissing {
            tool: program.to_string(),
        }
    } else {
        SyncError::Io {
            tool: program.to_string(),
            source,
        }
    }
}
