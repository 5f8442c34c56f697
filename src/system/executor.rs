// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Executes a command and fails on a non-zero exit status.
///
/// The child's stdio is inherited and the call blocks until it exits; there
/// is no timeout or cancellation. The working directory is always passed
/// explicitly, never set process-wide.
pub fn execute_command(command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
    let status = execute_for_status(command_line, cwd, false)?;
    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(command_line.to_string()));
    }
    Ok(())
}

/// Executes a command and hands the exit status back to the caller.
///
/// Used where a non-zero exit is meaningful rather than fatal (`diff` exits
/// non-zero when files differ). With `quiet` the child's output is discarded.
pub fn execute_for_status(
    command_line: &str,
    cwd: &Path,
    quiet: bool,
) -> Result<ExitStatus, ExecutionError> {
    let trimmed_command = command_line.trim();
    let parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let clean_cwd = dunce::simplified(cwd);

    let stdio = || {
        if quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        }
    };

    let mut command = StdCommand::new(program);
    command
        .args(args)
        .current_dir(clean_cwd)
        .stdout(stdio())
        .stderr(stdio());

    // Fallback for Windows built-in commands. Try to spawn directly first;
    // on `NotFound`, retry through `cmd /C`.
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(trimmed_command) // Pass the full, unparsed line to cmd
                .current_dir(clean_cwd)
                .stdout(stdio())
                .stderr(stdio())
                .spawn()
                .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?
        }
        Err(e) => {
            return Err(ExecutionError::CommandFailed(trimmed_command.to_string(), e));
        }
    };

    child
        .wait()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))
}

/// Executes a command and captures its standard output.
/// Stderr is passed through to the user's terminal.
pub fn execute_and_capture_output(
    command_line: &str,
    cwd: &Path,
) -> Result<String, ExecutionError> {
    let trimmed_command = command_line.trim();
    let parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let clean_cwd = dunce::simplified(cwd);

    let command_output = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?;

    if !command_output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus(
            trimmed_command.to_string(),
        ));
    }

    String::from_utf8(command_output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed_command.to_string(),
        source: e,
    })
}
