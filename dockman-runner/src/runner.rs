//! Process runner trait and the `std::process` implementation

use std::process::{Command, Stdio};

use dockman_core::{Error, Result};
use tracing::{debug, trace};

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Everything written to standard output
    pub stdout: String,
    /// Everything written to standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Successful output with the given stdout
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    #[must_use]
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Trait for running the external tool
///
/// This allows for different implementations:
/// - [`CommandRunner`] - Spawns real subprocesses
/// - [`MockRunner`](crate::MockRunner) - Scripted responses for tests
///
/// Implementations block until the process has exited. A process that ran
/// but exited non-zero is still `Ok`; callers inspect
/// [`ProcessOutput::exit_code`].
pub trait ProcessRunner {
    /// Run `command[0]` with `command[1..]` as its arguments
    ///
    /// # Errors
    /// Returns [`Error::ToolInvocation`] if the process cannot be started and
    /// [`Error::InvalidConfig`] if `command` is empty.
    fn run(&self, command: &[String]) -> Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command: &[String]) -> Result<ProcessOutput> {
        (**self).run(command)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    fn run(&self, command: &[String]) -> Result<ProcessOutput> {
        (**self).run(command)
    }
}

/// Runs commands as child processes without a shell
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a new runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for CommandRunner {
    fn run(&self, command: &[String]) -> Result<ProcessOutput> {
        let (program, args) = command.split_first().ok_or_else(|| Error::InvalidConfig {
            message: "Command cannot be empty".to_string(),
        })?;

        debug!(command = %command.join(" "), "Running tool");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::ToolInvocation {
                command: command.join(" "),
                message: e.to_string(),
            })?;

        let output = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        trace!(
            exit_code = ?output.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Tool finished"
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::ok("abc\n").success());
        assert!(!ProcessOutput::failed(1, "boom").success());
        assert!(!ProcessOutput::default().success());
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = CommandRunner::new().run(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_program_is_tool_invocation() {
        let command = vec!["dockman-no-such-tool-7f3a".to_string(), "ps".to_string()];
        let err = CommandRunner::new().run(&command).unwrap_err();
        match err {
            Error::ToolInvocation { command, .. } => {
                assert_eq!(command, "dockman-no-such-tool-7f3a ps");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
