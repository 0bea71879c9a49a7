//! Scripted runner for tests (never spawns a process)

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dockman_core::{Error, Result};

use crate::runner::{ProcessOutput, ProcessRunner};

/// Mock runner for testing
///
/// Responses are scripted per argument vector. Several responses for the
/// same command are returned in order and the last one repeats. Commands
/// without a script return an empty successful output. Every call is
/// recorded.
///
/// # Example
/// ```
/// use dockman_runner::{MockRunner, ProcessRunner};
///
/// let runner = MockRunner::new().with_stdout(&["docker", "rm", "web"], "web\n");
///
/// let command = vec!["docker".to_string(), "rm".to_string(), "web".to_string()];
/// let output = runner.run(&command).unwrap();
/// assert_eq!(output.stdout, "web\n");
/// assert_eq!(runner.call_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    scripts: HashMap<Vec<String>, VecDeque<Scripted>>,
    calls: Vec<Vec<String>>,
}

#[derive(Clone)]
enum Scripted {
    Output(ProcessOutput),
    SpawnError(String),
}

fn owned(command: &[&str]) -> Vec<String> {
    command.iter().map(ToString::to_string).collect()
}

impl MockRunner {
    /// Create a new mock runner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn script(&self, command: &[&str], response: Scripted) {
        self.state()
            .scripts
            .entry(owned(command))
            .or_default()
            .push_back(response);
    }

    /// Queue a full output for `command`
    pub fn push_output(&self, command: &[&str], output: ProcessOutput) {
        self.script(command, Scripted::Output(output));
    }

    /// Queue a successful output with the given stdout for `command`
    pub fn push_stdout(&self, command: &[&str], stdout: &str) {
        self.push_output(command, ProcessOutput::ok(stdout));
    }

    /// Queue a spawn failure for `command`
    pub fn push_spawn_error(&self, command: &[&str], message: &str) {
        self.script(command, Scripted::SpawnError(message.to_string()));
    }

    /// Builder form of [`push_output`](Self::push_output)
    #[must_use]
    pub fn with_output(self, command: &[&str], output: ProcessOutput) -> Self {
        self.push_output(command, output);
        self
    }

    /// Builder form of [`push_stdout`](Self::push_stdout)
    #[must_use]
    pub fn with_stdout(self, command: &[&str], stdout: &str) -> Self {
        self.push_stdout(command, stdout);
        self
    }

    /// All recorded invocations, in order
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state().calls.clone()
    }

    /// Number of invocations made
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Number of invocations of exactly `command`
    #[must_use]
    pub fn calls_to(&self, command: &[&str]) -> usize {
        let command = owned(command);
        self.state().calls.iter().filter(|c| **c == command).count()
    }
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner").finish_non_exhaustive()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, command: &[String]) -> Result<ProcessOutput> {
        if command.is_empty() {
            return Err(Error::InvalidConfig {
                message: "Command cannot be empty".to_string(),
            });
        }

        let mut state = self.state();
        state.calls.push(command.to_vec());

        let response = match state.scripts.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        tracing::debug!(
            command = %command.join(" "),
            scripted = response.is_some(),
            "Mock: Ran tool"
        );

        match response {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError(message)) => Err(Error::ToolInvocation {
                command: command.join(" "),
                message,
            }),
            None => Ok(ProcessOutput::ok("")),
        }
    }
}
