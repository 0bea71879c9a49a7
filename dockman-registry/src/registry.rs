//! Container registry: listing reconciliation, stop and safe removal

use std::sync::mpsc::Sender;
use std::time::SystemTime;

use dockman_core::{ContainerCollection, ContainerId, Error, Listing, RegistryEvent, Result};
use dockman_runner::{CommandRunner, ProcessOutput, ProcessRunner};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;

/// Registry of the containers known to the container tool
///
/// Every operation is a blocking sequence of tool invocations. The registry
/// keeps the most recently built collection; state-changing operations take
/// `&mut self` and drop it.
#[derive(Debug)]
pub struct ContainerRegistry<R = CommandRunner> {
    runner: R,
    config: RegistryConfig,
    containers: Option<ContainerCollection>,
    events: Option<Sender<RegistryEvent>>,
}

impl ContainerRegistry<CommandRunner> {
    /// Registry driving the real tool with the default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            runner: CommandRunner::new(),
            config: RegistryConfig::default(),
            containers: None,
            events: None,
        }
    }
}

impl<R: ProcessRunner> ContainerRegistry<R> {
    /// Create a registry over `runner`
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn new(runner: R, config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            runner,
            config,
            containers: None,
            events: None,
        })
    }

    /// Forward every registry event to `tx`
    #[must_use]
    pub fn with_events(mut self, tx: Sender<RegistryEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the runner
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// List every container with its running flag
    ///
    /// Runs the "all" listing, slices each row by the header offsets, then
    /// runs the "running" listing and flags matching records. With caching
    /// enabled a previously built collection is returned without running the
    /// tool.
    ///
    /// # Errors
    /// Returns [`Error::ToolInvocation`] if a listing cannot be run or exits
    /// non-zero, and [`Error::Parse`] if a header is malformed.
    pub fn containers(&mut self) -> Result<ContainerCollection> {
        if self.config.cache {
            if let Some(containers) = &self.containers {
                debug!(total = containers.len(), "Using cached containers");
                return Ok(containers.clone());
            }
        }

        let containers = self.fetch()?;
        self.containers = Some(containers.clone());
        Ok(containers)
    }

    /// Drop the retained collection so the next listing re-runs the tool
    pub fn refresh(&mut self) {
        self.containers = None;
    }

    /// Stop a container and return what the tool printed
    ///
    /// The tool echoes the identifier on success. A failed stop is logged,
    /// not raised; no check is made that the container exists.
    ///
    /// # Errors
    /// Returns error if `id` is not a valid identifier or the tool cannot be
    /// started
    pub fn stop_container(&mut self, id: &str) -> Result<String> {
        let id = ContainerId::new(id)?;
        let output = self.runner.run(&self.config.stop_command(&id))?;
        self.containers = None;

        if output.success() {
            self.emit(RegistryEvent::Stopped {
                id,
                timestamp: SystemTime::now(),
            });
        } else {
            warn!(
                container_id = %id,
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "Stop command failed"
            );
        }

        Ok(output.stdout.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Stop every container currently flagged as running
    ///
    /// Uses the retained collection, building one first if there is none or
    /// it holds no containers.
    /// Returns the identifiers a stop was issued for.
    ///
    /// # Errors
    /// See [`containers`](Self::containers) and
    /// [`stop_container`](Self::stop_container)
    pub fn stop_running(&mut self) -> Result<Vec<String>> {
        let retained = self
            .containers
            .as_ref()
            .filter(|containers| !containers.is_empty())
            .map(ContainerCollection::running_ids);
        let running = match retained {
            Some(ids) => ids,
            None => self.containers()?.running_ids(),
        };

        if running.is_empty() {
            debug!("No running containers to stop");
        }

        for id in &running {
            self.stop_container(id)?;
        }

        Ok(running)
    }

    /// Stop the given containers, or every running one if `ids` is empty
    ///
    /// Explicit identifiers are stopped without checking whether they are
    /// running; stopping a stopped container is harmless for the tool.
    ///
    /// # Errors
    /// See [`stop_running`](Self::stop_running) and
    /// [`stop_container`](Self::stop_container)
    pub fn stop_containers<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return self.stop_running();
        }

        ids.iter()
            .map(|id| {
                self.stop_container(id.as_ref())?;
                Ok(id.as_ref().to_string())
            })
            .collect()
    }

    /// Remove a container, refusing running ones unless `force` is set
    ///
    /// The tool prints nothing on stdout when removal is blocked by a running
    /// container. Without `force` that yields [`Error::RunningConflict`] and
    /// nothing else is run. With `force` the container is stopped and the
    /// remove is retried once. Returns `id` on success.
    ///
    /// # Errors
    /// Returns [`Error::RunningConflict`] as described above,
    /// [`Error::ToolInvocation`] if a step cannot be run or the tool reports
    /// an unrelated failure, and [`Error::InvalidIdentifier`] for a bad `id`.
    pub fn remove_container(&mut self, id: &str, force: bool) -> Result<String> {
        let container_id = ContainerId::new(id)?;
        let command = self.config.remove_command(&container_id);

        let output = self.runner.run(&command)?;
        let mut forced = false;

        if output.stdout.trim().is_empty() {
            if !blocked_by_running(&output) {
                return Err(Error::ToolInvocation {
                    command: command.join(" "),
                    message: output.stderr.trim().to_string(),
                });
            }

            if !force {
                self.emit(RegistryEvent::RemovalBlocked {
                    id: container_id,
                    timestamp: SystemTime::now(),
                });
                return Err(Error::RunningConflict { id: id.to_string() });
            }

            info!(container_id = %container_id, "Container is running, stopping before removal");
            self.stop_container(id)?;

            let retry = self.runner.run(&command)?;
            if retry.stdout.trim().is_empty() {
                warn!(
                    container_id = %container_id,
                    stderr = %retry.stderr.trim(),
                    "Remove retry printed nothing"
                );
            }
            forced = true;
        }

        self.containers = None;
        self.emit(RegistryEvent::Removed {
            id: container_id,
            forced,
            timestamp: SystemTime::now(),
        });

        Ok(id.to_string())
    }

    fn fetch(&self) -> Result<ContainerCollection> {
        let all = self.list(&self.config.list_all_command())?;

        let Some(listing) = Listing::split(&all) else {
            debug!("Container listing is empty");
            return Ok(ContainerCollection::new());
        };

        let mut containers = ContainerCollection::from_listing(&listing)?;
        debug!(rows = containers.len(), "Parsed container listing");

        let running = self.list(&self.config.list_running_command())?;
        if let Some(running) = Listing::split(&running) {
            let matched = containers.apply_running(&running)?;
            debug!(
                running_rows = running.rows.len(),
                matched, "Applied running listing"
            );
        }

        self.emit(RegistryEvent::Listed {
            total: containers.len(),
            running: containers.running().count(),
            timestamp: SystemTime::now(),
        });

        Ok(containers)
    }

    fn list(&self, command: &[String]) -> Result<String> {
        let output = self.runner.run(command)?;

        if !output.success() {
            let message = match output.stderr.trim() {
                "" => format!("exited with status {:?}", output.exit_code),
                stderr => stderr.to_string(),
            };
            return Err(Error::ToolInvocation {
                command: command.join(" "),
                message,
            });
        }

        Ok(output.stdout)
    }

    fn emit(&self, event: RegistryEvent) {
        event.emit_trace();
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            let _ = tx.send(event);
        }
    }
}

/// Whether an empty-stdout remove means "container is running"
///
/// Empty stdout is the tool's running signal. When the tool also exited
/// non-zero with an explanation on stderr, that explanation must mention the
/// running state; anything else (e.g. "No such container") is a different
/// failure.
fn blocked_by_running(output: &ProcessOutput) -> bool {
    let stderr = output.stderr.trim();
    output.success() || stderr.is_empty() || stderr.to_lowercase().contains("running")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_by_running() {
        assert!(blocked_by_running(&ProcessOutput::ok("")));
        assert!(blocked_by_running(&ProcessOutput::failed(1, "")));
        assert!(blocked_by_running(&ProcessOutput::failed(
            1,
            "Error response from daemon: cannot remove container \"/web\": container is running"
        )));
        assert!(!blocked_by_running(&ProcessOutput::failed(
            1,
            "Error response from daemon: No such container: web"
        )));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RegistryConfig::new().with_tool("");
        assert!(ContainerRegistry::new(dockman_runner::MockRunner::new(), config).is_err());
    }

    #[test]
    fn test_with_defaults() {
        let registry = ContainerRegistry::with_defaults();
        assert_eq!(registry.config().tool, "docker");
        assert!(!registry.config().cache);
    }
}
