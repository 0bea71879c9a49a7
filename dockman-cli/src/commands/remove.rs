//! Rm command implementation

use anyhow::Result;
use dockman_registry::{ContainerRegistry, ProcessRunner};

pub fn execute<R: ProcessRunner>(
    registry: &mut ContainerRegistry<R>,
    id: &str,
    force: bool,
) -> Result<()> {
    tracing::info!(container_id = id, force, "Removing container");

    match registry.remove_container(id, force) {
        Ok(removed) => {
            println!("✅ Container '{removed}' removed");
            Ok(())
        }
        Err(e) if e.is_running_conflict() => {
            anyhow::bail!("{e}\n\n  Stop it first, or retry with --force")
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to remove '{id}'"))),
    }
}
