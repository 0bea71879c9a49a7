//! Stop command implementation

use anyhow::{Context, Result};
use dockman_registry::{ContainerRegistry, ProcessRunner};

pub fn execute<R: ProcessRunner>(
    registry: &mut ContainerRegistry<R>,
    ids: &[String],
) -> Result<()> {
    tracing::info!(count = ids.len(), "Stopping containers");

    let stopped = registry
        .stop_containers(ids)
        .context("Failed to stop containers")?;

    if stopped.is_empty() {
        println!("No running containers");
        return Ok(());
    }

    for id in &stopped {
        println!("✅ Stop requested for '{id}'");
    }

    Ok(())
}
