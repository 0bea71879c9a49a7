use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use dockman_registry::{CommandRunner, ContainerRegistry, RegistryConfig};

pub mod list;
pub mod remove;
pub mod stop;

/// Build the registry and dispatch command to appropriate handler
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = RegistryConfig::new().with_tool(cli.tool);
    let mut registry =
        ContainerRegistry::new(CommandRunner::new(), config).context("Invalid configuration")?;

    match cli.command {
        Commands::Ps { running, json } => list::execute(&mut registry, running, json),
        Commands::Stop { ids } => stop::execute(&mut registry, &ids),
        Commands::Rm { id, force } => remove::execute(&mut registry, &id, force),
    }
}
