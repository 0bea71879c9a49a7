//! CLI argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dockman")]
#[command(about = "Inspect, stop and remove containers through the container CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Container tool to invoke (docker, podman, or a path)
    #[arg(long, global = true, default_value = "docker")]
    pub tool: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List containers with their running status
    Ps {
        /// Only show running containers
        #[arg(long)]
        running: bool,

        /// Print the containers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop containers (every running container when no ID is given)
    Stop {
        /// Container IDs or names
        ids: Vec<String>,
    },

    /// Remove a container
    Rm {
        /// Container ID or name
        id: String,

        /// Stop the container first if it is running
        #[arg(short, long)]
        force: bool,
    },
}
