//! Container registry over a container tool's command line
//!
//! This crate builds the container collection from the tool's two `ps`
//! listings and implements stop and safe removal:
//! - "all" listing - every container, parsed into records
//! - "running" listing - flags the matching records as running
//! - remove - refuses running containers unless forced

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod registry;

pub use config::RegistryConfig;
pub use registry::ContainerRegistry;

// Re-export commonly used types
pub use dockman_core::{ContainerCollection, ContainerRecord, Error, RegistryEvent, Result};
pub use dockman_runner::{CommandRunner, MockRunner, ProcessOutput, ProcessRunner};
