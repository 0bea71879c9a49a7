//! Dockman Core - Listing parser, container data model and errors
//!
//! This crate turns the column-aligned tables printed by a container tool's
//! `ps` subcommand into structured records.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod events;
pub mod listing;
pub mod record;
pub mod types;

pub use error::{Error, Result};
pub use events::RegistryEvent;
pub use listing::{Column, ColumnSpec, Listing};
pub use record::{ContainerCollection, ContainerRecord, RUNNING_FIELD};
pub use types::ContainerId;
