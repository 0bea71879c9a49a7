//! External tool execution with pluggable runners
//!
//! This crate provides a trait-based seam over subprocess execution so the
//! container registry can be driven by the real tool or by a scripted fake.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod mock;
pub mod runner;

pub use mock::MockRunner;
pub use runner::{CommandRunner, ProcessOutput, ProcessRunner};

// Re-export commonly used types
pub use dockman_core::{Error, Result};
