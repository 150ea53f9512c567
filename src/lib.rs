//! Wheelwright - native extension build orchestrator
//!
//! Drives an external Meson build of a compiled Python extension, finds the
//! shared libraries it produced, and copies them into every directory a
//! package build expects them in.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Orchestration, discovery, and placement logic
//! - [`infra`] - Infrastructure layer (filesystem, external processes)
//! - [`config`] - Constants and defaults
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
