//! Core logic module
//!
//! External processes are reached only through the [`builder::BuildTool`]
//! trait; the concrete tool lives in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`artifact`] - Artifact matching rules
//! - [`build_env`] - Toolchain environment for the build tool
//! - [`builder`] - Build orchestration state machine
//! - [`clean`] - Removing staging and build directories
//! - [`config`] - Project configuration (wheelwright.toml)
//! - [`discover`] - Walking the staging tree for artifacts
//! - [`doctor`] - System dependency checks
//! - [`extra_args`] - Pass-through argument parsing
//! - [`lock`] - Staging directory lock
//! - [`placement`] - Copying artifacts into destinations
//! - [`platform`] - Host platform and build directory naming
//! - [`targets`] - Destination directory sets

pub mod artifact;
pub mod build_env;
pub mod builder;
pub mod clean;
pub mod config;
pub mod discover;
pub mod doctor;
pub mod extra_args;
pub mod lock;
pub mod placement;
pub mod platform;
pub mod targets;
