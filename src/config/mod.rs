//! Configuration constants
//!
//! - [`defaults`] - Default values and environment variable names

pub mod defaults;
