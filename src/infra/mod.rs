//! Infrastructure layer
//!
//! Handles I/O with side effects: filesystem operations and external
//! processes.

pub mod filesystem;
pub mod meson;
pub mod toolchain;
