//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run the wheelwright binary in this project
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    /// Run the wheelwright binary with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_wheelwright"));
        cmd.current_dir(self.path());
        cmd.args(args);
        cmd.env_remove("MESON_ARGS")
            .env_remove("FC")
            .env_remove("CC")
            .env_remove("RUST_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute wheelwright")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension module name the fake build tool produces
pub const BUILT_MODULE: &str = "_bem.cpython-310-x86_64-linux-gnu.so";

/// Shell stand-in for Meson
///
/// `compile` writes a module and a `.so.p` object directory under
/// `<staging>/ccblade`. Every call is appended to `$FAKE_MESON_LOG` when set,
/// together with the `FC`/`CC` it saw. `FAKE_MESON_FAIL=<subcommand>` makes
/// that subcommand exit 1, and `FAKE_MESON_EMPTY=1` makes compile produce
/// nothing.
pub const FAKE_MESON: &str = r#"#!/bin/sh
if [ -n "$FAKE_MESON_LOG" ]; then
    echo "$* | FC=$FC CC=$CC" >> "$FAKE_MESON_LOG"
fi
if [ "$FAKE_MESON_FAIL" = "$1" ]; then
    echo "fake meson: $1 failed: undefined reference to bem_" >&2
    exit 1
fi
case "$1" in
    --version)
        echo "1.4.0"
        ;;
    setup)
        mkdir -p "$2/meson-private"
        echo "The Meson build system"
        ;;
    compile)
        if [ "$FAKE_MESON_EMPTY" = "1" ]; then
            exit 0
        fi
        mkdir -p "$3/ccblade/_bem.so.p"
        echo "object" > "$3/ccblade/_bem.so.p/bem.f90.o"
        echo "ELF extension" > "$3/ccblade/_bem.cpython-310-x86_64-linux-gnu.so"
        echo "[1/2] Compiling Fortran object"
        ;;
    install)
        echo "Installing"
        ;;
    *)
        echo "unknown command $1" >&2
        exit 2
        ;;
esac
"#;

/// Write the fake Meson script into `dir` and return its path
#[cfg(unix)]
pub fn install_fake_meson(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-meson");
    std::fs::write(&path, FAKE_MESON).expect("Failed to write fake meson");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake meson executable");
    path
}

/// Sample project configuration
pub const SAMPLE_CONFIG: &str = r#"
[package]
name = "ccblade"

[artifact]
base_name = "_bem"

[build]
staging_dir = "meson_build"
build_dir = "build"
extra_args = ["-Dbuildtype=release"]

[targets]
extra = ["dist/native"]
"#;
