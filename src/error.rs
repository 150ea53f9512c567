//! Error types for wheelwright
//!
//! Domain-specific error types using thiserror.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to copy file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to preserve file metadata
    #[error("Failed to preserve metadata on '{path}': {error}")]
    Metadata { path: PathBuf, error: String },

    /// Failed to lock a file
    #[error("Failed to lock '{path}': {error}")]
    Lock { path: PathBuf, error: String },
}

/// Errors raised by an external build tool invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Program not found on PATH
    #[error("'{program}' not found in PATH")]
    NotFound { program: String },

    /// Program could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Program exited unsuccessfully
    #[error("'{command}' exited with {status}")]
    Failed {
        command: String,
        status: ExitStatusText,
        output: String,
    },
}

impl ToolError {
    /// Captured stdout/stderr of the failed call, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Printable exit status (exit code or signal termination)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatusText(pub Option<i32>);

impl fmt::Display for ExitStatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "status {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

/// Errors while splitting the pass-through configure arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtraArgsError {
    /// Token overrides an option the orchestrator sets itself
    #[error("Argument '{token}' overrides '{option}', which is managed by wheelwright")]
    ManagedOption { token: String, option: String },

    /// Token contains a NUL byte
    #[error("Argument '{token}' contains a NUL byte")]
    NulByte { token: String },
}

/// Project configuration file errors
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Field has an unusable value
    #[error("Invalid value for '{field}' in '{path}': {reason}")]
    InvalidValue {
        path: PathBuf,
        field: String,
        reason: String,
    },
}

/// Stage at which an orchestration run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Build tool not reachable
    ToolMissing,
    /// Configure step
    Configure,
    /// Compile or install step
    Compile,
    /// Compile succeeded but produced nothing placeable
    NoArtifact,
    /// Copying into the target set
    Placement,
}

impl FailureStage {
    /// Stable tag reported to the invoking packaging layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolMissing => "tool-missing",
            Self::Configure => "configure",
            Self::Compile => "compile",
            Self::NoArtifact => "no-artifact",
            Self::Placement => "placement",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed copy into one destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementFailure {
    /// Artifact being placed
    pub artifact: PathBuf,
    /// Destination directory that did not receive it
    pub destination: PathBuf,
    /// What went wrong
    pub cause: String,
}

impl fmt::Display for PlacementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.artifact.display(),
            self.destination.display(),
            self.cause
        )
    }
}

/// Failure to place one artifact into a target set
///
/// Carries the destinations that did succeed so the caller can decide
/// whether the partial placement is acceptable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} of {} destinations failed for '{}'", failures.len(), failures.len() + placed.len(), artifact.display())]
pub struct PlacementError {
    /// Artifact being placed
    pub artifact: PathBuf,
    /// Destination files written successfully
    pub placed: Vec<PathBuf>,
    /// Every destination that failed
    pub failures: Vec<PlacementFailure>,
}

/// Fatal orchestration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// External build tool absent
    #[error("Build tool '{program}' not found. {hint}")]
    ToolMissing { program: String, hint: String },

    /// Bad arguments, unusable staging directory, or failed setup
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External compiler/linker failure, with the tool output verbatim
    #[error("{step} step failed:\n{output}")]
    Compile { step: String, output: String },

    /// Successful compile produced nothing matching the artifact spec
    #[error(
        "Build succeeded but produced no artifact named '{base_name}*' under '{}'. \
         Check the artifact base name and search root",
        search_root.display()
    )]
    NoArtifactProduced {
        base_name: String,
        search_root: PathBuf,
    },

    /// At least one artifact reached no destination at all
    #[error("Placement failed:\n{}", format_failures(failures))]
    Placement { failures: Vec<PlacementFailure> },
}

impl OrchestratorError {
    /// Stage tag for this error
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::ToolMissing { .. } => FailureStage::ToolMissing,
            Self::Config { .. } => FailureStage::Configure,
            Self::Compile { .. } => FailureStage::Compile,
            Self::NoArtifactProduced { .. } => FailureStage::NoArtifact,
            Self::Placement { .. } => FailureStage::Placement,
        }
    }

    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<ExtraArgsError> for OrchestratorError {
    fn from(e: ExtraArgsError) -> Self {
        Self::config(e.to_string())
    }
}

fn format_failures(failures: &[PlacementFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags() {
        assert_eq!(FailureStage::ToolMissing.as_str(), "tool-missing");
        assert_eq!(FailureStage::Configure.as_str(), "configure");
        assert_eq!(FailureStage::Compile.as_str(), "compile");
        assert_eq!(FailureStage::NoArtifact.as_str(), "no-artifact");
        assert_eq!(FailureStage::Placement.as_str(), "placement");
    }

    #[test]
    fn test_error_stage_mapping() {
        let err = OrchestratorError::Compile {
            step: "compile".to_string(),
            output: "ld: cannot find -lgfortran".to_string(),
        };
        assert_eq!(err.stage(), FailureStage::Compile);
        assert!(err.to_string().contains("ld: cannot find -lgfortran"));

        let err = OrchestratorError::config("bad");
        assert_eq!(err.stage(), FailureStage::Configure);
    }

    #[test]
    fn test_placement_error_lists_every_failure() {
        let err = OrchestratorError::Placement {
            failures: vec![
                PlacementFailure {
                    artifact: PathBuf::from("_bem.so"),
                    destination: PathBuf::from("/a"),
                    cause: "permission denied".to_string(),
                },
                PlacementFailure {
                    artifact: PathBuf::from("_bem.so"),
                    destination: PathBuf::from("/b"),
                    cause: "read-only filesystem".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("permission denied"));
        assert!(text.contains("read-only filesystem"));
    }

    #[test]
    fn test_exit_status_text() {
        assert_eq!(ExitStatusText(Some(2)).to_string(), "status 2");
        assert_eq!(ExitStatusText(None).to_string(), "termination by signal");
    }
}
