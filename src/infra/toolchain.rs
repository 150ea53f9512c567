//! Toolchain probing
//!
//! Locates external programs and extracts their versions.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{ExitStatusText, ToolError};

/// Resolve a program name (or explicit path) to an executable
pub fn locate(program: &str) -> Result<PathBuf, ToolError> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        if candidate.is_file() {
            return Ok(candidate.to_path_buf());
        }
        return Err(ToolError::NotFound {
            program: program.to_string(),
        });
    }

    which::which(program).map_err(|_| ToolError::NotFound {
        program: program.to_string(),
    })
}

/// Run a prepared command and capture its output
///
/// A non-zero exit becomes [`ToolError::Failed`] carrying the combined
/// stdout and stderr.
pub fn run_captured(command: &mut Command, display: &str) -> Result<String, ToolError> {
    let output = command.output().map_err(|e| ToolError::Spawn {
        program: display.to_string(),
        error: e.to_string(),
    })?;

    let text = combined_output(&output);
    if output.status.success() {
        Ok(text)
    } else {
        Err(ToolError::Failed {
            command: display.to_string(),
            status: ExitStatusText(output.status.code()),
            output: text,
        })
    }
}

/// Stdout followed by stderr, lossily decoded
pub fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (_, true) => stdout.into_owned(),
        (true, false) => stderr.into_owned(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

/// Extract version string from command output
pub fn extract_version(output: &str) -> Option<String> {
    // Try to find version patterns like "1.2.3" or "v1.2.3"
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Version of a program, if it runs and reports one
pub fn probe_version(program: &str) -> Option<String> {
    let path = locate(program).ok()?;
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    extract_version(&combined_output(&output))
}

/// `major.minor` of the default Python interpreter
pub fn probe_python_version() -> Option<String> {
    ["python3", "python"]
        .iter()
        .find_map(|p| probe_version(p))
        .map(|v| v.split('.').take(2).collect::<Vec<_>>().join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("1.4.0\n"), Some("1.4.0".to_string()));
        assert_eq!(
            extract_version("GNU Fortran (GCC) 13.2.0"),
            Some("13.2.0".to_string())
        );
        assert_eq!(extract_version("Python 3.10.12"), Some("3.10.12".to_string()));
        assert_eq!(extract_version("no digits here"), None);
    }

    #[test]
    fn test_locate_missing_program() {
        assert!(matches!(
            locate("wheelwright-definitely-not-installed"),
            Err(ToolError::NotFound { .. })
        ));
    }

    #[test]
    fn test_locate_missing_explicit_path() {
        assert!(locate("/nonexistent/bin/meson").is_err());
    }
}
