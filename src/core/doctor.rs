//! Doctor logic
//!
//! Probes the external programs a native build depends on and validates the
//! project configuration. Nothing here fails: every problem becomes part of
//! the [`DoctorReport`].

use std::path::{Path, PathBuf};

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::config::ProjectConfig;
use crate::infra::toolchain::{locate, probe_version};

/// Whether a missing program blocks builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Builds cannot run without it
    Required,
    /// Only some projects need it
    Optional,
}

/// Outcome of probing one program
#[derive(Debug, Clone)]
pub struct ToolCheck {
    /// What was looked for, e.g. "Fortran compiler"
    pub name: String,
    /// Required or optional
    pub requirement: Requirement,
    /// Candidate that answered, with its location and version
    pub found: Option<FoundTool>,
    /// Candidates tried, in order
    pub candidates: Vec<String>,
    /// How to install it
    pub suggestion: String,
}

/// A program that answered its version probe
#[derive(Debug, Clone)]
pub struct FoundTool {
    /// Program name that matched
    pub program: String,
    /// Resolved location
    pub path: PathBuf,
    /// Reported version
    pub version: String,
}

impl ToolCheck {
    /// Whether a candidate answered
    pub fn passed(&self) -> bool {
        self.found.is_some()
    }

    /// Whether this check blocks builds
    pub fn is_blocking(&self) -> bool {
        self.requirement == Requirement::Required && !self.passed()
    }
}

/// Summary verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Everything found, config valid
    Ready,
    /// Required tools found; optional tools or config need attention
    Degraded,
    /// A required tool is missing
    Blocked,
}

/// All doctor findings
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Program checks in probe order
    pub checks: Vec<ToolCheck>,
    /// Problems with `wheelwright.toml`
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Overall verdict
    pub fn readiness(&self) -> Readiness {
        if self.checks.iter().any(ToolCheck::is_blocking) {
            Readiness::Blocked
        } else if self.checks.iter().all(ToolCheck::passed) && self.config_issues.is_empty() {
            Readiness::Ready
        } else {
            Readiness::Degraded
        }
    }

    /// Checks that passed
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    /// Required checks that failed
    pub fn blocking(&self) -> impl Iterator<Item = &ToolCheck> {
        self.checks.iter().filter(|c| c.is_blocking())
    }
}

fn probe(name: &str, candidates: &[&str], suggestion: &str, requirement: Requirement) -> ToolCheck {
    let found = candidates.iter().find_map(|program| {
        let version = probe_version(program)?;
        let path = locate(program).ok()?;
        tracing::debug!("{name}: {program} {version} at {}", path.display());
        Some(FoundTool {
            program: (*program).to_string(),
            path,
            version,
        })
    });

    ToolCheck {
        name: name.to_string(),
        requirement,
        found,
        candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
        suggestion: suggestion.to_string(),
    }
}

/// Probe the configured build tool
pub fn check_build_tool(program: &str) -> ToolCheck {
    probe(
        "Build tool",
        &[program],
        "Install Meson with `pip install meson` or set [build] tool in wheelwright.toml",
        Requirement::Required,
    )
}

/// Probe the Ninja backend Meson compiles with
pub fn check_ninja() -> ToolCheck {
    probe(
        "Ninja",
        &["ninja"],
        "Install Ninja with `pip install ninja` or your package manager",
        Requirement::Required,
    )
}

/// Probe for a Fortran compiler
pub fn check_fortran() -> ToolCheck {
    probe(
        "Fortran compiler",
        &["gfortran", "flang", "ifx"],
        "Install gfortran (MinGW-w64 on Windows, `brew install gcc` on macOS)",
        Requirement::Optional,
    )
}

/// Probe for a C compiler
pub fn check_c_compiler() -> ToolCheck {
    probe(
        "C compiler",
        &["gcc", "cc", "clang"],
        "Install gcc or clang",
        Requirement::Optional,
    )
}

/// Problems loading the project config, if one exists
pub fn check_project_config(project_dir: &Path) -> Vec<String> {
    if !ProjectConfig::path_in(project_dir).exists() {
        return Vec::new();
    }
    match ProjectConfig::load(project_dir) {
        Ok(_) => Vec::new(),
        Err(e) => vec![format!("Invalid {CONFIG_FILE_NAME}: {e}")],
    }
}

/// Run every check
///
/// The build tool probed is the one named in the project config, if any.
pub fn run_doctor(project_dir: Option<&Path>) -> DoctorReport {
    let config = project_dir
        .and_then(|dir| ProjectConfig::load(dir).ok())
        .unwrap_or_default();

    DoctorReport {
        checks: vec![
            check_build_tool(config.tool()),
            check_ninja(),
            check_fortran(),
            check_c_compiler(),
        ],
        config_issues: project_dir.map(check_project_config).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn check(requirement: Requirement, found: bool) -> ToolCheck {
        ToolCheck {
            name: "x".to_string(),
            requirement,
            found: found.then(|| FoundTool {
                program: "x".to_string(),
                path: PathBuf::from("/usr/bin/x"),
                version: "1.0".to_string(),
            }),
            candidates: vec!["x".to_string()],
            suggestion: String::new(),
        }
    }

    #[test]
    fn test_readiness() {
        let mut report = DoctorReport::default();
        report.checks.push(check(Requirement::Required, true));
        assert_eq!(report.readiness(), Readiness::Ready);

        report.checks.push(check(Requirement::Optional, false));
        assert_eq!(report.readiness(), Readiness::Degraded);
        assert_eq!(report.passed_count(), 1);

        report.checks.push(check(Requirement::Required, false));
        assert_eq!(report.readiness(), Readiness::Blocked);
        assert_eq!(report.blocking().count(), 1);
    }

    #[test]
    fn test_config_issue_degrades() {
        let report = DoctorReport {
            checks: vec![check(Requirement::Required, true)],
            config_issues: vec!["bad".to_string()],
        };
        assert_eq!(report.readiness(), Readiness::Degraded);
    }

    #[test]
    fn test_missing_build_tool_blocks() {
        let result = check_build_tool("wheelwright-no-such-meson");
        assert!(result.is_blocking());
        assert_eq!(result.candidates, vec!["wheelwright-no-such-meson".to_string()]);
    }

    #[test]
    fn test_invalid_config_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[build]\njobs = 0\n").unwrap();

        let issues = check_project_config(dir.path());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("build.jobs"));
    }

    #[test]
    fn test_absent_config_is_fine() {
        let dir = TempDir::new().unwrap();
        assert!(check_project_config(dir.path()).is_empty());
    }
}
