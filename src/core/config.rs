//! Project configuration
//!
//! Reads the optional `wheelwright.toml` at the project root. Every field is
//! optional; accessors fall back to the built-in defaults. Relative paths
//! are resolved against the project directory.
//!
//! ```toml
//! [package]
//! name = "ccblade"
//!
//! [artifact]
//! base_name = "_bem"
//!
//! [build]
//! staging_dir = "meson_build"
//! extra_args = ["-Dbuildtype=release"]
//!
//! [targets]
//! wheel_staging = false
//! extra = ["dist/native"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    CONFIG_FILE_NAME, DEFAULT_ARTIFACT_BASE_NAME, DEFAULT_BUILD_DIR, DEFAULT_BUILD_TOOL,
    DEFAULT_PACKAGE_NAME, DEFAULT_STAGING_DIR,
};
use crate::core::artifact::{ArtifactKind, ArtifactSpec, Suffix};
use crate::core::build_env::BuildEnvironment;
use crate::core::extra_args::validate_extra_args;
use crate::core::targets::CanonicalTargets;
use crate::error::ConfigFileError;

/// Contents of `wheelwright.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Package settings
    #[serde(default)]
    pub package: PackageConfig,

    /// Artifact matching
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// External build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Destination directories
    #[serde(default)]
    pub targets: TargetsConfig,
}

/// `[package]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Python package directory name
    pub name: Option<String>,
}

/// `[artifact]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Artifact base name
    pub base_name: Option<String>,

    /// Search root relative to the staging directory
    pub search_root: Option<PathBuf>,

    /// Replacement suffix lists
    pub suffixes: Option<SuffixConfig>,
}

/// `[artifact.suffixes]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuffixConfig {
    /// Loadable binary suffixes
    #[serde(default)]
    pub primary: Vec<String>,

    /// Debug/link companion suffixes
    #[serde(default)]
    pub companion: Vec<String>,
}

/// `[build]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build tool program or path
    pub tool: Option<String>,

    /// Staging directory
    pub staging_dir: Option<PathBuf>,

    /// Build directory (install prefix and target root)
    pub build_dir: Option<PathBuf>,

    /// Run the install step
    pub install: Option<bool>,

    /// Parallel compile jobs
    pub jobs: Option<usize>,

    /// Pass-through configure arguments
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Fortran compiler
    pub fc: Option<String>,

    /// C compiler
    pub cc: Option<String>,
}

/// `[targets]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsConfig {
    /// Place into the in-source package directory
    pub in_source: Option<bool>,

    /// Place into the build-cache directory
    pub build_cache: Option<bool>,

    /// Place into the wheel staging directory
    pub wheel_staging: Option<bool>,

    /// Additional destination directories
    #[serde(default)]
    pub extra: Vec<PathBuf>,
}

impl ProjectConfig {
    /// Path of the config file in a project
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Load the project config, or defaults when the file is absent
    pub fn load(project_dir: &Path) -> Result<Self, ConfigFileError> {
        let path = Self::path_in(project_dir);
        if !path.exists() {
            tracing::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", project_dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigFileError::ReadError {
            path: path.clone(),
            error: e.to_string(),
        })?;

        let config = Self::from_toml(&content).map_err(|e| ConfigFileError::ParseError {
            path: path.clone(),
            error: e.to_string(),
        })?;

        config.validate(&path)?;
        Ok(config)
    }

    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self, path: &Path) -> Result<(), ConfigFileError> {
        let invalid = |field: &str, reason: &str| ConfigFileError::InvalidValue {
            path: path.to_path_buf(),
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.build.jobs == Some(0) {
            return Err(invalid("build.jobs", "must be greater than 0"));
        }
        if self.package.name.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("package.name", "must not be empty"));
        }
        if self.artifact.base_name.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("artifact.base_name", "must not be empty"));
        }
        if let Some(ref suffixes) = self.artifact.suffixes {
            if suffixes.primary.is_empty() {
                return Err(invalid("artifact.suffixes.primary", "must not be empty"));
            }
            let bad = suffixes
                .primary
                .iter()
                .chain(&suffixes.companion)
                .find(|s| !s.starts_with('.') || s.len() < 2);
            if let Some(bad) = bad {
                return Err(invalid(
                    "artifact.suffixes",
                    &format!("'{bad}' must start with '.'"),
                ));
            }
        }
        validate_extra_args(&self.build.extra_args)
            .map_err(|e| invalid("build.extra_args", &e.to_string()))?;

        Ok(())
    }

    /// Package directory name
    pub fn package_name(&self) -> &str {
        self.package.name.as_deref().unwrap_or(DEFAULT_PACKAGE_NAME)
    }

    /// Build tool program
    pub fn tool(&self) -> &str {
        self.build.tool.as_deref().unwrap_or(DEFAULT_BUILD_TOOL)
    }

    /// Whether to run the install step
    pub fn install(&self) -> bool {
        self.build.install.unwrap_or(true)
    }

    /// Staging directory resolved against the project
    pub fn staging_dir(&self, project_dir: &Path) -> PathBuf {
        resolve(
            project_dir,
            self.build
                .staging_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_STAGING_DIR)),
        )
    }

    /// Build directory resolved against the project
    pub fn build_dir(&self, project_dir: &Path) -> PathBuf {
        resolve(
            project_dir,
            self.build
                .build_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_BUILD_DIR)),
        )
    }

    /// Artifact spec (search root defaults to the package directory)
    pub fn artifact_spec(&self) -> ArtifactSpec {
        let base_name = self
            .artifact
            .base_name
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACT_BASE_NAME);
        let search_root = self
            .artifact
            .search_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.package_name()));

        let spec = ArtifactSpec::new(base_name, search_root);
        match self.artifact.suffixes {
            Some(ref suffixes) => spec.with_suffixes(
                suffixes
                    .primary
                    .iter()
                    .map(|s| Suffix::new(s.clone(), ArtifactKind::Primary))
                    .chain(
                        suffixes
                            .companion
                            .iter()
                            .map(|s| Suffix::new(s.clone(), ArtifactKind::Companion)),
                    )
                    .collect(),
            ),
            None => spec,
        }
    }

    /// Canonical destinations to include
    pub fn canonical_targets(&self) -> CanonicalTargets {
        CanonicalTargets {
            in_source: self.targets.in_source.unwrap_or(true),
            build_cache: self.targets.build_cache.unwrap_or(true),
            wheel_staging: self.targets.wheel_staging.unwrap_or(true),
        }
    }

    /// Extra destinations resolved against the project
    pub fn extra_targets(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.targets
            .extra
            .iter()
            .map(|p| resolve(project_dir, p))
            .collect()
    }

    /// Toolchain settings declared in the file
    pub fn environment(&self) -> BuildEnvironment {
        BuildEnvironment {
            fc: self.build.fc.clone(),
            cc: self.build.cc.clone(),
            extra_args: self.build.extra_args.clone(),
            ..BuildEnvironment::default()
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
