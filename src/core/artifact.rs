//! Artifact identification
//!
//! An artifact is a compiled shared library produced by the native build.
//! Matching is purely name-based: a file is an artifact when its name starts
//! with the spec's base name and ends with one of the recognized suffixes.
//! All suffixes are checked on every host, since the staging tree may hold
//! cross-compiled output.

use std::path::{Path, PathBuf};

use crate::config::defaults::{COMPANION_SUFFIXES, PRIMARY_SUFFIXES};

/// Kind of artifact, decided by its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Loadable binary (`.so`, `.pyd`, `.dylib`, `.dll`)
    Primary,
    /// Debug or link companion (`.lib`, `.pdb`)
    Companion,
}

impl ArtifactKind {
    /// Lowercase label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Companion => "companion",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized suffix and the kind it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    /// Suffix including the leading dot
    pub value: String,
    /// Kind of file carrying it
    pub kind: ArtifactKind,
}

impl Suffix {
    /// Create a suffix entry
    pub fn new(value: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

/// Identifies the native binaries to collect from the staging tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    base_name: String,
    suffixes: Vec<Suffix>,
    search_root: PathBuf,
}

impl ArtifactSpec {
    /// Create a spec with the default suffix set
    ///
    /// `search_root` is relative to the staging directory; an empty path
    /// searches the whole staging tree.
    pub fn new(base_name: impl Into<String>, search_root: impl Into<PathBuf>) -> Self {
        let suffixes = PRIMARY_SUFFIXES
            .iter()
            .map(|s| Suffix::new(*s, ArtifactKind::Primary))
            .chain(
                COMPANION_SUFFIXES
                    .iter()
                    .map(|s| Suffix::new(*s, ArtifactKind::Companion)),
            )
            .collect();

        Self {
            base_name: base_name.into(),
            suffixes,
            search_root: search_root.into(),
        }
    }

    /// Replace the suffix set
    #[must_use]
    pub fn with_suffixes(mut self, suffixes: Vec<Suffix>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Artifact base name (e.g. `_bem`)
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Recognized suffixes
    pub fn suffixes(&self) -> &[Suffix] {
        &self.suffixes
    }

    /// Search root relative to the staging directory
    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// Absolute search root for a staging directory
    pub fn search_root_in(&self, staging_dir: &Path) -> PathBuf {
        staging_dir.join(&self.search_root)
    }

    /// Classify a file name
    ///
    /// Returns `None` when the name is not an artifact of this spec.
    /// Matching is case-sensitive.
    pub fn classify(&self, file_name: &str) -> Option<ArtifactKind> {
        if !file_name.starts_with(&self.base_name) {
            return None;
        }
        self.suffixes
            .iter()
            .find(|s| file_name.ends_with(&s.value))
            .map(|s| s.kind)
    }
}

/// An artifact found in the staging tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArtifact {
    /// Absolute path in the staging tree
    pub path: PathBuf,
    /// Path relative to the search root, reproduced under each destination
    pub relative: PathBuf,
    /// Primary or companion
    pub kind: ArtifactKind,
}

impl DiscoveredArtifact {
    /// File name of the artifact
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
