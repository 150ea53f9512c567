//! Artifact discovery
//!
//! Walks the staging tree and yields every file the [`ArtifactSpec`]
//! recognizes. Nothing is cached: each call walks the tree again, since the
//! build tool's output is the only source of truth.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::artifact::{ArtifactSpec, DiscoveredArtifact};

/// Lazy iterator over the artifacts under a search root
pub struct ArtifactWalk {
    spec: ArtifactSpec,
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Iterator for ArtifactWalk {
    type Item = DiscoveredArtifact;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.inner.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            // Build intermediates such as `_bem.so.p/` are directories
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };

            if let Some(kind) = self.spec.classify(name) {
                let path = entry.path().to_path_buf();
                let relative = path
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
                return Some(DiscoveredArtifact {
                    path,
                    relative,
                    kind,
                });
            }
        }
        None
    }
}

/// Discover artifacts under `staging_dir`
///
/// The walk starts at the spec's search root inside the staging directory,
/// does not follow symlinks, and visits entries in file-name order. A missing
/// search root yields an empty sequence.
pub fn discover_artifacts(staging_dir: &Path, spec: &ArtifactSpec) -> ArtifactWalk {
    let root = spec.search_root_in(staging_dir);
    tracing::debug!("Discovering '{}*' under {}", spec.base_name(), root.display());

    let inner = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    ArtifactWalk {
        spec: spec.clone(),
        root,
        inner,
    }
}
