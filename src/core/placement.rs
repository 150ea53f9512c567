//! Artifact placement
//!
//! Copies one artifact into every directory of a [`TargetSet`]. Each
//! destination is attempted independently so that one unwritable location
//! does not keep the artifact from the others; the caller sees both what
//! landed and what failed.

use std::path::PathBuf;

use crate::core::artifact::DiscoveredArtifact;
use crate::core::targets::TargetSet;
use crate::error::{PlacementError, PlacementFailure};
use crate::infra::filesystem;

/// Copy `artifact` into each destination of `targets`
///
/// The artifact keeps its path relative to the search root under each
/// destination. Missing directories are created. Returns the destination
/// files written, or a [`PlacementError`] listing every failed destination
/// alongside the ones that succeeded.
pub fn place(
    artifact: &DiscoveredArtifact,
    targets: &TargetSet,
) -> Result<Vec<PathBuf>, PlacementError> {
    let mut placed = Vec::with_capacity(targets.len());
    let mut failures = Vec::new();

    for dest_dir in targets.dirs() {
        let dest = dest_dir.join(&artifact.relative);

        let result = match dest.parent() {
            Some(parent) => filesystem::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|()| filesystem::copy_preserving(&artifact.path, &dest));

        match result {
            Ok(()) => {
                tracing::debug!("Placed {} -> {}", artifact.path.display(), dest.display());
                placed.push(dest);
            }
            Err(e) => {
                tracing::warn!("Could not place {} into {}: {e}", artifact.file_name(), dest_dir.display());
                failures.push(PlacementFailure {
                    artifact: artifact.path.clone(),
                    destination: dest_dir.clone(),
                    cause: e.to_string(),
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(placed)
    } else {
        Err(PlacementError {
            artifact: artifact.path.clone(),
            placed,
            failures,
        })
    }
}
