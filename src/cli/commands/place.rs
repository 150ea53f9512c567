//! CLI command for `wheelwright place`
//!
//! Copies a single prebuilt artifact into one or more destination
//! directories, under the same partial-failure rules as a full build.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::output::{is_json, print_detail, print_success, print_warning};
use crate::core::artifact::{ArtifactSpec, DiscoveredArtifact};
use crate::core::builder::place_all;
use crate::core::targets::TargetSet;

/// Execute the place command
pub async fn execute(project_dir: &Path, artifact: &Path, dest: &[PathBuf]) -> Result<()> {
    let path = project_dir.join(artifact);
    if !path.is_file() {
        anyhow::bail!("Artifact {} is not a file", path.display());
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Empty base name: any file with a recognized suffix qualifies.
    let Some(kind) = ArtifactSpec::new("", "").classify(&file_name) else {
        anyhow::bail!("{file_name} does not have a recognized extension suffix");
    };

    let discovered = DiscoveredArtifact {
        path,
        relative: PathBuf::from(&file_name),
        kind,
    };
    let targets: TargetSet = dest.iter().map(|d| project_dir.join(d)).collect();

    let (placed, warnings) = place_all(std::slice::from_ref(&discovered), &targets)?;

    if is_json() {
        let json = serde_json::json!({
            "status": "success",
            "placed": placed,
            "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    print_success(&format!("Placed {file_name} into {} location(s)", placed.len()));
    for path in &placed {
        print_detail(&path.display().to_string());
    }
    for warning in &warnings {
        print_warning(&format!("Skipped destination: {warning}"));
    }

    Ok(())
}
