//! CLI command for `wheelwright discover`
//!
//! Lists the artifacts a build left in the staging directory without
//! placing them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_detail, print_info, print_success};
use crate::core::artifact::ArtifactSpec;
use crate::core::config::ProjectConfig;
use crate::core::discover::discover_artifacts;
use crate::infra::filesystem::file_sha256;

/// Execute the discover command
pub async fn execute(
    project_dir: &Path,
    staging_dir: Option<PathBuf>,
    artifact: Option<String>,
    search_root: Option<PathBuf>,
) -> Result<()> {
    let config = ProjectConfig::load(project_dir)
        .with_context(|| format!("Failed to load configuration in {}", project_dir.display()))?;

    let staging_dir = staging_dir.map_or_else(|| config.staging_dir(project_dir), |p| project_dir.join(p));
    let defaults = config.artifact_spec();
    let spec = ArtifactSpec::new(
        artifact.unwrap_or_else(|| defaults.base_name().to_string()),
        search_root.unwrap_or_else(|| defaults.search_root().to_path_buf()),
    )
    .with_suffixes(defaults.suffixes().to_vec());

    let artifacts: Vec<_> = discover_artifacts(&staging_dir, &spec).collect();

    if is_json() {
        let entries = artifacts
            .iter()
            .map(|a| {
                Ok(serde_json::json!({
                    "path": a.path,
                    "relative": a.relative,
                    "kind": a.kind.as_str(),
                    "sha256": file_sha256(&a.path)?,
                }))
            })
            .collect::<Result<Vec<_>, crate::error::FilesystemError>>()?;
        let json = serde_json::json!({
            "status": "success",
            "search_root": spec.search_root_in(&staging_dir),
            "artifacts": entries,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    if artifacts.is_empty() {
        print_info(&format!(
            "No '{}' artifacts under {}",
            spec.base_name(),
            spec.search_root_in(&staging_dir).display()
        ));
        return Ok(());
    }

    print_success(&format!("Found {} artifact(s)", artifacts.len()));
    for artifact in &artifacts {
        let digest = file_sha256(&artifact.path)?;
        print_detail(&format!(
            "{} [{}] sha256:{}",
            artifact.relative.display(),
            artifact.kind,
            &digest[..12]
        ));
    }

    Ok(())
}
