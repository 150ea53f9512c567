//! CLI implementation for `wheelwright clean`
//!
//! Removes the staging and build directories named by the project
//! configuration.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::clean::{clean_project, has_build_artifacts};
use crate::core::config::ProjectConfig;

/// Execute the clean command
pub async fn execute(project_dir: &Path) -> Result<()> {
    let config = ProjectConfig::load(project_dir)
        .with_context(|| format!("Failed to load configuration in {}", project_dir.display()))?;
    let staging_dir = config.staging_dir(project_dir);
    let build_dir = config.build_dir(project_dir);

    if !has_build_artifacts(&staging_dir, &build_dir) {
        if is_json() {
            println!("{}", serde_json::json!({ "status": "success", "removed": [] }));
        } else {
            print_success("Nothing to clean");
        }
        return Ok(());
    }

    let result =
        clean_project(&staging_dir, &build_dir).context("Failed to clean build directories")?;

    if is_json() {
        println!(
            "{}",
            serde_json::json!({ "status": "success", "removed": result.removed })
        );
        return Ok(());
    }

    print_success("Cleaned build directories:");
    for dir in &result.removed {
        print_detail(&format!("Removed {}/", dir.display()));
    }

    Ok(())
}
