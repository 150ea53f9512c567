//! Build command implementation
//!
//! Implements `wheelwright build`: resolves the project configuration, the
//! environment and the command-line flags into a [`BuildPlan`], runs the
//! orchestrator, and reports the placed artifacts or the failing stage.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::cli::commands::BuildArgs;
use crate::cli::output::{
    create_spinner, is_json, print_detail, print_success, print_warning, status,
};
use crate::core::artifact::ArtifactSpec;
use crate::core::build_env::BuildEnvironment;
use crate::core::builder::{BuildOrchestrator, BuildPlan, BuildState, StageObserver, ToolOutput};
use crate::core::config::ProjectConfig;
use crate::core::extra_args::parse_extra_args;
use crate::core::platform::{Platform, PlatformTag};
use crate::core::targets::{build_lib_dir, canonical_target_set, CanonicalTargets};
use crate::infra::filesystem::file_sha256;
use crate::infra::meson::MesonTool;
use crate::infra::toolchain::probe_python_version;

/// Fully resolved inputs of one build
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    /// Orchestrator inputs
    pub plan: BuildPlan,
    /// Platform used for toolchain defaults
    pub platform: Platform,
    /// Build tool program
    pub tool: String,
}

/// Merge config file, environment and flags into a build plan
///
/// Priority: flags, then environment, then `wheelwright.toml`.
pub fn resolve_build(
    project_dir: &Path,
    config: &ProjectConfig,
    args: &BuildArgs,
    process_env: BuildEnvironment,
) -> Result<ResolvedBuild> {
    if args.jobs == Some(0) {
        anyhow::bail!("--jobs must be greater than 0");
    }
    if args.package.as_deref().is_some_and(str::is_empty) {
        anyhow::bail!("--package must not be empty");
    }
    if args.artifact.as_deref().is_some_and(str::is_empty) {
        anyhow::bail!("--artifact must not be empty");
    }

    let package = args
        .package
        .clone()
        .unwrap_or_else(|| config.package_name().to_string());

    let staging_dir = args
        .staging_dir
        .as_ref()
        .map_or_else(|| config.staging_dir(project_dir), |p| project_dir.join(p));
    let build_dir = args
        .build_dir
        .as_ref()
        .map_or_else(|| config.build_dir(project_dir), |p| project_dir.join(p));

    let python_version = match args.python_version.clone() {
        Some(v) => v,
        None => probe_python_version().context(
            "Cannot determine the target Python version; pass --python-version (e.g. 3.10)",
        )?,
    };

    let mut tag = PlatformTag::host(python_version);
    if let Some(platform) = args.platform {
        tag = tag.with_platform(platform);
    }
    if let Some(ref machine) = args.machine {
        tag = tag.with_machine(machine.clone());
    }
    if let Some(ref implementation) = args.python_impl {
        tag = tag.with_implementation(implementation.clone());
    }

    let file_targets = config.canonical_targets();
    let include = CanonicalTargets {
        in_source: file_targets.in_source && !args.no_in_source,
        build_cache: file_targets.build_cache && !args.no_build_cache,
        wheel_staging: file_targets.wheel_staging && !args.no_wheel_staging,
    };
    let mut targets = canonical_target_set(project_dir, &build_dir, &package, &tag, include);
    for extra in config.extra_targets(project_dir) {
        targets.push(extra);
    }
    for extra in &args.dest {
        targets.push(project_dir.join(extra));
    }

    let mut artifact = config.artifact_spec();
    if let Some(ref base_name) = args.artifact {
        artifact = ArtifactSpec::new(base_name.clone(), package.clone())
            .with_suffixes(artifact.suffixes().to_vec());
    } else if args.package.is_some() && config.artifact.search_root.is_none() {
        artifact = ArtifactSpec::new(artifact.base_name(), package.clone())
            .with_suffixes(artifact.suffixes().to_vec());
    }

    let mut cli_env = BuildEnvironment::new();
    if let Some(ref raw) = args.meson_args {
        cli_env.extra_args = parse_extra_args(raw).context("Invalid --meson-args")?;
    }
    cli_env.fc = args.fc.clone();
    cli_env.cc = args.cc.clone();
    let environment = cli_env.or(process_env).or(config.environment());

    let plan = BuildPlan {
        source_dir: project_dir.to_path_buf(),
        staging_dir,
        lib_dir: build_lib_dir(&build_dir, &tag),
        build_dir,
        targets,
        artifact,
        environment,
        install: config.install() && !args.no_install,
        jobs: args.jobs.or(config.build.jobs),
    };

    Ok(ResolvedBuild {
        plan,
        platform: tag.platform,
        tool: args
            .build_tool
            .clone()
            .unwrap_or_else(|| config.tool().to_string()),
    })
}

/// Observer that narrates stages on a spinner
struct SpinnerObserver {
    spinner: ProgressBar,
}

impl StageObserver for SpinnerObserver {
    fn on_transition(&self, from: BuildState, to: BuildState) {
        tracing::info!("Build {from} -> {to}");
        let message = match to {
            BuildState::Configured => "Compiling...",
            BuildState::Compiled => "Discovering artifacts...",
            BuildState::Discovered => "Placing artifacts...",
            BuildState::Placed | BuildState::Failed | BuildState::Unconfigured => return,
        };
        self.spinner.set_message(message);
    }

    fn on_tool_output(&self, output: &ToolOutput) {
        tracing::debug!("$ {}\n{}", output.command, output.output);
    }
}

/// Execute the build command
pub async fn execute(project_dir: &Path, args: BuildArgs) -> Result<()> {
    let config = ProjectConfig::load(project_dir)
        .with_context(|| format!("Failed to load configuration in {}", project_dir.display()))?;
    let process_env =
        BuildEnvironment::from_process_env().context("Invalid MESON_ARGS environment variable")?;
    let resolved = resolve_build(project_dir, &config, &args, process_env)?;

    tracing::info!(
        "Building '{}' in {} with {}",
        resolved.plan.artifact.base_name(),
        resolved.plan.staging_dir.display(),
        resolved.tool
    );

    let spinner = create_spinner("Configuring...");
    let observer = SpinnerObserver {
        spinner: spinner.clone(),
    };
    let orchestrator =
        BuildOrchestrator::new(MesonTool::new(resolved.tool)).with_observer(Box::new(observer));
    let (plan, platform) = (resolved.plan, resolved.platform);

    let result = tokio::task::spawn_blocking(move || orchestrator.run(plan, platform))
        .await
        .context("Build task panicked")?;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            if is_json() {
                let json = serde_json::json!({
                    "status": "success",
                    "tool_version": report.tool_version,
                    "placed": report.placed,
                    "artifacts": report.artifacts.iter().map(|a| serde_json::json!({
                        "path": a.path,
                        "kind": a.kind.as_str(),
                    })).collect::<Vec<_>>(),
                    "warnings": report.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
                return Ok(());
            }

            print_success(&format!(
                "Placed {} artifact(s), {} file(s) written",
                report.artifacts.len(),
                report.placed.len()
            ));
            for artifact in &report.artifacts {
                let digest = file_sha256(&artifact.path)?;
                print_detail(&format!(
                    "{} [{}] sha256:{}",
                    artifact.file_name(),
                    artifact.kind,
                    &digest[..12]
                ));
            }
            for path in &report.placed {
                print_detail(&format!("-> {}", display_relative(project_dir, path)));
            }
            for warning in &report.warnings {
                print_warning(&format!("Skipped destination: {warning}"));
            }
            Ok(())
        }
        Err(e) => {
            if is_json() {
                let json = serde_json::json!({
                    "status": "error",
                    "stage": e.stage().as_str(),
                    "cause": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
            } else {
                eprintln!("{} Build failed at stage '{}'", status::ERROR, e.stage());
            }
            Err(anyhow::Error::new(e))
        }
    }
}

fn display_relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
