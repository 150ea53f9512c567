//! Build orchestration logic
//!
//! Drives one build attempt through
//! `Unconfigured -> Configured -> Compiled -> Discovered -> Placed`, with any
//! stage able to fail. Each stage hands the next a typed value
//! ([`ConfigHandle`], [`CompileResult`]) so stages cannot run out of order,
//! and a fresh [`BuildOrchestrator::run`] always starts from scratch.
//!
//! The external build tool sits behind the [`BuildTool`] trait; transitions
//! are reported to a [`StageObserver`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::artifact::{ArtifactSpec, DiscoveredArtifact};
use crate::core::build_env::BuildEnvironment;
use crate::core::discover::{discover_artifacts, ArtifactWalk};
use crate::core::extra_args::validate_extra_args;
use crate::core::lock::StagingLock;
use crate::core::placement::place;
use crate::core::platform::Platform;
use crate::core::targets::TargetSet;
use crate::error::{OrchestratorError, PlacementFailure, ToolError};
use crate::infra::filesystem;

/// Orchestration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Nothing done yet
    Unconfigured,
    /// Build tool set up in the staging directory
    Configured,
    /// Compile (and install) finished
    Compiled,
    /// Artifacts found in the staging tree
    Discovered,
    /// Artifacts copied into the target set
    Placed,
    /// A stage failed
    Failed,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Compiled => "compiled",
            Self::Discovered => "discovered",
            Self::Placed => "placed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Captured result of one external tool call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Command line as run
    pub command: String,
    /// Combined stdout and stderr
    pub output: String,
}

/// Where and how a tool call runs
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// Working directory (the project source)
    pub source_dir: &'a Path,
    /// Variables set on the tool process
    pub env: &'a BTreeMap<String, String>,
}

/// Arguments of the configure call
#[derive(Debug, Clone, Copy)]
pub struct ConfigureRequest<'a> {
    /// Staging (build) directory
    pub staging_dir: &'a Path,
    /// Install prefix
    pub prefix: &'a Path,
    /// Target library directory for pure and platform modules
    pub lib_dir: &'a Path,
    /// Pass-through arguments
    pub extra_args: &'a [String],
}

/// External native build tool
pub trait BuildTool {
    /// Program name or path, for messages
    fn program(&self) -> &str;

    /// Run the version probe; fails when the tool is not reachable
    fn probe_version(&self, ctx: &ToolContext<'_>) -> Result<String, ToolError>;

    /// Configure a fresh staging directory
    fn setup(
        &self,
        ctx: &ToolContext<'_>,
        request: &ConfigureRequest<'_>,
    ) -> Result<ToolOutput, ToolError>;

    /// Compile everything in the staging directory
    fn compile(
        &self,
        ctx: &ToolContext<'_>,
        staging_dir: &Path,
        jobs: Option<usize>,
    ) -> Result<ToolOutput, ToolError>;

    /// Install from the staging directory into the configured prefix
    fn install(&self, ctx: &ToolContext<'_>, staging_dir: &Path) -> Result<ToolOutput, ToolError>;
}

/// Receives stage transitions
pub trait StageObserver: Send + Sync {
    /// Called on every state change
    fn on_transition(&self, from: BuildState, to: BuildState);

    /// Called with each successful tool call's output
    fn on_tool_output(&self, _output: &ToolOutput) {}
}

/// Observer that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_transition(&self, from: BuildState, to: BuildState) {
        if to == BuildState::Failed {
            tracing::warn!("Build {from} -> {to}");
        } else {
            tracing::info!("Build {from} -> {to}");
        }
    }

    fn on_tool_output(&self, output: &ToolOutput) {
        tracing::debug!("$ {}\n{}", output.command, output.output);
    }
}

/// Everything one build attempt needs
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Project source directory
    pub source_dir: PathBuf,
    /// Directory the build tool writes into
    pub staging_dir: PathBuf,
    /// Install prefix
    pub build_dir: PathBuf,
    /// Target library directory passed to configure
    pub lib_dir: PathBuf,
    /// Destination directories
    pub targets: TargetSet,
    /// What to collect from the staging tree
    pub artifact: ArtifactSpec,
    /// Toolchain and pass-through arguments
    pub environment: BuildEnvironment,
    /// Run the install step after compiling
    pub install: bool,
    /// Parallel compile jobs (tool default when `None`)
    pub jobs: Option<usize>,
}

/// Proof that configure succeeded
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    plan: BuildPlan,
    tool_version: String,
}

impl ConfigHandle {
    /// Plan with platform defaults applied
    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    /// Resolved toolchain environment
    pub fn environment(&self) -> &BuildEnvironment {
        &self.plan.environment
    }

    /// Version reported by the build tool
    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }
}

/// Proof that compile succeeded
#[derive(Debug, Clone)]
pub struct CompileResult {
    plan: BuildPlan,
    tool_version: String,
    /// Output of the compile (and install) calls
    pub outputs: Vec<ToolOutput>,
}

impl CompileResult {
    /// Plan the build ran with
    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    /// Staging directory holding the build output
    pub fn staging_dir(&self) -> &Path {
        &self.plan.staging_dir
    }
}

/// Successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Every destination file written (never empty)
    pub placed: Vec<PathBuf>,
    /// Artifacts found in the staging tree
    pub artifacts: Vec<DiscoveredArtifact>,
    /// Destinations that failed for artifacts placed elsewhere
    pub warnings: Vec<PlacementFailure>,
    /// Build tool version
    pub tool_version: String,
}

/// Outcome of one run
pub type BuildResult = Result<BuildReport, OrchestratorError>;

/// Refuse a staging directory whose reset would delete something else
///
/// The staging tree is wiped on every run, so it must not be or contain the
/// source tree, the install prefix or any destination.
fn check_staging_dir(plan: &BuildPlan) -> Result<(), OrchestratorError> {
    let staging = &plan.staging_dir;
    let guarded = [
        ("source directory", plan.source_dir.as_path()),
        ("build directory", plan.build_dir.as_path()),
    ]
    .into_iter()
    .chain(plan.targets.dirs().iter().map(|d| ("destination", d.as_path())));

    for (what, path) in guarded {
        if filesystem::is_within(staging, path) {
            return Err(OrchestratorError::config(format!(
                "staging directory '{}' contains the {what} '{}' and cannot be reset",
                staging.display(),
                path.display()
            )));
        }
    }
    Ok(())
}

/// Runs builds with one tool and one observer
pub struct BuildOrchestrator<T> {
    tool: T,
    observer: Box<dyn StageObserver>,
}

impl<T: BuildTool> BuildOrchestrator<T> {
    /// Create an orchestrator that logs through `tracing`
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the stage observer
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The wrapped build tool
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Probe the tool, reset the staging directory and run setup
    pub fn configure(
        &self,
        plan: BuildPlan,
        platform: Platform,
    ) -> Result<ConfigHandle, OrchestratorError> {
        let mut plan = plan;
        plan.environment = plan.environment.with_platform_defaults(platform);
        let env = plan.environment.to_env_map();
        let ctx = ToolContext {
            source_dir: &plan.source_dir,
            env: &env,
        };

        let tool_version = self
            .tool
            .probe_version(&ctx)
            .map_err(|e| self.tool_missing(&e))?;
        tracing::info!("Using {} {tool_version}", self.tool.program());

        if !plan.source_dir.is_dir() {
            return Err(OrchestratorError::config(format!(
                "source directory '{}' does not exist",
                plan.source_dir.display()
            )));
        }
        if plan.targets.is_empty() {
            return Err(OrchestratorError::config("no destination directories given"));
        }
        validate_extra_args(&plan.environment.extra_args)?;
        check_staging_dir(&plan)?;

        // Stale configuration must never survive into a new run
        filesystem::reset_dir(&plan.staging_dir).map_err(|e| {
            OrchestratorError::config(format!("cannot initialize staging directory: {e}"))
        })?;

        let request = ConfigureRequest {
            staging_dir: &plan.staging_dir,
            prefix: &plan.build_dir,
            lib_dir: &plan.lib_dir,
            extra_args: &plan.environment.extra_args,
        };
        let output = self
            .tool
            .setup(&ctx, &request)
            .map_err(|e| OrchestratorError::config(describe_tool_error(&e)))?;
        self.observer.on_tool_output(&output);

        Ok(ConfigHandle { plan, tool_version })
    }

    /// Compile, then install when the plan asks for it
    pub fn compile(&self, handle: ConfigHandle) -> Result<CompileResult, OrchestratorError> {
        let ConfigHandle { plan, tool_version } = handle;
        let env = plan.environment.to_env_map();
        let ctx = ToolContext {
            source_dir: &plan.source_dir,
            env: &env,
        };

        let mut outputs = Vec::new();

        let output = self
            .tool
            .compile(&ctx, &plan.staging_dir, plan.jobs)
            .map_err(|e| compile_error("compile", &e))?;
        self.observer.on_tool_output(&output);
        outputs.push(output);

        if plan.install {
            let output = self
                .tool
                .install(&ctx, &plan.staging_dir)
                .map_err(|e| compile_error("install", &e))?;
            self.observer.on_tool_output(&output);
            outputs.push(output);
        }

        Ok(CompileResult {
            plan,
            tool_version,
            outputs,
        })
    }

    /// Walk the staging tree for artifacts
    pub fn discover(&self, compiled: &CompileResult) -> ArtifactWalk {
        discover_artifacts(compiled.staging_dir(), &compiled.plan.artifact)
    }

    /// Run the whole sequence under the staging lock
    pub fn run(&self, plan: BuildPlan, platform: Platform) -> BuildResult {
        let mut state = BuildState::Unconfigured;

        let result = StagingLock::acquire(&plan.staging_dir)
            .map_err(|e| OrchestratorError::config(e.to_string()))
            .and_then(|_lock| self.run_locked(plan, platform, &mut state));

        if result.is_err() {
            self.advance(&mut state, BuildState::Failed);
        }
        result
    }

    fn run_locked(
        &self,
        plan: BuildPlan,
        platform: Platform,
        state: &mut BuildState,
    ) -> BuildResult {
        let handle = self.configure(plan, platform)?;
        self.advance(state, BuildState::Configured);

        let compiled = self.compile(handle)?;
        self.advance(state, BuildState::Compiled);

        let artifacts: Vec<DiscoveredArtifact> = self.discover(&compiled).collect();
        if artifacts.is_empty() {
            let spec = &compiled.plan.artifact;
            return Err(OrchestratorError::NoArtifactProduced {
                base_name: spec.base_name().to_string(),
                search_root: spec.search_root_in(compiled.staging_dir()),
            });
        }
        tracing::info!("Discovered {} artifact(s)", artifacts.len());
        self.advance(state, BuildState::Discovered);

        let (placed, warnings) = place_all(&artifacts, &compiled.plan.targets)?;
        self.advance(state, BuildState::Placed);

        Ok(BuildReport {
            placed,
            artifacts,
            warnings,
            tool_version: compiled.tool_version,
        })
    }

    fn advance(&self, state: &mut BuildState, to: BuildState) {
        self.observer.on_transition(*state, to);
        *state = to;
    }

    fn tool_missing(&self, error: &ToolError) -> OrchestratorError {
        let hint = match error {
            ToolError::Failed { .. } => format!(
                "'{} --version' failed ({error}); reinstall it or point --build-tool at a working copy",
                self.tool.program()
            ),
            _ => format!(
                "Install it (e.g. `pip install {} ninja`) or pass --build-tool with its path",
                self.tool.program()
            ),
        };
        OrchestratorError::ToolMissing {
            program: self.tool.program().to_string(),
            hint,
        }
    }
}

/// Place every artifact, tolerating partial failure per artifact
///
/// An artifact that reached at least one destination turns its failed
/// destinations into warnings. An artifact that reached none makes the whole
/// placement fatal, and the error then carries every failure from every
/// artifact.
pub fn place_all(
    artifacts: &[DiscoveredArtifact],
    targets: &TargetSet,
) -> Result<(Vec<PathBuf>, Vec<PlacementFailure>), OrchestratorError> {
    let mut placed = Vec::new();
    let mut failures = Vec::new();
    let mut fatal = false;

    for artifact in artifacts {
        match place(artifact, targets) {
            Ok(paths) => placed.extend(paths),
            Err(e) => {
                fatal |= e.placed.is_empty();
                placed.extend(e.placed);
                failures.extend(e.failures);
            }
        }
    }

    if fatal {
        Err(OrchestratorError::Placement { failures })
    } else {
        Ok((placed, failures))
    }
}

fn describe_tool_error(error: &ToolError) -> String {
    match error.output() {
        Some(output) if !output.trim().is_empty() => format!("{error}\n{output}"),
        _ => error.to_string(),
    }
}

fn compile_error(step: &str, error: &ToolError) -> OrchestratorError {
    OrchestratorError::Compile {
        step: step.to_string(),
        output: describe_tool_error(error),
    }
}
