//! Meson build tool adapter
//!
//! Runs `meson setup`, `meson compile` and `meson install` as child
//! processes. Output is captured so a failure can be surfaced verbatim.
//!
//! `--wipe` is never passed: the orchestrator hands over a freshly emptied
//! staging directory, and Meson refuses `--wipe` on a directory that holds no
//! previous build tree.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::defaults::DEFAULT_BUILD_TOOL;
use crate::core::builder::{BuildTool, ConfigureRequest, ToolContext, ToolOutput};
use crate::error::ToolError;
use crate::infra::toolchain::{extract_version, locate, run_captured};

/// Meson invoked through a program name or path
#[derive(Debug, Clone)]
pub struct MesonTool {
    program: String,
}

impl MesonTool {
    /// Create a Meson adapter for a program name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments of the setup call
    pub fn setup_args(request: &ConfigureRequest<'_>) -> Vec<String> {
        let lib_dir = request.lib_dir.display();
        let mut args = vec![
            "setup".to_string(),
            request.staging_dir.display().to_string(),
            format!("-Dpython.purelibdir={lib_dir}"),
            format!("--prefix={}", request.prefix.display()),
            format!("-Dpython.platlibdir={lib_dir}"),
        ];
        args.extend(
            request
                .extra_args
                .iter()
                .filter(|a| !a.trim().is_empty())
                .cloned(),
        );
        args
    }

    /// Arguments of the compile call
    pub fn compile_args(staging_dir: &Path, jobs: Option<usize>) -> Vec<String> {
        let mut args = vec![
            "compile".to_string(),
            "-vC".to_string(),
            staging_dir.display().to_string(),
        ];
        if let Some(jobs) = jobs {
            args.push("-j".to_string());
            args.push(jobs.to_string());
        }
        args
    }

    /// Arguments of the install call
    pub fn install_args(staging_dir: &Path) -> Vec<String> {
        vec![
            "install".to_string(),
            "-C".to_string(),
            staging_dir.display().to_string(),
        ]
    }

    fn resolve(&self) -> Result<PathBuf, ToolError> {
        locate(&self.program)
    }

    fn invoke(&self, ctx: &ToolContext<'_>, args: &[String]) -> Result<ToolOutput, ToolError> {
        let path = self.resolve()?;
        let command_line = format!("{} {}", self.program, args.join(" "));
        tracing::debug!("Running: {command_line}");

        let mut command = Command::new(path);
        command.args(args).current_dir(ctx.source_dir).envs(ctx.env);

        let output = run_captured(&mut command, &command_line)?;
        Ok(ToolOutput {
            command: command_line,
            output,
        })
    }
}

impl Default for MesonTool {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_TOOL)
    }
}

impl BuildTool for MesonTool {
    fn program(&self) -> &str {
        &self.program
    }

    fn probe_version(&self, ctx: &ToolContext<'_>) -> Result<String, ToolError> {
        let out = self.invoke(ctx, &["--version".to_string()])?;
        Ok(extract_version(&out.output).unwrap_or_else(|| out.output.trim().to_string()))
    }

    fn setup(
        &self,
        ctx: &ToolContext<'_>,
        request: &ConfigureRequest<'_>,
    ) -> Result<ToolOutput, ToolError> {
        self.invoke(ctx, &Self::setup_args(request))
    }

    fn compile(
        &self,
        ctx: &ToolContext<'_>,
        staging_dir: &Path,
        jobs: Option<usize>,
    ) -> Result<ToolOutput, ToolError> {
        self.invoke(ctx, &Self::compile_args(staging_dir, jobs))
    }

    fn install(&self, ctx: &ToolContext<'_>, staging_dir: &Path) -> Result<ToolOutput, ToolError> {
        self.invoke(ctx, &Self::install_args(staging_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_setup_args_order() {
        let extra = vec!["-Dbuildtype=release".to_string(), " ".to_string()];
        let request = ConfigureRequest {
            staging_dir: Path::new("/p/meson_build"),
            prefix: Path::new("/p/build"),
            lib_dir: Path::new("/p/build/lib.linux-x86_64-cpython-310"),
            extra_args: &extra,
        };

        assert_eq!(
            MesonTool::setup_args(&request),
            vec![
                "setup",
                "/p/meson_build",
                "-Dpython.purelibdir=/p/build/lib.linux-x86_64-cpython-310",
                "--prefix=/p/build",
                "-Dpython.platlibdir=/p/build/lib.linux-x86_64-cpython-310",
                "-Dbuildtype=release",
            ]
        );
    }

    #[test]
    fn test_compile_args() {
        assert_eq!(
            MesonTool::compile_args(Path::new("/p/meson_build"), None),
            vec!["compile", "-vC", "/p/meson_build"]
        );
        assert_eq!(
            MesonTool::compile_args(Path::new("/p/meson_build"), Some(8)),
            vec!["compile", "-vC", "/p/meson_build", "-j", "8"]
        );
    }

    #[test]
    fn test_install_args() {
        assert_eq!(
            MesonTool::install_args(Path::new("/p/meson_build")),
            vec!["install", "-C", "/p/meson_build"]
        );
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let tool = MesonTool::new("wheelwright-no-such-meson");
        let env = BTreeMap::new();
        let ctx = ToolContext {
            source_dir: Path::new("."),
            env: &env,
        };
        assert!(matches!(
            tool.probe_version(&ctx),
            Err(ToolError::NotFound { .. })
        ));
    }
}
