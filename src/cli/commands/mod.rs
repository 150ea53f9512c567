//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod discover;
pub mod doctor;
pub mod place;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::core::platform::Platform;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure, compile, and place the native extension
    Build(BuildArgs),

    /// List artifacts in the staging directory
    Discover {
        /// Staging directory to search
        #[arg(long, value_name = "DIR")]
        staging_dir: Option<PathBuf>,

        /// Artifact base name
        #[arg(long, value_name = "NAME")]
        artifact: Option<String>,

        /// Search root relative to the staging directory
        #[arg(long, value_name = "DIR")]
        search_root: Option<PathBuf>,
    },

    /// Copy one artifact into destination directories
    Place {
        /// Artifact file
        artifact: PathBuf,

        /// Destination directory (repeatable)
        #[arg(short, long = "dest", value_name = "DIR", required = true)]
        dest: Vec<PathBuf>,
    },

    /// Remove staging and build directories
    Clean,

    /// Check system dependencies
    Doctor,
}

/// Options of `wheelwright build`
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Python package directory name
    #[arg(short, long)]
    pub package: Option<String>,

    /// Artifact base name
    #[arg(short, long, value_name = "NAME")]
    pub artifact: Option<String>,

    /// Staging directory the build tool writes into
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Build directory (install prefix and target root)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Build tool program or path
    #[arg(long, value_name = "PROGRAM")]
    pub build_tool: Option<String>,

    /// Additional destination directory (repeatable)
    #[arg(short, long = "dest", value_name = "DIR")]
    pub dest: Vec<PathBuf>,

    /// Skip the install step
    #[arg(long)]
    pub no_install: bool,

    /// Do not place into the in-source package directory
    #[arg(long)]
    pub no_in_source: bool,

    /// Do not place into the build-cache directory
    #[arg(long)]
    pub no_build_cache: bool,

    /// Do not place into the wheel staging directory
    #[arg(long)]
    pub no_wheel_staging: bool,

    /// Number of parallel compile jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Extra configure arguments (whitespace separated, overrides MESON_ARGS)
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub meson_args: Option<String>,

    /// Fortran compiler (overrides FC)
    #[arg(long)]
    pub fc: Option<String>,

    /// C compiler (overrides CC)
    #[arg(long)]
    pub cc: Option<String>,

    /// Target interpreter version, e.g. 3.10 (probed from python3 if omitted)
    #[arg(long, env = "WHEELWRIGHT_PYTHON_VERSION", value_name = "X.Y")]
    pub python_version: Option<String>,

    /// Interpreter implementation used in build-cache names
    #[arg(long, value_name = "IMPL")]
    pub python_impl: Option<String>,

    /// Target platform (linux, macos, windows); defaults to the host
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Machine name used in directory names (defaults to the host)
    #[arg(long)]
    pub machine: Option<String>,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, project_dir: &Path) -> Result<()> {
        match self {
            Self::Build(args) => build::execute(project_dir, args).await,
            Self::Discover {
                staging_dir,
                artifact,
                search_root,
            } => discover::execute(project_dir, staging_dir, artifact, search_root).await,
            Self::Place { artifact, dest } => place::execute(project_dir, &artifact, &dest).await,
            Self::Clean => clean::execute(project_dir).await,
            Self::Doctor => doctor::execute(Some(project_dir)).await,
        }
    }
}
