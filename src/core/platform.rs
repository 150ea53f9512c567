//! Platform identification
//!
//! Names the operating system family (which drives toolchain defaults) and
//! the platform tag used to build distutils-style directory names such as
//! `lib.linux-x86_64-cpython-310`.

use crate::config::defaults::DEFAULT_PYTHON_IMPL;

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux and other ELF Unixes
    Linux,
    /// macOS
    MacOs,
    /// Windows family
    Windows,
    /// Anything else
    Other,
}

impl Platform {
    /// Platform of the running process
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a Rust `target_os` name
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Whether toolchain defaults for Windows apply
    pub fn is_windows_family(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Lowercase system name as Python's `platform.system()` reports it
    pub fn system_name(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "darwin",
            Self::Windows => "windows",
            Self::Other => std::env::consts::OS,
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(format!(
                "unknown platform '{other}' (expected linux, macos or windows)"
            )),
        }
    }
}

/// Platform and interpreter information used to name target directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTag {
    /// Operating system family
    pub platform: Platform,
    /// Machine name (e.g. `x86_64`, `arm64`, `AMD64`)
    pub machine: String,
    /// Interpreter implementation (e.g. `cpython`)
    pub implementation: String,
    /// Interpreter version as `major.minor`
    pub python_version: String,
}

impl PlatformTag {
    /// Tag for the host platform with the given interpreter version
    pub fn host(python_version: impl Into<String>) -> Self {
        let platform = Platform::host();
        Self {
            platform,
            machine: host_machine(platform).to_string(),
            implementation: DEFAULT_PYTHON_IMPL.to_string(),
            python_version: python_version.into(),
        }
    }

    /// Override the machine name
    #[must_use]
    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = machine.into();
        self
    }

    /// Override the interpreter implementation
    #[must_use]
    pub fn with_implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = implementation.into();
        self
    }

    /// Override the platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// `major` and `minor` joined without a dot (`3.10` -> `310`)
    pub fn version_nodot(&self) -> String {
        self.python_version.split('.').take(2).collect()
    }

    /// `<system>-<machine>`
    pub fn plat_name(&self) -> String {
        format!("{}-{}", self.platform.system_name(), self.machine)
    }

    /// Build-cache directory name, e.g. `lib.linux-x86_64-cpython-310`
    pub fn build_lib_dir_name(&self) -> String {
        format!(
            "lib.{}-{}-{}",
            self.plat_name(),
            self.implementation.to_lowercase(),
            self.version_nodot()
        )
    }

    /// Wheel staging directory name, e.g. `bdist.linux-x86_64`
    pub fn bdist_dir_name(&self) -> String {
        format!("bdist.{}", self.plat_name())
    }
}

/// Machine name in the spelling Python's `platform.machine()` uses
fn host_machine(platform: Platform) -> &'static str {
    match (platform, std::env::consts::ARCH) {
        (Platform::MacOs, "aarch64") => "arm64",
        (Platform::Windows, "x86_64") => "AMD64",
        (Platform::Windows, "aarch64") => "ARM64",
        (_, arch) => arch,
    }
}
