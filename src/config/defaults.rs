//! Default configuration values

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "wheelwright.toml";

/// Default external build tool
pub const DEFAULT_BUILD_TOOL: &str = "meson";

/// Default package directory name
pub const DEFAULT_PACKAGE_NAME: &str = "ccblade";

/// Default artifact base name
pub const DEFAULT_ARTIFACT_BASE_NAME: &str = "_bem";

/// Default staging directory (relative to the project root)
pub const DEFAULT_STAGING_DIR: &str = "meson_build";

/// Default build directory (relative to the project root)
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default interpreter implementation used in build-cache directory names
pub const DEFAULT_PYTHON_IMPL: &str = "cpython";

/// Suffixes of loadable binaries
pub const PRIMARY_SUFFIXES: &[&str] = &[".so", ".pyd", ".dylib", ".dll"];

/// Suffixes of debug/link companions
pub const COMPANION_SUFFIXES: &[&str] = &[".lib", ".pdb"];

/// Environment variable carrying pass-through configure arguments
pub const ENV_EXTRA_ARGS: &str = "MESON_ARGS";

/// Environment variable selecting the Fortran compiler
pub const ENV_FORTRAN_COMPILER: &str = "FC";

/// Environment variable selecting the C compiler
pub const ENV_C_COMPILER: &str = "CC";

/// Fortran compiler filled in on Windows when none is set
pub const WINDOWS_DEFAULT_FC: &str = "gfortran";

/// C compiler filled in on Windows when none is set
pub const WINDOWS_DEFAULT_CC: &str = "gcc";

/// Extension of the lock file kept next to the staging directory
pub const LOCK_EXTENSION: &str = "lock";
