//! Build environment setup
//!
//! Toolchain selection and pass-through arguments for the external build.
//! Values are read from the process environment exactly once, at the process
//! boundary, and then travel as an explicit [`BuildEnvironment`]. Platform
//! defaults only fill in settings that are absent; the process environment
//! itself is never modified.

use std::collections::BTreeMap;

use crate::config::defaults::{
    ENV_C_COMPILER, ENV_EXTRA_ARGS, ENV_FORTRAN_COMPILER, WINDOWS_DEFAULT_CC, WINDOWS_DEFAULT_FC,
};
use crate::core::extra_args::parse_extra_args;
use crate::core::platform::Platform;
use crate::error::ExtraArgsError;

/// Toolchain and argument settings for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    /// Fortran compiler (`FC`)
    pub fc: Option<String>,
    /// C compiler (`CC`)
    pub cc: Option<String>,
    /// Pass-through configure arguments
    pub extra_args: Vec<String>,
    /// Additional environment variables for the build tool
    pub extra_env: BTreeMap<String, String>,
}

impl BuildEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings through a variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExtraArgsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let extra_args = match non_empty(ENV_EXTRA_ARGS) {
            Some(raw) => parse_extra_args(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            fc: non_empty(ENV_FORTRAN_COMPILER),
            cc: non_empty(ENV_C_COMPILER),
            extra_args,
            extra_env: BTreeMap::new(),
        })
    }

    /// Read settings from the process environment
    pub fn from_process_env() -> Result<Self, ExtraArgsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Set the Fortran compiler
    #[must_use]
    pub fn with_fc(mut self, fc: impl Into<String>) -> Self {
        self.fc = Some(fc.into());
        self
    }

    /// Set the C compiler
    #[must_use]
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    /// Append pass-through arguments
    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an extra environment variable
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.extra_env.insert(key.to_string(), value.to_string());
        self
    }

    /// Fill in platform toolchain defaults for unset values
    ///
    /// On the Windows family a missing Fortran compiler becomes `gfortran`
    /// and a missing C compiler becomes `gcc`. Explicit settings are kept.
    #[must_use]
    pub fn with_platform_defaults(mut self, platform: Platform) -> Self {
        if platform.is_windows_family() {
            if self.fc.is_none() {
                self.fc = Some(WINDOWS_DEFAULT_FC.to_string());
            }
            if self.cc.is_none() {
                self.cc = Some(WINDOWS_DEFAULT_CC.to_string());
            }
        }
        self
    }

    /// Merge lower-priority settings, keeping every value already set here
    #[must_use]
    pub fn or(mut self, fallback: Self) -> Self {
        self.fc = self.fc.or(fallback.fc);
        self.cc = self.cc.or(fallback.cc);
        if self.extra_args.is_empty() {
            self.extra_args = fallback.extra_args;
        }
        for (key, value) in fallback.extra_env {
            self.extra_env.entry(key).or_insert(value);
        }
        self
    }

    /// Environment variables to set on the build tool process
    pub fn to_env_map(&self) -> BTreeMap<String, String> {
        let mut env = self.extra_env.clone();
        if let Some(ref fc) = self.fc {
            env.insert(ENV_FORTRAN_COMPILER.to_string(), fc.clone());
        }
        if let Some(ref cc) = self.cc {
            env.insert(ENV_C_COMPILER.to_string(), cc.clone());
        }
        env
    }
}
