//! Target sets
//!
//! A [`TargetSet`] is the ordered list of directories every artifact is
//! copied into. The canonical members mirror what a setuptools-driven wheel
//! build reads from: the in-source package directory (for in-place imports),
//! the `build/lib.*` cache that `build_ext` populates, and the
//! `build/bdist.*/wheel` staging tree that `bdist_wheel` archives.

use std::path::{Path, PathBuf};

use crate::core::platform::PlatformTag;

/// Ordered, de-duplicated destination directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    dirs: Vec<PathBuf>,
}

impl TargetSet {
    /// Create an empty target set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a destination, ignoring duplicates
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Add a destination (builder form)
    #[must_use]
    pub fn with(mut self, dir: impl Into<PathBuf>) -> Self {
        self.push(dir);
        self
    }

    /// Destination directories in placement order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Number of destinations
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether there are no destinations
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl FromIterator<PathBuf> for TargetSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = Self::new();
        for dir in iter {
            set.push(dir);
        }
        set
    }
}

/// Which canonical destinations to include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalTargets {
    /// `<project>/<package>`
    pub in_source: bool,
    /// `<build>/lib.<plat>-<impl>-<ver>/<package>`
    pub build_cache: bool,
    /// `<build>/bdist.<plat>/wheel/<package>`
    pub wheel_staging: bool,
}

impl Default for CanonicalTargets {
    fn default() -> Self {
        Self {
            in_source: true,
            build_cache: true,
            wheel_staging: true,
        }
    }
}

/// Build-cache library directory (the configure step's target libdir)
pub fn build_lib_dir(build_dir: &Path, tag: &PlatformTag) -> PathBuf {
    build_dir.join(tag.build_lib_dir_name())
}

/// Compute the target set for a package build
pub fn canonical_target_set(
    project_dir: &Path,
    build_dir: &Path,
    package: &str,
    tag: &PlatformTag,
    include: CanonicalTargets,
) -> TargetSet {
    let mut set = TargetSet::new();

    if include.in_source {
        set.push(project_dir.join(package));
    }
    if include.build_cache {
        set.push(build_lib_dir(build_dir, tag).join(package));
    }
    if include.wheel_staging {
        set.push(
            build_dir
                .join(tag.bdist_dir_name())
                .join("wheel")
                .join(package),
        );
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Platform;

    fn tag() -> PlatformTag {
        PlatformTag {
            platform: Platform::Linux,
            machine: "x86_64".to_string(),
            implementation: "cpython".to_string(),
            python_version: "3.10".to_string(),
        }
    }

    #[test]
    fn test_canonical_targets() {
        let set = canonical_target_set(
            Path::new("/proj"),
            Path::new("/proj/build"),
            "ccblade",
            &tag(),
            CanonicalTargets::default(),
        );

        assert_eq!(
            set.dirs(),
            &[
                PathBuf::from("/proj/ccblade"),
                PathBuf::from("/proj/build/lib.linux-x86_64-cpython-310/ccblade"),
                PathBuf::from("/proj/build/bdist.linux-x86_64/wheel/ccblade"),
            ]
        );
    }

    #[test]
    fn test_canonical_targets_can_be_excluded() {
        let set = canonical_target_set(
            Path::new("/proj"),
            Path::new("/proj/build"),
            "ccblade",
            &tag(),
            CanonicalTargets {
                in_source: true,
                build_cache: false,
                wheel_staging: false,
            },
        );
        assert_eq!(set.dirs(), &[PathBuf::from("/proj/ccblade")]);
    }

    #[test]
    fn test_push_deduplicates() {
        let set = TargetSet::new().with("/a").with("/b").with("/a");
        assert_eq!(set.len(), 2);
        assert_eq!(set.dirs()[0], PathBuf::from("/a"));
    }
}
