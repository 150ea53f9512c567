//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate an artifact base name (optionally underscore-prefixed)
    pub fn base_name() -> impl Strategy<Value = String> {
        "_?[a-z][a-z0-9_]{0,12}"
    }

    /// Generate an optional ABI tag segment such as `.cpython-310-x86_64-linux-gnu`
    pub fn abi_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just(".cpython-310-x86_64-linux-gnu".to_string()),
            Just(".cp311-win_amd64".to_string()),
            Just(".cpython-312-darwin".to_string()),
            "\\.[a-z0-9_-]{1,20}",
        ]
    }

    /// Generate a file extension no artifact ever uses
    pub fn foreign_extension() -> impl Strategy<Value = String> {
        "\\.(c|o|txt|json|a|h|p|so\\.1|pyc|exe)"
    }

    /// Generate a single `-Dkey=value` build option
    pub fn build_option() -> impl Strategy<Value = String> {
        "-D[a-z_]{1,10}=[a-z0-9]{0,6}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_base_name_generator(name in base_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.contains('.'));
        }

        #[test]
        fn test_abi_tag_generator(tag in abi_tag()) {
            prop_assert!(tag.is_empty() || tag.starts_with('.'));
        }

        #[test]
        fn test_build_option_generator(opt in build_option()) {
            prop_assert!(opt.starts_with("-D"));
            prop_assert!(opt.contains('='));
        }
    }
}
