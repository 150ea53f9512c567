//! Pass-through configure arguments
//!
//! Extra arguments arrive as one free-form string (usually `MESON_ARGS`).
//! They are split on whitespace with blank tokens dropped. Tokens that would
//! override an option wheelwright sets itself are rejected: silently letting
//! them through would make the configure call contradict the target set.

use crate::error::ExtraArgsError;

/// Options whose value the orchestrator owns
pub const MANAGED_OPTIONS: &[&str] = &[
    "--prefix",
    "-Dpython.purelibdir",
    "-Dpython.platlibdir",
    "--wipe",
    "--reconfigure",
];

/// Split a whitespace-separated argument string
pub fn parse_extra_args(raw: &str) -> Result<Vec<String>, ExtraArgsError> {
    raw.split_whitespace()
        .map(|token| {
            validate_token(token)?;
            Ok(token.to_string())
        })
        .collect()
}

/// Check an already-split token list
pub fn validate_extra_args(args: &[String]) -> Result<(), ExtraArgsError> {
    args.iter()
        .filter(|a| !a.trim().is_empty())
        .try_for_each(|a| validate_token(a))
}

fn validate_token(token: &str) -> Result<(), ExtraArgsError> {
    if token.contains('\0') {
        return Err(ExtraArgsError::NulByte {
            token: token.escape_default().to_string(),
        });
    }

    for option in MANAGED_OPTIONS {
        let overrides = token == *option
            || token
                .strip_prefix(option)
                .is_some_and(|rest| rest.starts_with('='));
        if overrides {
            return Err(ExtraArgsError::ManagedOption {
                token: token.to_string(),
                option: (*option).to_string(),
            });
        }
    }

    Ok(())
}
