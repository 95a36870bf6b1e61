//! # Runtime Configuration Module
//!
//! Router behaviour that operators may want to change without a rebuild.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Effect |
//! |----------|---------|--------|
//! | `ROUGH_REDIRECT_TRAILING_SLASH` | `true` | Redirect `/foo/` to `/foo` (or back) when only the sibling is registered |
//! | `ROUGH_REDIRECT_FIXED_PATH` | `false` | Redirect to the case-insensitive correction of an unmatched path |
//! | `ROUGH_UNESCAPE_PATH_VALUES` | `false` | Percent-decode captured parameter values |
//!
//! Booleans accept `1/true/yes/on` and `0/false/no/off` (case-insensitive).
//! Anything else keeps the default.
//!
//! ## Usage
//!
//! ```rust
//! use rough_router::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("trailing slash redirects: {}", config.redirect_trailing_slash);
//! ```
//!
//! The same settings can come from a TOML document, e.g. a `[router]` section
//! extracted by the application:
//!
//! ```toml
//! redirect_trailing_slash = true
//! redirect_fixed_path = true
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::env;

pub const ENV_REDIRECT_TRAILING_SLASH: &str = "ROUGH_REDIRECT_TRAILING_SLASH";
pub const ENV_REDIRECT_FIXED_PATH: &str = "ROUGH_REDIRECT_FIXED_PATH";
pub const ENV_UNESCAPE_PATH_VALUES: &str = "ROUGH_UNESCAPE_PATH_VALUES";

/// Router settings, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Redirect when only the trailing-slash sibling of a path is registered
    pub redirect_trailing_slash: bool,
    /// Redirect to the case-corrected path when a case-insensitive match exists
    pub redirect_fixed_path: bool,
    /// Percent-decode captured parameter values
    pub unescape_path_values: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            redirect_fixed_path: false,
            unescape_path_values: false,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(default)
        };

        Self {
            redirect_trailing_slash: flag(
                ENV_REDIRECT_TRAILING_SLASH,
                defaults.redirect_trailing_slash,
            ),
            redirect_fixed_path: flag(ENV_REDIRECT_FIXED_PATH, defaults.redirect_fixed_path),
            unescape_path_values: flag(ENV_UNESCAPE_PATH_VALUES, defaults.unescape_path_values),
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys or non-boolean values.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("Failed to parse router configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert!(config.redirect_trailing_slash);
        assert!(!config.redirect_fixed_path);
        assert!(!config.unescape_path_values);
    }

    #[test]
    fn test_from_lookup() {
        let env = vars(&[
            (ENV_REDIRECT_TRAILING_SLASH, "off"),
            (ENV_REDIRECT_FIXED_PATH, "YES"),
            (ENV_UNESCAPE_PATH_VALUES, "1"),
        ]);
        let config = RouterConfig::from_lookup(|k| env.get(k).cloned());
        assert!(!config.redirect_trailing_slash);
        assert!(config.redirect_fixed_path);
        assert!(config.unescape_path_values);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let env = vars(&[(ENV_REDIRECT_TRAILING_SLASH, "maybe")]);
        let config = RouterConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_from_toml() {
        let config = RouterConfig::from_toml_str("redirect_fixed_path = true\n").unwrap();
        assert!(config.redirect_trailing_slash);
        assert!(config.redirect_fixed_path);

        assert!(RouterConfig::from_toml_str("redirect_fixed_path = \"yes\"").is_err());
        assert!(RouterConfig::from_toml_str("unknown = true").is_err());
    }
}
