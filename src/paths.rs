//! Centralized path resolution for tfport
//!
//! This module resolves the credentials file and section with environment
//! variable support, so CI jobs and shell profiles can point every
//! invocation at the right account without repeating flags.
//!
//! # Environment Variables
//!
//! - `TFPORT_CREDENTIALS` - Override credentials file path
//! - `TFPORT_SECTION` - Override credentials section
//!
//! # Path Resolution Priority
//!
//! For credentials_file():
//! 1. `--credentials` flag
//! 2. `TFPORT_CREDENTIALS` environment variable
//! 3. Default: `~/.config/tfport/credentials.toml`
//!
//! For section():
//! 1. `--section` flag
//! 2. `TFPORT_SECTION` environment variable
//! 3. Default: `default`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for credentials file override
pub const ENV_CREDENTIALS: &str = "TFPORT_CREDENTIALS";

/// Environment variable for credentials section override
pub const ENV_SECTION: &str = "TFPORT_SECTION";

/// Get the credentials file path
///
/// Priority:
/// 1. `--credentials` flag
/// 2. `TFPORT_CREDENTIALS` env var
/// 3. Default: `~/.config/tfport/credentials.toml`
pub fn credentials_file(flag: Option<&str>) -> Result<PathBuf> {
    // 1. Check flag
    if let Some(flag) = flag {
        return Ok(expand(flag));
    }

    // 2. Check environment variable override
    if let Ok(dir) = std::env::var(ENV_CREDENTIALS)
        && !dir.is_empty()
    {
        let path = expand(&dir);
        log::debug!(
            "Using credentials file from {}: {}",
            ENV_CREDENTIALS,
            path.display()
        );
        return Ok(path);
    }

    // 3. Default: ~/.config/tfport/credentials.toml
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("tfport").join("credentials.toml");
    log::debug!("Using default credentials file: {}", path.display());
    Ok(path)
}

/// Get the credentials section name
///
/// Priority:
/// 1. `--section` flag
/// 2. `TFPORT_SECTION` env var
/// 3. Default: `default`
pub fn section(flag: Option<&str>) -> String {
    if let Some(flag) = flag {
        return flag.to_string();
    }

    if let Ok(name) = std::env::var(ENV_SECTION)
        && !name.is_empty()
    {
        log::debug!("Using section from {}: {}", ENV_SECTION, name);
        return name;
    }

    edgeapi::credentials::DEFAULT_SECTION.to_string()
}

/// Expand ~ and environment variables in a path string.
///
/// This is the canonical path expansion function for tfport; the work-dir
/// and credentials flags both go through it.
///
/// # Examples
///
/// ```ignore
/// // Expands ~ to home directory
/// let creds = paths::expand("~/cdn/credentials.toml");
///
/// // Expands environment variables
/// let work = paths::expand("$HOME/terraform/zones");
/// ```
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    /// Helper to run a test with env var removed
    ///
    /// # Safety
    /// This function uses unsafe env::remove_var/set_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: Tests run in isolation
            unsafe { env::set_var(key, v) };
        }
        result
    }

    // All assertions touching one env var sit in one test; parallel tests
    // sharing a process-global var would race otherwise.

    #[test]
    fn test_credentials_resolution_priority() {
        with_env_var(ENV_CREDENTIALS, "/from/env.toml", || {
            // Flag beats env
            let result = credentials_file(Some("/from/flag.toml")).unwrap();
            assert_eq!(result, PathBuf::from("/from/flag.toml"));

            // Env beats default
            let result = credentials_file(None).unwrap();
            assert_eq!(result, PathBuf::from("/from/env.toml"));
        });

        let home = dirs::home_dir().unwrap();
        with_env_var(ENV_CREDENTIALS, "~/cdn/credentials-tilde-test.toml", || {
            // Env value goes through tilde expansion
            let result = credentials_file(None).unwrap();
            assert_eq!(result, home.join("cdn").join("credentials-tilde-test.toml"));
        });

        without_env_var(ENV_CREDENTIALS, || {
            let result = credentials_file(None).unwrap();
            assert_eq!(
                result,
                home.join(".config").join("tfport").join("credentials.toml")
            );
        });
    }

    #[test]
    fn test_section_resolution_priority() {
        with_env_var(ENV_SECTION, "staging", || {
            assert_eq!(section(Some("flag-section")), "flag-section");
            assert_eq!(section(None), "staging");
        });

        // Empty env value falls through to the default
        with_env_var(ENV_SECTION, "", || {
            assert_eq!(section(None), "default");
        });

        without_env_var(ENV_SECTION, || {
            assert_eq!(section(None), "default");
        });
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_absolute() {
        let result = expand("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_with_env_var() {
        with_env_var("TFPORT_TEST_VAR", "test_value", || {
            let result = expand("/path/$TFPORT_TEST_VAR/file");
            assert_eq!(result, PathBuf::from("/path/test_value/file"));
        });
    }

    #[test]
    fn test_env_var_constants() {
        assert_eq!(ENV_CREDENTIALS, "TFPORT_CREDENTIALS");
        assert_eq!(ENV_SECTION, "TFPORT_SECTION");
    }
}
