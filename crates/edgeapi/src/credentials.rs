//! Credentials file loading.
//!
//! Credentials live in a TOML file with one table per section, so one file
//! can hold several accounts:
//!
//! ```toml
//! [default]
//! host = "api.cdn.example.net"
//! token = "cdn_tok_..."
//!
//! [staging]
//! host = "api.staging.cdn.example.net"
//! token = "cdn_tok_..."
//! account_key = "ACC-1-234"
//! ```
//!
//! `TFPORT_HOST` and `TFPORT_TOKEN` override the loaded fields, which keeps
//! CI setups away from files on disk.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// Section used when the caller names none.
pub const DEFAULT_SECTION: &str = "default";

/// Environment variable overriding the API host.
pub const ENV_HOST: &str = "TFPORT_HOST";

/// Environment variable overriding the API token.
pub const ENV_TOKEN: &str = "TFPORT_TOKEN";

/// One section of the credentials file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// API hostname, with or without an explicit scheme
    pub host: String,
    /// Bearer token
    pub token: String,
    /// Account switch key for multi-account tokens
    #[serde(default)]
    pub account_key: Option<String>,
}

impl Credentials {
    /// Base URL for requests: `host` as-is when it carries a scheme
    /// (useful against local test servers), `https://host` otherwise.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}

/// Load one section from a credentials file and apply env overrides.
pub fn load(path: &Path, section: &str) -> Result<Credentials> {
    let text = fs::read_to_string(path).map_err(|err| {
        Error::Credentials(format!("cannot read {}: {err}", path.display()))
    })?;
    let sections: BTreeMap<String, Credentials> = toml::from_str(&text)
        .map_err(|err| Error::Credentials(format!("cannot parse {}: {err}", path.display())))?;

    let mut credentials = sections.get(section).cloned().ok_or_else(|| {
        Error::Credentials(format!(
            "section [{section}] not found in {}",
            path.display()
        ))
    })?;
    apply_env_overrides(&mut credentials);
    Ok(credentials)
}

fn apply_env_overrides(credentials: &mut Credentials) {
    override_fields(
        credentials,
        env::var(ENV_HOST).ok(),
        env::var(ENV_TOKEN).ok(),
    );
}

fn override_fields(credentials: &mut Credentials, host: Option<String>, token: Option<String>) {
    if let Some(host) = host
        && !host.is_empty()
    {
        credentials.host = host;
    }
    if let Some(token) = token
        && !token.is_empty()
    {
        credentials.token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_credentials(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("credentials.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_default_section() {
        let dir = TempDir::new().unwrap();
        let path = write_credentials(
            &dir,
            "[default]\nhost = \"api.cdn.example.net\"\ntoken = \"tok\"\n",
        );

        let credentials = load(&path, DEFAULT_SECTION).unwrap();
        assert_eq!(credentials.host, "api.cdn.example.net");
        assert_eq!(credentials.token, "tok");
        assert_eq!(credentials.account_key, None);
    }

    #[test]
    fn test_load_named_section_with_account_key() {
        let dir = TempDir::new().unwrap();
        let path = write_credentials(
            &dir,
            "[default]\nhost = \"a\"\ntoken = \"t\"\n\n\
             [staging]\nhost = \"b\"\ntoken = \"u\"\naccount_key = \"ACC-1-234\"\n",
        );

        let credentials = load(&path, "staging").unwrap();
        assert_eq!(credentials.host, "b");
        assert_eq!(credentials.account_key.as_deref(), Some("ACC-1-234"));
    }

    #[test]
    fn test_missing_section_is_credentials_error() {
        let dir = TempDir::new().unwrap();
        let path = write_credentials(&dir, "[default]\nhost = \"a\"\ntoken = \"t\"\n");

        let err = load(&path, "prod").unwrap_err();
        match err {
            Error::Credentials(msg) => assert!(msg.contains("[prod]")),
            _ => panic!("expected Error::Credentials"),
        }
    }

    #[test]
    fn test_missing_file_is_credentials_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.toml"), DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, Error::Credentials(_)));
    }

    #[test]
    fn test_base_url_adds_scheme() {
        let credentials = Credentials {
            host: "api.cdn.example.net".to_string(),
            token: "t".to_string(),
            account_key: None,
        };
        assert_eq!(credentials.base_url(), "https://api.cdn.example.net");
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let credentials = Credentials {
            host: "http://127.0.0.1:8080/".to_string(),
            token: "t".to_string(),
            account_key: None,
        };
        assert_eq!(credentials.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_override_fields() {
        let mut credentials = Credentials {
            host: "file-host".to_string(),
            token: "file-token".to_string(),
            account_key: None,
        };
        override_fields(
            &mut credentials,
            Some("env-host".to_string()),
            Some(String::new()),
        );
        assert_eq!(credentials.host, "env-host");
        // Empty values never override
        assert_eq!(credentials.token, "file-token");
    }
}
