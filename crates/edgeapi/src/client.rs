//! HTTP client for the management API.
//!
//! One blocking [`ureq::Agent`] shared by all API surfaces. Requests are
//! bearer-authenticated; tokens with access to several accounts pass the
//! active one through the `accountSwitchKey` query parameter.

use crate::credentials::Credentials;
use crate::error::Result;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("tfport/", env!("CARGO_PKG_VERSION"));

/// Blocking client carrying agent, base URL, and auth.
pub struct EdgeClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    account_key: Option<String>,
}

impl EdgeClient {
    /// Create a client from loaded credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: credentials.base_url(),
            token: credentials.token.clone(),
            account_key: credentials.account_key.clone(),
        }
    }

    /// The resolved base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full request URL, appending the account switch key when set.
    pub(crate) fn url(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(key) = &self.account_key {
            let separator = if path.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str("accountSwitchKey=");
            url.push_str(key);
        }
        url
    }

    /// GET a JSON payload.
    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let payload = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Authorization", &format!("Bearer {}", self.token))
            .call()?
            .body_mut()
            .read_json()?;
        Ok(payload)
    }
}
