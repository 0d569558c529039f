//! Cloud access key endpoints.
//!
//! Access keys authenticate the CDN towards cloud origins. An export needs
//! the key itself (its group/contract assignment decides where the
//! Terraform resource lands) and its versions, which map to the
//! `credential_a`/`credential_b` blocks.

use crate::client::EdgeClient;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An access key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    /// Unique numeric id
    pub access_key_uid: i64,
    /// Display name
    pub access_key_name: String,
    /// Signing scheme, e.g. `AWS4-HMAC-SHA256`
    pub authentication_method: String,
    /// Groups the key is assigned to
    #[serde(default)]
    pub groups: Vec<KeyGroup>,
    /// Network scoping, when configured
    #[serde(default)]
    pub network_configuration: Option<NetworkConfiguration>,
}

impl AccessKey {
    /// First group/contract assignment, required for export.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoGroup` when the key has no assignment.
    pub fn primary_group(&self) -> Result<&KeyGroup> {
        self.groups.first().ok_or(Error::NoGroup {
            uid: self.access_key_uid,
        })
    }
}

/// One group assignment of an access key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGroup {
    /// Group id
    pub group_id: i64,
    /// Contracts reachable through the group
    #[serde(default)]
    pub contract_ids: Vec<String>,
}

/// Network scoping of an access key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    /// STANDARD_TLS or ENHANCED_TLS
    pub security_network: String,
    /// Additional CDN, when enabled
    #[serde(default)]
    pub additional_cdn: Option<String>,
}

/// One version of an access key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyVersion {
    /// Version number, ascending over time
    pub version: u32,
    /// Cloud-side key id, absent while a version is still deploying
    #[serde(default)]
    pub cloud_access_key_id: Option<String>,
}

/// Cloud-access surface of the management API.
pub trait CloudAccessApi: Send + Sync {
    /// Fetch an access key.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when the uid does not exist.
    fn get_access_key(&self, uid: i64) -> Result<AccessKey>;

    /// List an access key's versions.
    fn list_key_versions(&self, uid: i64) -> Result<Vec<AccessKeyVersion>>;
}

impl CloudAccessApi for EdgeClient {
    fn get_access_key(&self, uid: i64) -> Result<AccessKey> {
        let path = format!("/cam/v1/access-keys/{uid}");
        self.get_json(&path).map_err(|err| match err {
            Error::Http {
                status: Some(404), ..
            } => Error::NotFound {
                kind: "access key",
                name: uid.to_string(),
            },
            other => other,
        })
    }

    fn list_key_versions(&self, uid: i64) -> Result<Vec<AccessKeyVersion>> {
        let path = format!("/cam/v1/access-keys/{uid}/versions");
        let response: WireVersions = self.get_json(&path)?;
        Ok(response.access_key_versions)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVersions {
    access_key_versions: Vec<AccessKeyVersion>,
}

// =============================================================================
// Mock
// =============================================================================

/// In-memory cloud-access API for tests.
#[derive(Debug, Clone, Default)]
pub struct MockCloudAccess {
    keys: Arc<Mutex<HashMap<i64, AccessKey>>>,
    versions: Arc<Mutex<HashMap<i64, Vec<AccessKeyVersion>>>>,
}

impl MockCloudAccess {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an access key.
    pub fn add_key(&mut self, key: AccessKey) {
        let mut keys = self.keys.lock().unwrap();
        keys.insert(key.access_key_uid, key);
    }

    /// Register a version for a key.
    pub fn add_version(&mut self, uid: i64, version: AccessKeyVersion) {
        let mut versions = self.versions.lock().unwrap();
        versions.entry(uid).or_default().push(version);
    }
}

impl CloudAccessApi for MockCloudAccess {
    fn get_access_key(&self, uid: i64) -> Result<AccessKey> {
        let keys = self.keys.lock().unwrap();
        keys.get(&uid).cloned().ok_or_else(|| Error::NotFound {
            kind: "access key",
            name: uid.to_string(),
        })
    }

    fn list_key_versions(&self, uid: i64) -> Result<Vec<AccessKeyVersion>> {
        let versions = self.versions.lock().unwrap();
        Ok(versions.get(&uid).cloned().unwrap_or_default())
    }
}
