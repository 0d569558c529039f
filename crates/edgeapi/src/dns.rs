//! Edge DNS zone endpoints.
//!
//! Covers the surface a zone export needs: zone metadata, the record names
//! under a zone, the types under a name, and full recordset data.
//!
//! # Testing
//!
//! Use [`MockDns`] for tests without network access:
//!
//! ```
//! use edgeapi::dns::{DnsApi, MockDns, Recordset};
//!
//! let mut mock = MockDns::new();
//! mock.add_recordset(
//!     "example.com",
//!     Recordset {
//!         name: "www.example.com".to_string(),
//!         rtype: "A".to_string(),
//!         ttl: 300,
//!         rdata: vec!["192.0.2.10".to_string()],
//!     },
//! );
//!
//! let names = mock.list_record_names("example.com").unwrap();
//! assert_eq!(names, vec!["www.example.com"]);
//! ```

use crate::client::EdgeClient;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Zone metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Zone name, lowercase
    pub zone: String,
    /// PRIMARY or SECONDARY
    pub kind: String,
    /// Operator comment, if any
    pub comment: Option<String>,
    /// Whether DNSSEC sign-and-serve is enabled
    pub sign_and_serve: bool,
    /// Contract the zone bills against
    pub contract_id: String,
    /// Master addresses (secondary zones only)
    pub masters: Vec<String>,
}

/// One recordset: a (name, type) pair with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recordset {
    /// Fully qualified record name
    pub name: String,
    /// Record type
    pub rtype: String,
    /// Time to live, seconds
    pub ttl: u32,
    /// Record data in provider order
    pub rdata: Vec<String>,
}

/// DNS surface of the management API.
pub trait DnsApi: Send + Sync {
    /// Fetch zone metadata.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when the zone does not exist.
    fn get_zone(&self, zone: &str) -> Result<Zone>;

    /// List the record names under a zone.
    fn list_record_names(&self, zone: &str) -> Result<Vec<String>>;

    /// List the record types present under one name.
    fn list_record_types(&self, zone: &str, name: &str) -> Result<Vec<String>>;

    /// Fetch one recordset's data.
    fn get_recordset(&self, zone: &str, name: &str, rtype: &str) -> Result<Recordset>;
}

impl DnsApi for EdgeClient {
    fn get_zone(&self, zone: &str) -> Result<Zone> {
        let path = format!("/config-dns/v2/zones/{zone}");
        let response: WireZone = self.get_json(&path).map_err(|err| match err {
            Error::Http {
                status: Some(404), ..
            } => Error::NotFound {
                kind: "zone",
                name: zone.to_string(),
            },
            other => other,
        })?;
        Ok(response.into())
    }

    fn list_record_names(&self, zone: &str) -> Result<Vec<String>> {
        let path = format!("/config-dns/v2/zones/{zone}/names");
        let response: WireNames = self.get_json(&path)?;
        Ok(response.names)
    }

    fn list_record_types(&self, zone: &str, name: &str) -> Result<Vec<String>> {
        let path = format!("/config-dns/v2/zones/{zone}/names/{name}/types");
        let response: WireTypes = self.get_json(&path)?;
        Ok(response.types)
    }

    fn get_recordset(&self, zone: &str, name: &str, rtype: &str) -> Result<Recordset> {
        let path = format!("/config-dns/v2/zones/{zone}/names/{name}/types/{rtype}");
        let response: WireRecordset = self.get_json(&path).map_err(|err| match err {
            Error::Http {
                status: Some(404), ..
            } => Error::NotFound {
                kind: "recordset",
                name: format!("{name} {rtype}"),
            },
            other => other,
        })?;
        Ok(response.into())
    }
}

// =============================================================================
// API response types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireZone {
    zone: String,
    #[serde(rename = "type")]
    kind: String,
    comment: Option<String>,
    #[serde(default)]
    sign_and_serve: bool,
    contract_id: String,
    #[serde(default)]
    masters: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireNames {
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireTypes {
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireRecordset {
    name: String,
    #[serde(rename = "type")]
    rtype: String,
    ttl: u32,
    rdata: Vec<String>,
}

impl From<WireZone> for Zone {
    fn from(z: WireZone) -> Self {
        Self {
            zone: z.zone,
            kind: z.kind,
            comment: z.comment,
            sign_and_serve: z.sign_and_serve,
            contract_id: z.contract_id,
            masters: z.masters,
        }
    }
}

impl From<WireRecordset> for Recordset {
    fn from(r: WireRecordset) -> Self {
        Self {
            name: r.name,
            rtype: r.rtype,
            ttl: r.ttl,
            rdata: r.rdata,
        }
    }
}

// =============================================================================
// Mock
// =============================================================================

/// In-memory DNS API for tests.
#[derive(Debug, Clone, Default)]
pub struct MockDns {
    zones: Arc<Mutex<HashMap<String, Zone>>>,
    recordsets: Arc<Mutex<HashMap<String, Vec<Recordset>>>>,
}

impl MockDns {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone.
    pub fn add_zone(&mut self, zone: Zone) {
        let mut zones = self.zones.lock().unwrap();
        zones.insert(zone.zone.clone(), zone);
    }

    /// Register a recordset under a zone.
    pub fn add_recordset(&mut self, zone: &str, recordset: Recordset) {
        let mut recordsets = self.recordsets.lock().unwrap();
        recordsets.entry(zone.to_string()).or_default().push(recordset);
    }

    /// A primary zone pre-filled with typical apex and www records.
    #[must_use]
    pub fn with_example_zone() -> Self {
        let mut mock = Self::new();
        mock.add_zone(Zone {
            zone: "example.com".to_string(),
            kind: "PRIMARY".to_string(),
            comment: Some("managed zone".to_string()),
            sign_and_serve: false,
            contract_id: "ctr_1-2ABCDE".to_string(),
            masters: Vec::new(),
        });
        mock.add_recordset(
            "example.com",
            Recordset {
                name: "example.com".to_string(),
                rtype: "A".to_string(),
                ttl: 300,
                rdata: vec!["192.0.2.1".to_string()],
            },
        );
        mock.add_recordset(
            "example.com",
            Recordset {
                name: "www.example.com".to_string(),
                rtype: "CNAME".to_string(),
                ttl: 3600,
                rdata: vec!["example.com.".to_string()],
            },
        );
        mock
    }
}

impl DnsApi for MockDns {
    fn get_zone(&self, zone: &str) -> Result<Zone> {
        let zones = self.zones.lock().unwrap();
        zones.get(zone).cloned().ok_or_else(|| Error::NotFound {
            kind: "zone",
            name: zone.to_string(),
        })
    }

    fn list_record_names(&self, zone: &str) -> Result<Vec<String>> {
        let recordsets = self.recordsets.lock().unwrap();
        let mut names = Vec::new();
        for recordset in recordsets.get(zone).into_iter().flatten() {
            if !names.contains(&recordset.name) {
                names.push(recordset.name.clone());
            }
        }
        Ok(names)
    }

    fn list_record_types(&self, zone: &str, name: &str) -> Result<Vec<String>> {
        let recordsets = self.recordsets.lock().unwrap();
        Ok(recordsets
            .get(zone)
            .into_iter()
            .flatten()
            .filter(|r| r.name == name)
            .map(|r| r.rtype.clone())
            .collect())
    }

    fn get_recordset(&self, zone: &str, name: &str, rtype: &str) -> Result<Recordset> {
        let recordsets = self.recordsets.lock().unwrap();
        recordsets
            .get(zone)
            .into_iter()
            .flatten()
            .find(|r| r.name == name && r.rtype == rtype)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "recordset",
                name: format!("{name} {rtype}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_zone_parses_api_shape() {
        let json = r#"{
            "zone": "example.com",
            "type": "PRIMARY",
            "comment": "managed zone",
            "signAndServe": false,
            "contractId": "ctr_1-2ABCDE",
            "activationState": "ACTIVE"
        }"#;
        let wire: WireZone = serde_json::from_str(json).unwrap();
        let zone: Zone = wire.into();

        assert_eq!(zone.zone, "example.com");
        assert_eq!(zone.kind, "PRIMARY");
        assert_eq!(zone.contract_id, "ctr_1-2ABCDE");
        assert!(zone.masters.is_empty());
    }

    #[test]
    fn test_wire_recordset_parses_api_shape() {
        let json = r#"{
            "name": "www.example.com",
            "type": "A",
            "ttl": 300,
            "rdata": ["192.0.2.10", "192.0.2.11"]
        }"#;
        let wire: WireRecordset = serde_json::from_str(json).unwrap();
        let recordset: Recordset = wire.into();

        assert_eq!(recordset.rtype, "A");
        assert_eq!(recordset.rdata.len(), 2);
    }

    #[test]
    fn test_mock_zone_lookup() {
        let mock = MockDns::with_example_zone();
        let zone = mock.get_zone("example.com").unwrap();
        assert_eq!(zone.kind, "PRIMARY");

        let missing = mock.get_zone("missing.net");
        assert!(matches!(missing, Err(Error::NotFound { kind: "zone", .. })));
    }

    #[test]
    fn test_mock_names_are_unique_in_order() {
        let mut mock = MockDns::with_example_zone();
        mock.add_recordset(
            "example.com",
            Recordset {
                name: "www.example.com".to_string(),
                rtype: "AAAA".to_string(),
                ttl: 300,
                rdata: vec!["2001:db8::1".to_string()],
            },
        );

        let names = mock.list_record_names("example.com").unwrap();
        assert_eq!(names, vec!["example.com", "www.example.com"]);
    }

    #[test]
    fn test_mock_types_and_recordset() {
        let mock = MockDns::with_example_zone();
        let types = mock
            .list_record_types("example.com", "www.example.com")
            .unwrap();
        assert_eq!(types, vec!["CNAME"]);

        let recordset = mock
            .get_recordset("example.com", "www.example.com", "CNAME")
            .unwrap();
        assert_eq!(recordset.rdata, vec!["example.com."]);

        let missing = mock.get_recordset("example.com", "www.example.com", "MX");
        assert!(missing.is_err());
    }

    #[test]
    fn test_mock_unknown_zone_lists_empty() {
        let mock = MockDns::new();
        assert!(mock.list_record_names("example.com").unwrap().is_empty());
        assert!(
            mock.list_record_types("example.com", "www.example.com")
                .unwrap()
                .is_empty()
        );
    }
}
