//! Inventory and generated-config side files.
//!
//! Two JSON side files track state between pipeline steps:
//!
//! - the inventory file records what exists remotely
//!   (`{"zone": ..., "recordsets": {name: [types]}}`);
//! - the zone-config file records what the last config step generated, so a
//!   later import-script step knows which resources need `terraform import`.
//!
//! The two have independent lifecycles: an inventory is written once and
//! guarded against clobbering, while the zone-config file is rewritten on
//! every config run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Record names mapped to their type lists, lexicographically ordered.
pub type RecordSets = BTreeMap<String, Vec<String>>;

/// Snapshot of a zone's recordsets as fetched from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInventory {
    /// Zone name, lowercase
    pub zone: String,
    /// Record name -> sorted record types (empty under names-only)
    pub recordsets: RecordSets,
}

impl ZoneInventory {
    /// Create an empty inventory for a zone.
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            recordsets: RecordSets::new(),
        }
    }

    /// Record a (name, type) pair, keeping type lists sorted and unique.
    pub fn insert(&mut self, name: &str, rtype: &str) {
        let types = self.recordsets.entry(name.to_string()).or_default();
        if !types.iter().any(|t| t == rtype) {
            types.push(rtype.to_string());
            types.sort();
        }
    }

    /// Record a name with no types (the names-only inventory mode).
    pub fn insert_name(&mut self, name: &str) {
        self.recordsets.entry(name.to_string()).or_default();
    }

    /// Total number of (name, type) pairs.
    pub fn len(&self) -> usize {
        self.recordsets.values().map(Vec::len).sum()
    }

    /// Whether the inventory holds no recordsets at all.
    pub fn is_empty(&self) -> bool {
        self.recordsets.is_empty()
    }

    /// Sort and de-duplicate every type list.
    ///
    /// Files written by hand (or an older run) may carry unsorted lists;
    /// deterministic iteration depends on this.
    pub fn normalize(&mut self) {
        for types in self.recordsets.values_mut() {
            types.sort();
            types.dedup();
        }
    }

    /// Load an inventory side file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingInventory {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let mut inventory: Self = serde_json::from_str(&text)?;
        inventory.normalize();
        Ok(inventory)
    }

    /// Write the inventory side file.
    ///
    /// Refuses to overwrite: an inventory on disk may be feeding config
    /// runs and is only replaced by deleting it first.
    pub fn save(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::ArtifactExists {
                path: path.to_path_buf(),
            });
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// What one config run generated, kept for the import-script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Zone name, lowercase
    pub zone: String,
    /// True when that run created the zone resource block itself
    pub zone_created: bool,
    /// Recordsets rendered by that run (the residual, not the inventory)
    pub recordsets: RecordSets,
}

impl ZoneConfig {
    /// Load the generated-config side file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingZoneConfig {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the side file, replacing any previous run's version.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
