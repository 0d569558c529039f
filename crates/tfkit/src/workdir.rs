//! Locations of generated files inside a target work directory.
//!
//! All artifact paths derive from the normalized zone label, so one work
//! directory can hold several zones' exports side by side.

use crate::address::{name_label, zone_label};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A target directory for generated Terraform files.
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    /// Wrap a directory path. The directory must already exist; exporters
    /// never create the top-level target themselves.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::WorkDirMissing { path: root });
        }
        Ok(Self { root })
    }

    /// The directory itself.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// A file directly inside the work directory.
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Root declaration file for a zone: `<zone_label>.tf`.
    pub fn zone_config(&self, zone: &str) -> PathBuf {
        self.file(&format!("{}.tf", zone_label(zone)))
    }

    /// Inventory side file: `<zone_label>_resources.json`.
    pub fn inventory_file(&self, zone: &str) -> PathBuf {
        self.file(&format!("{}_resources.json", zone_label(zone)))
    }

    /// Generated-config side file: `<zone_label>_zoneconfig.json`.
    pub fn zone_config_file(&self, zone: &str) -> PathBuf {
        self.file(&format!("{}_zoneconfig.json", zone_label(zone)))
    }

    /// Import script: `<zone_label>_import.sh`.
    pub fn import_script(&self, zone: &str) -> PathBuf {
        self.file(&format!("{}_import.sh", zone_label(zone)))
    }

    /// The shared variables file, `dnsvars.tf`.
    pub fn dnsvars(&self) -> PathBuf {
        self.file("dnsvars.tf")
    }

    /// Module directory for one record name (segmented layout).
    pub fn module_dir(&self, zone: &str, name: &str) -> PathBuf {
        self.root.join("modules").join(name_label(zone, name))
    }

    /// Declaration file inside a record name's module.
    pub fn module_config(&self, zone: &str, name: &str) -> PathBuf {
        let label = name_label(zone, name);
        self.module_dir(zone, name).join(format!("{label}.tf"))
    }

    /// Create a record name's module directory if needed.
    pub fn ensure_module_dir(&self, zone: &str, name: &str) -> Result<PathBuf> {
        let dir = self.module_dir(zone, name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
