//! Error types for declaration-file operations.
//!
//! Every error here is fatal to the run that produced it: the caller is
//! expected to print one message and exit. There is no retry machinery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning, reconciling, or emitting
/// declaration files.
#[derive(Debug, Error)]
pub enum Error {
    /// The existing config and the requested output disagree on layout.
    ///
    /// Merging flat resource blocks into a segmented config (or module
    /// blocks into a flat one) would produce a file Terraform cannot load.
    #[error(
        "existing zone config is {existing} but {requested} output was requested; \
         remove the config or match its layout"
    )]
    LayoutMismatch {
        /// Layout found in the existing text
        existing: String,
        /// Layout the caller asked to generate
        requested: String,
    },

    /// A generated artifact is already present and will not be clobbered.
    #[error("{path} already exists; remove it to continue")]
    ArtifactExists {
        /// Path of the conflicting file
        path: PathBuf,
    },

    /// A config run needs an inventory side file that is not there.
    #[error("inventory file not found: {path}; run the inventory step first")]
    MissingInventory {
        /// Expected inventory path
        path: PathBuf,
    },

    /// An import-script run needs the generated-config side file.
    #[error("zone config file not found: {path}; run the config step first")]
    MissingZoneConfig {
        /// Expected zone-config path
        path: PathBuf,
    },

    /// The target work directory does not exist.
    #[error("work directory does not exist: {path}")]
    WorkDirMissing {
        /// Path that was expected to be a directory
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for declaration-file operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_mismatch_message() {
        let err = Error::LayoutMismatch {
            existing: "segmented".to_string(),
            requested: "flat".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("segmented"));
        assert!(msg.contains("flat"));
        assert!(msg.contains("remove the config"));
    }

    #[test]
    fn test_artifact_exists_message() {
        let err = Error::ArtifactExists {
            path: PathBuf::from("/tmp/example_com_resources.json"),
        };
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_missing_inventory_message() {
        let err = Error::MissingInventory {
            path: PathBuf::from("example_com_resources.json"),
        };
        assert!(err.to_string().contains("run the inventory step first"));
    }

    #[test]
    fn test_io_error_wraps() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
    }
}
