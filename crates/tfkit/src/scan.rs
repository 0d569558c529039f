//! Two-phase access to declaration files.
//!
//! A run touches a target file in exactly two phases: one full read of
//! whatever is already there, then at most one append of new text. Nothing
//! in this crate ever truncates a declaration file, so the worst outcome of
//! a crash mid-write is a prefix of the new text, which the next run's
//! merge skips over.

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Layout of an existing zone config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// No config yet (missing or empty file)
    Empty,
    /// Resource blocks directly in the root file
    Flat,
    /// Module blocks in the root file, resources under modules/
    Segmented,
}

impl Layout {
    /// Lowercase name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Flat => "flat",
            Self::Segmented => "segmented",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the full text of a declaration file.
///
/// A missing file is not an error; it reads as an empty string, which the
/// reconcile step treats as "nothing declared yet".
pub fn read_existing(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

/// Append text to a declaration file, creating it when missing.
///
/// Append-only by contract; existing bytes are never rewritten.
pub fn append_to(path: &Path, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

/// Classify existing config text as flat or segmented.
///
/// Segmented configs are recognized by their module blocks, which always
/// carry a `zonename` attribute. The check is textual like the rest of the
/// merge logic.
pub fn detect_layout(text: &str) -> Layout {
    if text.trim().is_empty() {
        Layout::Empty
    } else if text.contains("module") && text.contains("zonename") {
        Layout::Segmented
    } else {
        Layout::Flat
    }
}

/// Fail when the existing text cannot absorb the requested output style.
///
/// Mixing flat resource blocks into a segmented config (or the reverse)
/// is fatal in both directions; the user has to pick a layout or remove
/// the config.
pub fn ensure_layout(text: &str, segmented: bool) -> Result<Layout> {
    let existing = detect_layout(text);
    let requested = if segmented {
        Layout::Segmented
    } else {
        Layout::Flat
    };
    match existing {
        Layout::Empty => Ok(existing),
        _ if existing == requested => Ok(existing),
        _ => Err(Error::LayoutMismatch {
            existing: existing.as_str().to_string(),
            requested: requested.as_str().to_string(),
        }),
    }
}

/// Pre-flight guard: fail on the first path that already exists.
///
/// Used by exporters whose outputs are whole files rather than merged
/// text; rerunning those over previous output would silently clobber it.
pub fn ensure_absent<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<()> {
    for path in paths {
        if path.exists() {
            return Err(Error::ArtifactExists {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let text = read_existing(&dir.path().join("example_com.tf")).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_append_creates_then_extends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example_com.tf");

        append_to(&path, "first\n").unwrap();
        append_to(&path, "second\n").unwrap();

        assert_eq!(read_existing(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_append_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example_com.tf");

        append_to(&path, "").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_detect_layout_empty() {
        assert_eq!(detect_layout(""), Layout::Empty);
        assert_eq!(detect_layout("  \n\t\n"), Layout::Empty);
    }

    #[test]
    fn test_detect_layout_flat() {
        let text = "resource \"cdn_dns_record\" \"example_com_www_example_com_A\" {\n  zone = \"example.com\"\n}\n";
        assert_eq!(detect_layout(text), Layout::Flat);
    }

    #[test]
    fn test_detect_layout_segmented() {
        let text = "module \"example_com_www_example_com\" {\n  source   = \"./modules/example_com_www_example_com\"\n  zonename = \"example.com\"\n}\n";
        assert_eq!(detect_layout(text), Layout::Segmented);
    }

    #[test]
    fn test_ensure_layout_conflicts_both_directions() {
        let flat = "resource \"cdn_dns_zone\" \"example_com\" {\n  zone = \"example.com\"\n}\n";
        let segmented =
            "module \"example_com_www\" {\n  zonename = \"example.com\"\n}\n";

        assert!(matches!(
            ensure_layout(flat, true),
            Err(Error::LayoutMismatch { .. })
        ));
        assert!(matches!(
            ensure_layout(segmented, false),
            Err(Error::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_ensure_layout_accepts_match_or_empty() {
        let flat = "resource \"cdn_dns_zone\" \"example_com\" {\n}\n";
        assert_eq!(ensure_layout(flat, false).unwrap(), Layout::Flat);
        assert_eq!(ensure_layout("", true).unwrap(), Layout::Empty);
        assert_eq!(ensure_layout("", false).unwrap(), Layout::Empty);
    }

    #[test]
    fn test_ensure_absent() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("property.tf");
        let absent = dir.path().join("variables.tf");
        std::fs::write(&present, "x").unwrap();

        assert!(ensure_absent([absent.as_path()]).is_ok());
        let err = ensure_absent([absent.as_path(), present.as_path()]).unwrap_err();
        assert!(matches!(err, Error::ArtifactExists { .. }));
    }
}
