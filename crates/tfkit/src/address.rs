//! Resource labels and textual membership tests.
//!
//! Every generated resource carries a label derived from its composite
//! identifier (zone, record name, record type). Labels must be valid
//! Terraform identifiers and unique within a zone's config, because the
//! merge logic treats the quoted label as the marker for "already declared".

use serde::{Deserialize, Serialize};

/// Composite identifier of one recordset resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    /// Zone the recordset belongs to
    pub zone: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type (A, AAAA, CNAME, ...)
    pub rtype: String,
}

impl RecordId {
    /// Create a record identifier.
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        rtype: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            rtype: rtype.into(),
        }
    }

    /// Unique resource label: `<zone>_<name>_<type>`, each part normalized.
    pub fn label(&self) -> String {
        normalize_label(&format!("{}_{}_{}", self.zone, self.name, self.rtype))
    }

    /// Terraform import id understood by the provider: `zone#name#type`.
    pub fn import_id(&self) -> String {
        format!("{}#{}#{}", self.zone, self.name, self.rtype)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.zone, self.name, self.rtype)
    }
}

/// Normalize a raw name into a Terraform identifier.
///
/// Characters outside `[A-Za-z0-9_]` become underscores; a leading digit
/// gets an underscore prefix. Case is preserved (record types stay
/// uppercase).
pub fn normalize_label(raw: &str) -> String {
    let mut label: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if label.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        label.insert(0, '_');
    }
    label
}

/// Label for the zone resource itself.
pub fn zone_label(zone: &str) -> String {
    normalize_label(zone)
}

/// Label for a record name's module block: `<zone>_<name>` normalized.
pub fn name_label(zone: &str, name: &str) -> String {
    normalize_label(&format!("{zone}_{name}"))
}

/// Whether `label` is already declared in `text`.
///
/// This is a plain substring test against the quoted label, not a parse of
/// the config. A label quoted in a comment counts as declared; a resource
/// declared with unexpected spacing still matches because Terraform labels
/// are always quoted. Known trade-off, kept deliberately.
pub fn is_declared(text: &str, label: &str) -> bool {
    text.contains(&format!("\"{label}\""))
}
