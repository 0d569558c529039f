//! Merge reconciliation between a fetched inventory and declared text.
//!
//! The engine answers one question: which (zone, name, type) identifiers
//! from the inventory are not yet declared in the existing config text?
//! Membership is the quoted-label substring test from [`crate::address`];
//! the engine itself never touches the filesystem or the network, which is
//! what keeps repeated runs over the same target idempotent.

use crate::address::{RecordId, is_declared};
use crate::inventory::{RecordSets, ZoneInventory};

/// Outcome of reconciling an inventory against existing text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Name -> types still undeclared; the only set the emitter renders
    pub residual: RecordSets,
    /// Identifiers found already declared, for caller-side notices
    pub skipped: Vec<RecordId>,
}

impl Reconciliation {
    /// Whether the existing text already declares the whole inventory.
    pub fn is_settled(&self) -> bool {
        self.residual.is_empty()
    }

    /// Total number of undeclared (name, type) pairs.
    pub fn residual_len(&self) -> usize {
        self.residual.values().map(Vec::len).sum()
    }
}

/// Reconcile a whole inventory against one config text.
///
/// Subtract-only: the residual is always a subset of the inventory, and a
/// name whose types are all declared drops out entirely. Names iterate in
/// lexicographic order and type lists stay sorted, so the residual (and
/// everything rendered from it) is deterministic.
pub fn reconcile(inventory: &ZoneInventory, existing: &str) -> Reconciliation {
    let mut outcome = Reconciliation::default();
    for (name, types) in &inventory.recordsets {
        let (missing, found) = residual_types(&inventory.zone, name, types, existing);
        outcome.skipped.extend(found);
        if !missing.is_empty() {
            outcome.residual.insert(name.clone(), missing);
        }
    }
    outcome
}

/// Reconcile a single record name's types against one config text.
///
/// Segmented configs keep each name's declarations in its own module file,
/// so callers reconcile name by name against the matching module text; the
/// math is identical to the flat case.
pub fn residual_types(
    zone: &str,
    name: &str,
    types: &[String],
    existing: &str,
) -> (Vec<String>, Vec<RecordId>) {
    let mut sorted: Vec<&String> = types.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut missing = Vec::new();
    let mut found = Vec::new();
    for rtype in sorted {
        let id = RecordId::new(zone, name, rtype.as_str());
        if is_declared(existing, &id.label()) {
            found.push(id);
        } else {
            missing.push(rtype.clone());
        }
    }
    (missing, found)
}
