//! Terraform text generation.
//!
//! Blocks are built with `fmt::Write` into plain strings; the emitter
//! appends them to the target file as-is. Two-space indent, no alignment
//! (generated files are expected to go through `terraform fmt` anyway).
//! Labels come from [`crate::address`] so rendered text and membership
//! tests always agree.

use crate::address::{RecordId, name_label, zone_label};
use std::fmt::Write;

/// Zone metadata needed to render the zone resource block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneResource {
    /// Zone name, lowercase
    pub zone: String,
    /// PRIMARY or SECONDARY
    pub kind: String,
    /// Operator comment carried on the zone, if any
    pub comment: Option<String>,
    /// Whether DNSSEC sign-and-serve is enabled
    pub sign_and_serve: bool,
    /// Master addresses (secondary zones only)
    pub masters: Vec<String>,
}

/// One recordset with the data needed to render its resource block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResource {
    /// Composite identifier
    pub id: RecordId,
    /// Time to live, seconds
    pub ttl: u32,
    /// Record data in provider order
    pub rdata: Vec<String>,
}

/// Render the zone resource block.
pub fn zone_block(zone: &ZoneResource) -> String {
    let mut out = String::new();
    writeln!(out, "resource \"cdn_dns_zone\" \"{}\" {{", zone_label(&zone.zone)).unwrap();
    writeln!(out, "  contract = var.contractid").unwrap();
    writeln!(out, "  group = var.groupid").unwrap();
    writeln!(out, "  zone = \"{}\"", zone.zone).unwrap();
    writeln!(out, "  type = \"{}\"", zone.kind).unwrap();
    if !zone.masters.is_empty() {
        writeln!(out, "  masters = {}", quoted_list(&zone.masters)).unwrap();
    }
    if let Some(comment) = &zone.comment {
        writeln!(out, "  comment = \"{}\"", escape(comment)).unwrap();
    }
    writeln!(out, "  sign_and_serve = {}", zone.sign_and_serve).unwrap();
    writeln!(out, "}}").unwrap();
    out
}

/// Render one recordset resource block.
pub fn record_block(record: &RecordResource) -> String {
    let mut out = String::new();
    writeln!(out, "resource \"cdn_dns_record\" \"{}\" {{", record.id.label()).unwrap();
    writeln!(out, "  zone = \"{}\"", record.id.zone).unwrap();
    writeln!(out, "  name = \"{}\"", record.id.name).unwrap();
    writeln!(out, "  recordtype = \"{}\"", record.id.rtype).unwrap();
    writeln!(out, "  ttl = {}", record.ttl).unwrap();
    writeln!(out, "  rdata = {}", quoted_list(&record.rdata)).unwrap();
    writeln!(out, "}}").unwrap();
    out
}

/// Render the root-file module block pointing at a record name's module.
///
/// The `zonename` attribute doubles as the segmented-layout marker that
/// [`crate::scan::detect_layout`] keys on.
pub fn module_block(zone: &str, name: &str) -> String {
    let label = name_label(zone, name);
    let mut out = String::new();
    writeln!(out, "module \"{label}\" {{").unwrap();
    writeln!(out, "  source = \"./modules/{label}\"").unwrap();
    writeln!(out, "  zonename = \"{zone}\"").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

/// Render `dnsvars.tf`: provider wiring plus the variables the zone block
/// references. Rewritten on every config run with the section the run
/// actually authenticated with.
pub fn dnsvars(section: &str, contract_id: &str) -> String {
    let mut out = String::new();
    writeln!(out, "terraform {{").unwrap();
    writeln!(out, "  required_providers {{").unwrap();
    writeln!(out, "    cdn = {{").unwrap();
    writeln!(out, "      source = \"cdn/cdn\"").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "  }}").unwrap();
    writeln!(out, "  required_version = \">= 1.0\"").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "provider \"cdn\" {{").unwrap();
    writeln!(out, "  section = var.section").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "variable \"section\" {{").unwrap();
    writeln!(out, "  default = \"{section}\"").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "variable \"contractid\" {{").unwrap();
    writeln!(out, "  default = \"{contract_id}\"").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "variable \"groupid\" {{").unwrap();
    writeln!(out, "  default = \"\"").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

/// Format a string list as a Terraform list literal.
fn quoted_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|i| format!("\"{}\"", escape(i))).collect();
    format!("[{}]", inner.join(", "))
}

/// Escape quotes and backslashes for embedding in HCL strings.
///
/// TXT rdata routinely carries both.
fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
