//! # tfkit
//!
//! Terraform declaration toolkit for exporting live CDN/DNS configuration.
//!
//! This crate provides functionality for:
//! - Normalizing resource labels and testing declaration membership
//! - Reading and appending declaration files (append-only, never truncate)
//! - Reconciling a fetched zone inventory against existing declarations
//! - Rendering zone, recordset, and module blocks
//! - Building `terraform import` scripts from a run's generated output
//!
//! The merge model is idempotent: every generated resource carries a
//! unique quoted label, existing text is scanned for those labels, and
//! only the undeclared remainder is rendered and appended. Running the
//! same export twice therefore adds nothing the second time.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use tfkit::{ZoneInventory, reconcile, scan};
//!
//! # fn main() -> tfkit::Result<()> {
//! let mut inventory = ZoneInventory::new("example.com");
//! inventory.insert("www.example.com", "A");
//!
//! let existing = scan::read_existing(Path::new("example_com.tf"))?;
//! let outcome = reconcile::reconcile(&inventory, &existing);
//! for (name, types) in &outcome.residual {
//!     println!("undeclared: {name} {types:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod error;
pub mod import;
pub mod inventory;
pub mod reconcile;
pub mod render;
pub mod scan;
pub mod workdir;

pub use address::RecordId;
pub use error::{Error, Result};
pub use inventory::{RecordSets, ZoneConfig, ZoneInventory};
pub use reconcile::Reconciliation;
pub use scan::Layout;
pub use workdir::WorkDir;
