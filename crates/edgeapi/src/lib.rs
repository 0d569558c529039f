//! # edgeapi
//!
//! Blocking, typed client for the CDN management API.
//!
//! This crate provides functionality for:
//! - Loading API credentials from a sectioned TOML file
//! - Fetching DNS zones, record names, types, and recordset data
//! - Fetching properties, rule trees, hostnames, and edge hostnames
//! - Fetching cloud access keys and their versions
//!
//! Each API surface is a trait ([`dns::DnsApi`], [`papi::PropertyApi`],
//! [`cloudaccess::CloudAccessApi`]) implemented by the shared
//! [`EdgeClient`] and by an in-memory mock, so callers can be tested
//! without network access.
//!
//! ## Example
//!
//! ```no_run
//! use edgeapi::{EdgeClient, credentials};
//! use edgeapi::dns::DnsApi;
//! use std::path::Path;
//!
//! # fn main() -> edgeapi::Result<()> {
//! let creds = credentials::load(
//!     Path::new("credentials.toml"),
//!     credentials::DEFAULT_SECTION,
//! )?;
//! let client = EdgeClient::new(&creds);
//!
//! let zone = client.get_zone("example.com")?;
//! println!("{} ({})", zone.zone, zone.kind);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod cloudaccess;
pub mod credentials;
pub mod dns;
pub mod error;
pub mod papi;

pub use client::EdgeClient;
pub use credentials::Credentials;
pub use error::{Error, Result};
