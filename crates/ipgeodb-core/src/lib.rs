// crates/ipgeodb-core/src/lib.rs

//! ipgeodb-core
//! ============
//!
//! Answers "which country, registry region or special-use block does this IP
//! address belong to?" from Regional Internet Registry delegation data.
//!
//! - [`codec`] / [`cidr`]: address text and CIDR arithmetic for both families.
//! - [`model`]: the [`RangeTable`] and its O(log n) [`IndexedTable`] twin.
//! - [`traits::IpLookup`]: the resolver API (`lookup`, `list_codes`,
//!   `ranges_for_code`, `stats`).
//! - [`loader`]: dataset files, and with the `builder` feature, the
//!   ingestion pipeline that fetches and validates registry data.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cidr;
pub mod codec;
pub mod common;
pub mod error;
pub mod loader;
pub mod model;
pub mod search; // Linear-scan resolver
pub mod special;
pub mod traits;

// Re-exports
pub use crate::common::{AddressFamily, TableStats};
pub use crate::error::{IpDbError, Result};
pub use crate::loader::{CompressionMode, DataFormat};
pub use crate::model::{
    CodeDetails, CodeKind, CodeRange, IndexedTable, Ipv4Range, Ipv6Range, RangeTable,
};
// Export the Lookup Trait (Crucial for users!)
pub use crate::traits::IpLookup;

#[cfg(feature = "json")]
pub use crate::loader::load_details;

#[cfg(feature = "builder")]
pub use crate::loader::builder::{build_database, build_table, IngestConfig, TableBuilder};
#[cfg(feature = "builder")]
pub use crate::loader::fetch::{DefaultFetcher, Fetch, FetchConfig, HttpFetcher};
