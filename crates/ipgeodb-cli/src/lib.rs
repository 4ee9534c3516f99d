//! ipgeodb-cli
//! ===========
//!
//! Command-line interface for the `ipgeodb-core` IP resolution database.
//!
//! This crate primarily provides a binary (`ipgeodb`). The library target
//! only exists so docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install ipgeodb-cli
//! ipgeodb --help
//! ipgeodb lookup 94.79.51.169
//! ipgeodb ranges EU
//! ipgeodb update
//! ```
//!
//! For programmatic access use the [`ipgeodb-core`] crate directly.
//!
//! Links
//! -----
//! - Repository: <https://github.com/holg/ipgeodb-rs>
//! - Core crate: <https://docs.rs/ipgeodb-core>
//!
#![cfg_attr(docsrs, feature(doc_cfg))]
