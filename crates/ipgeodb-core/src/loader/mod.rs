// crates/ipgeodb-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (I/O, Decompression) and delegates to
//! specific payload codecs (native binary vs legacy JSON). With the
//! `builder` feature it also hosts the ingestion pipeline that produces
//! the dataset from registry data.
//!
//! There is no process-wide table: [`RangeTable::load_from_path`] returns an
//! owned value and callers pass it (or an
//! [`IndexedTable`](crate::model::IndexedTable) built from it) by reference.
//! Reloading means loading a new value and swapping the handle.

use crate::error::{IpDbError, Result};
use crate::model::RangeTable;
use std::path::{Path, PathBuf};

pub mod common_io;
pub mod delegated;
pub mod registry;
mod standard;

#[cfg(feature = "json")]
mod legacy_json;

#[cfg(feature = "builder")]
pub mod builder;
#[cfg(feature = "builder")]
pub mod fetch;

// -----------------------------------------------------------------------------
// CONFIGURATION
// -----------------------------------------------------------------------------

/// Payload layout inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `IPDB` header + bincode. The default.
    Binary,
    /// Pretty JSON with `bigint:` strings for 64-bit words.
    LegacyJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl CompressionMode {
    /// Gzip when the `compact` feature is on, otherwise none.
    pub fn preferred() -> Self {
        if cfg!(feature = "compact") {
            CompressionMode::Gzip
        } else {
            CompressionMode::None
        }
    }
}

impl RangeTable {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_dataset_filename() -> &'static str {
        "ipgeodb.bin"
    }

    pub fn default_details_filename() -> &'static str {
        "details.json"
    }

    /// Loads the dataset from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::default_data_dir().join(Self::default_dataset_filename()))
    }

    /// **Standard Loader:** reads a dataset file in any supported layout.
    ///
    /// The table is validated before it is returned, so a loaded table never
    /// refers to a code missing from its dictionary.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // 1. DRY: Use shared transport logic
        let reader = common_io::open_stream(path)?;
        let payload = common_io::read_limited(reader, common_io::MAX_PAYLOAD_BYTES)?;
        // 2. Delegate payload parsing
        let table = Self::from_payload(&payload)?;
        log::debug!(
            "Loaded {} IPv4 / {} IPv6 ranges from {}",
            table.ipv4.len(),
            table.ipv6.len(),
            path.display()
        );
        Ok(table)
    }

    /// Decodes dataset bytes (gzip or not, native or legacy JSON).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let reader = common_io::wrap_decoder(data)?;
        let payload = common_io::read_limited(reader, common_io::MAX_PAYLOAD_BYTES)?;
        Self::from_payload(&payload)
    }

    fn from_payload(payload: &[u8]) -> Result<Self> {
        let table = if standard::is_native(payload) {
            standard::decode(payload)?
        } else if looks_like_json(payload) {
            decode_json(payload)?
        } else {
            return Err(IpDbError::InvalidData(
                "unrecognized dataset payload".into(),
            ));
        };
        table.validate()?;
        Ok(table)
    }

    /// Encodes the table. Equal tables always give equal bytes.
    pub fn to_bytes(&self, format: DataFormat, compression: CompressionMode) -> Result<Vec<u8>> {
        let payload = match format {
            DataFormat::Binary => standard::encode(self)?,
            DataFormat::LegacyJson => encode_json(self)?,
        };
        common_io::compress(&payload, compression)
    }

    /// Writes the table in the default layout, replacing `path` atomically.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_as_with(path, DataFormat::Binary, CompressionMode::preferred())
    }

    pub fn save_as_with(
        &self,
        path: impl AsRef<Path>,
        format: DataFormat,
        compression: CompressionMode,
    ) -> Result<()> {
        let bytes = self.to_bytes(format, compression)?;
        common_io::write_atomic(path.as_ref(), &bytes)
    }
}

fn looks_like_json(payload: &[u8]) -> bool {
    payload
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

#[cfg(feature = "json")]
fn decode_json(payload: &[u8]) -> Result<RangeTable> {
    legacy_json::decode(payload)
}

#[cfg(not(feature = "json"))]
fn decode_json(_payload: &[u8]) -> Result<RangeTable> {
    Err(IpDbError::InvalidData(
        "JSON dataset found but 'json' disabled".into(),
    ))
}

#[cfg(feature = "json")]
fn encode_json(table: &RangeTable) -> Result<Vec<u8>> {
    legacy_json::encode(table)
}

#[cfg(not(feature = "json"))]
fn encode_json(_table: &RangeTable) -> Result<Vec<u8>> {
    Err(IpDbError::InvalidData(
        "JSON requested but 'json' disabled".into(),
    ))
}

/// Reads the trusted `code -> details` dictionary (plain or gzipped JSON).
#[cfg(feature = "json")]
pub fn load_details(
    path: impl AsRef<Path>,
) -> Result<std::collections::BTreeMap<String, crate::model::CodeDetails>> {
    let path = path.as_ref();
    let reader = common_io::open_stream(path)?;
    let details = legacy_json::decode_details(reader)?;
    log::debug!("Loaded {} codes from {}", details.len(), path.display());
    Ok(details)
}
