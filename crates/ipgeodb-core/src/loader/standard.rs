// crates/ipgeodb-core/src/loader/standard.rs

//! Native payload: `IPDB` magic, `u16` format version (little endian), then
//! the bincode-encoded [`RangeTable`]. 64-bit words are stored as integers.

use crate::error::{IpDbError, Result};
use crate::model::{RangeTable, DATASET_MAGIC, DATASET_VERSION};
use super::common_io::MAX_PAYLOAD_BYTES;
use bincode::Options;

/// Magic (4 bytes) + version (2 bytes).
const HEADER_LEN: usize = 6;

/// Standard bincode options with a 256MB limit against malicious data bombs.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_PAYLOAD_BYTES)
        .allow_trailing_bytes()
}

pub(crate) fn is_native(payload: &[u8]) -> bool {
    payload.starts_with(DATASET_MAGIC)
}

pub(crate) fn encode(table: &RangeTable) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + 16 * (table.ipv4.len() + table.ipv6.len()));
    out.extend_from_slice(DATASET_MAGIC);
    out.extend_from_slice(&DATASET_VERSION.to_le_bytes());
    bincode_options().serialize_into(&mut out, table)?;
    Ok(out)
}

pub(crate) fn decode(payload: &[u8]) -> Result<RangeTable> {
    if payload.len() < HEADER_LEN || !is_native(payload) {
        return Err(IpDbError::InvalidData(
            "payload does not start with the dataset header".into(),
        ));
    }
    let version = u16::from_le_bytes([payload[4], payload[5]]);
    if version != DATASET_VERSION {
        return Err(IpDbError::InvalidData(format!(
            "unsupported dataset version {version} (expected {DATASET_VERSION})"
        )));
    }
    Ok(bincode_options().deserialize(&payload[HEADER_LEN..])?)
}
