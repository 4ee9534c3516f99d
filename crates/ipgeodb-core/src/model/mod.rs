// crates/ipgeodb-core/src/model/mod.rs
pub mod index;
pub mod table;

pub use index::IndexedTable;
pub use table::{CodeDetails, CodeKind, CodeRange, Ipv4Range, Ipv6Range, RangeTable};

/// Magic bytes opening the native (bincode) dataset payload.
pub const DATASET_MAGIC: &[u8; 4] = b"IPDB";

/// Bumped whenever the bincode layout of [`RangeTable`] changes.
pub const DATASET_VERSION: u16 = 1;
