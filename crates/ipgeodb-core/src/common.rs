// crates/ipgeodb-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a range table.
///
/// Returned by [`IpLookup::stats`](crate::traits::IpLookup::stats); counts
/// reflect the table as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub ipv4_ranges: usize,
    pub ipv6_ranges: usize,
    pub codes: usize,
}

/// Address family of a range or a registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Parses the `type` column of a delegated-stats record.
    pub fn from_record_type(s: &str) -> Option<Self> {
        match s {
            "ipv4" => Some(AddressFamily::Ipv4),
            "ipv6" => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }
}
