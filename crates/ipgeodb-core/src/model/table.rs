// crates/ipgeodb-core/src/model/table.rs
use crate::codec::{format_ipv4, format_ipv6, ipv6_to_u128};
use crate::error::{IpDbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An inclusive IPv4 range owned by `code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4Range {
    pub start: u32,
    pub end: u32,
    pub code: String,
}

/// An inclusive IPv6 range owned by `code`.
///
/// Bounds are stored as `(upper, lower)` word pairs; compare them through
/// [`Ipv6Range::start`] / [`Ipv6Range::end`], never word by word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Range {
    pub start_upper: u64,
    pub end_upper: u64,
    pub start_lower: u64,
    pub end_lower: u64,
    pub code: String,
}

impl Ipv4Range {
    #[inline]
    pub fn contains(&self, address: u32) -> bool {
        self.start <= address && address <= self.end
    }
}

impl Ipv6Range {
    #[inline]
    pub fn start(&self) -> u128 {
        ipv6_to_u128(self.start_upper, self.start_lower)
    }

    #[inline]
    pub fn end(&self) -> u128 {
        ipv6_to_u128(self.end_upper, self.end_lower)
    }

    #[inline]
    pub fn contains(&self, address: u128) -> bool {
        self.start() <= address && address <= self.end()
    }
}

/// What kind of owner a code stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeKind {
    Cgnat,
    Private,
    Loopback,
    LinkLocal,
    Region,
    Country,
}

impl CodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::Cgnat => "cgnat",
            CodeKind::Private => "private",
            CodeKind::Loopback => "loopback",
            CodeKind::LinkLocal => "link-local",
            CodeKind::Region => "region",
            CodeKind::Country => "country",
        }
    }
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata for a code, taken as-is from the details dictionary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeDetails {
    pub kind: CodeKind,
    pub description: String,
    pub country_code: Option<String>,
    pub flag: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Textual bounds of one range, as returned by
/// [`IpLookup::ranges_for_code`](crate::traits::IpLookup::ranges_for_code).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRange {
    pub start: String,
    pub end: String,
}

/// The range table: per-family range lists in insertion order plus the code
/// dictionary.
///
/// Order matters. When ranges overlap, the first one in the list owns the
/// overlap, so the table keeps exactly the order in which ingestion produced
/// the ranges (registries first, special-use ranges last).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeTable {
    pub ipv4: Vec<Ipv4Range>,
    pub ipv6: Vec<Ipv6Range>,
    /// Ordered so that encoding the table is deterministic.
    pub code_to_details: BTreeMap<String, CodeDetails>,
}

impl RangeTable {
    pub fn new(code_to_details: BTreeMap<String, CodeDetails>) -> Self {
        Self {
            ipv4: Vec::new(),
            ipv6: Vec::new(),
            code_to_details,
        }
    }

    /// Checks the table invariants: every code resolves in the dictionary and
    /// no range ends before it starts.
    pub fn validate(&self) -> Result<()> {
        for r in &self.ipv4 {
            self.require_code(&r.code)?;
            if r.start > r.end {
                return Err(IpDbError::InvalidData(format!(
                    "IPv4 range {} - {} ends before it starts",
                    format_ipv4(r.start),
                    format_ipv4(r.end)
                )));
            }
        }
        for r in &self.ipv6 {
            self.require_code(&r.code)?;
            if r.start() > r.end() {
                return Err(IpDbError::InvalidData(format!(
                    "IPv6 range {} - {} ends before it starts",
                    format_ipv6(r.start_upper, r.start_lower),
                    format_ipv6(r.end_upper, r.end_lower)
                )));
            }
        }
        Ok(())
    }

    fn require_code(&self, code: &str) -> Result<()> {
        if self.code_to_details.contains_key(code) {
            Ok(())
        } else {
            Err(IpDbError::MissingCode {
                context: "Range table refers to an unknown code".to_string(),
                code: code.to_string(),
            })
        }
    }
}
