// crates/ipgeodb-core/src/loader/builder.rs
#![cfg(feature = "builder")]

use super::delegated::{parse_delegated, Delegation};
use super::fetch::{DefaultFetcher, Fetch, FetchConfig};
use super::registry::Registry;
use super::{load_details, CompressionMode, DataFormat};

use crate::cidr::{ipv4_range_from_count, ipv6_cidr_to_range};
use crate::common::AddressFamily;
use crate::error::{IpDbError, Result};
use crate::model::{CodeDetails, Ipv4Range, Ipv6Range, RangeTable};
use crate::special::SPECIAL_USE_RANGES;

use std::collections::BTreeMap;
use std::path::PathBuf;

const REGISTRY_MISMATCH: &str = "Mismatch in new data from Regional Internet Registries";
const SPECIAL_MISMATCH: &str = "Mismatch in loopback, private, link-local and cgnat ranges";

// -----------------------------------------------------------------------------
// CONFIGURATION
// -----------------------------------------------------------------------------

/// Inputs of a full rebuild.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Delegated-stats sources, processed in this order.
    pub sources: Vec<String>,
    /// The trusted `code -> details` dictionary.
    pub details_path: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            sources: Registry::default_sources(),
            details_path: RangeTable::default_data_dir().join(RangeTable::default_details_filename()),
            fetch: FetchConfig::default(),
        }
    }
}

// -----------------------------------------------------------------------------
// TABLE BUILDER (The Accumulator)
// -----------------------------------------------------------------------------

/// Accumulates ranges in insertion order and enforces that every code it
/// records exists in the details dictionary.
#[derive(Debug)]
pub struct TableBuilder {
    table: RangeTable,
}

impl TableBuilder {
    pub fn new(details: BTreeMap<String, CodeDetails>) -> Self {
        Self {
            table: RangeTable::new(details),
        }
    }

    /// Adds every kept row of one delegated-stats document. Returns the
    /// number of ranges added.
    pub fn add_delegated(&mut self, text: &str) -> Result<usize> {
        let mut added = 0;
        for row in parse_delegated(text) {
            self.add_row(&row)?;
            added += 1;
        }
        Ok(added)
    }

    fn add_row(&mut self, row: &Delegation<'_>) -> Result<()> {
        self.require_code(row.code, REGISTRY_MISMATCH)?;
        match row.family {
            AddressFamily::Ipv4 => {
                let count: u64 = row.value.parse().map_err(|_| {
                    IpDbError::invalid_cidr(
                        &format!("{}/{}", row.start, row.value),
                        "host count is not a number",
                    )
                })?;
                let (start, end) = ipv4_range_from_count(row.start, count)?;
                self.push_ipv4(start, end, row.code);
            }
            AddressFamily::Ipv6 => {
                let bounds = ipv6_cidr_to_range(&format!("{}/{}", row.start, row.value))?;
                self.push_ipv6(bounds, row.code);
            }
        }
        Ok(())
    }

    /// Appends the loopback, private, link-local and CGNAT blocks.
    pub fn add_special_ranges(&mut self) -> Result<()> {
        for special in SPECIAL_USE_RANGES {
            match special.family {
                AddressFamily::Ipv4 => {
                    let (start, end) = crate::cidr::ipv4_cidr_to_range(special.cidr)?;
                    self.push_ipv4(start, end, special.code);
                }
                AddressFamily::Ipv6 => {
                    let bounds = ipv6_cidr_to_range(special.cidr)?;
                    self.push_ipv6(bounds, special.code);
                }
            }
            self.require_code(special.code, SPECIAL_MISMATCH)?;
        }
        Ok(())
    }

    /// Validates the assembled table and hands it over.
    pub fn finish(self) -> Result<RangeTable> {
        self.table.validate()?;
        Ok(self.table)
    }

    fn require_code(&self, code: &str, context: &str) -> Result<()> {
        if self.table.code_to_details.contains_key(code) {
            Ok(())
        } else {
            Err(IpDbError::MissingCode {
                context: context.to_string(),
                code: code.to_string(),
            })
        }
    }

    fn push_ipv4(&mut self, start: u32, end: u32, code: &str) {
        self.table.ipv4.push(Ipv4Range {
            start,
            end,
            code: code.to_string(),
        });
    }

    fn push_ipv6(&mut self, (su, sl, eu, el): (u64, u64, u64, u64), code: &str) {
        self.table.ipv6.push(Ipv6Range {
            start_upper: su,
            end_upper: eu,
            start_lower: sl,
            end_lower: el,
            code: code.to_string(),
        });
    }
}

// -----------------------------------------------------------------------------
// PIPELINE (The Factory)
// -----------------------------------------------------------------------------

/// Fetches every source in order, then appends the special-use ranges.
///
/// All-or-nothing: the first fetch, parse or integrity error aborts the
/// build and nothing is returned.
pub fn build_table<F: Fetch + ?Sized>(
    fetcher: &F,
    sources: &[String],
    details: BTreeMap<String, CodeDetails>,
) -> Result<RangeTable> {
    let mut builder = TableBuilder::new(details);

    for source in sources {
        log::info!("Fetching {source}");
        let text = fetcher.fetch(source)?;
        let added = builder.add_delegated(&text)?;
        log::info!("Added {added} ranges from {source}");
    }

    builder.add_special_ranges()?;
    let table = builder.finish()?;
    log::info!(
        "Built range table: {} IPv4 ranges, {} IPv6 ranges, {} codes",
        table.ipv4.len(),
        table.ipv6.len(),
        table.code_to_details.len()
    );
    Ok(table)
}

/// Loads the details dictionary named by `config` and runs [`build_table`].
pub fn build_with<F: Fetch + ?Sized>(config: &IngestConfig, fetcher: &F) -> Result<RangeTable> {
    let details = load_details(&config.details_path)?;
    build_table(fetcher, &config.sources, details)
}

/// Full rebuild with the default fetcher, returning the encoded dataset
/// bytes next to the table. Whether to persist them is the caller's call.
pub fn build_database(
    config: &IngestConfig,
    format: DataFormat,
    compression: CompressionMode,
) -> Result<(RangeTable, Vec<u8>)> {
    let fetcher = DefaultFetcher::new(config.fetch.clone())?;
    let table = build_with(config, &fetcher)?;
    let bytes = table.to_bytes(format, compression)?;
    Ok((table, bytes))
}
