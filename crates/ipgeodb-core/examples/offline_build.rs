//! Build a dataset from delegated-stats files on disk instead of the
//! registries' servers.
//!
//! ```text
//! cargo run -p ipgeodb-core --example offline_build -- \
//!     crates/ipgeodb-core/tests/fixtures /tmp/ipgeodb.bin
//! ```
use ipgeodb_core::loader::registry::Registry;
use ipgeodb_core::{build_table, load_details, DefaultFetcher, FetchConfig, IpLookup, RangeTable};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(
        args.next()
            .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures").into()),
    );
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(RangeTable::default_dataset_filename()));

    // Same file names the registries publish, just local.
    let sources: Vec<String> = Registry::ALL
        .iter()
        .filter_map(|r| r.url().rsplit('/').next())
        .map(|name| dir.join(name).to_string_lossy().into_owned())
        .collect();

    let details = load_details(dir.join(RangeTable::default_details_filename()))?;
    let fetcher = DefaultFetcher::new(FetchConfig::default())?;
    let table = build_table(&fetcher, &sources, details)?;
    table.save_as(&out)?;

    let stats = table.stats();
    println!(
        "Wrote {} ({} IPv4 / {} IPv6 ranges, {} codes)",
        out.display(),
        stats.ipv4_ranges,
        stats.ipv6_ranges,
        stats.codes
    );
    Ok(())
}
