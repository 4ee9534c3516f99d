//! ipgeodb: command-line interface for ipgeodb-core
//!
//! Usage examples
//! --------------
//!
//! - Resolve addresses
//!   $ ipgeodb lookup 196.3.190.34 2a05:1500:600:1:1c00:4aff:fe00:0
//!
//! - List codes, or the ranges of one code
//!   $ ipgeodb codes
//!   $ ipgeodb ranges NL
//!
//! - Rebuild the dataset from the registries (only rewritten when it changed)
//!   $ ipgeodb update
//!   $ ipgeodb update --source ./mirror/delegated-ripencc-extended-latest
//!
//! - Convert the dataset to the legacy JSON layout
//!   $ ipgeodb convert --format json --out ipgeodb.json.gz
//!
//! Set `RUST_LOG=debug` for fetch and parse details.
mod args;

use crate::args::{CliArgs, Commands, FormatArg};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use ipgeodb_core::{CompressionMode, DataFormat, IndexedTable, IpLookup, RangeTable};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let data_path = args.data.unwrap_or_else(|| {
        RangeTable::default_data_dir().join(RangeTable::default_dataset_filename())
    });
    log::debug!("Dataset path: {}", data_path.display());

    match args.command {
        Commands::Lookup { addresses } => {
            let db = open(&data_path)?;
            for address in &addresses {
                let code = db
                    .lookup_code(address)
                    .with_context(|| format!("Cannot look up {address}"))?;
                match code.and_then(|c| db.list_codes().get(c).map(|d| (c, d))) {
                    Some((code, d)) => {
                        println!("{address}");
                        println!("  Code: {code}");
                        println!("  Type: {}", d.kind);
                        println!("  Description: {}", d.description);
                        if let Some(cc) = &d.country_code {
                            println!("  Country code: {cc}");
                        }
                        if let Some(flag) = &d.flag {
                            println!("  Flag: {flag}");
                        }
                    }
                    None => println!("{address}: not found"),
                }
            }
        }

        Commands::Codes => {
            let db = open(&data_path)?;
            for (code, d) in db.list_codes() {
                println!("{code:<12} {:<10} {}", d.kind.as_str(), d.description);
            }
        }

        Commands::Ranges { code } => {
            let db = open(&data_path)?;
            let ranges = db.ranges_for_code(&code);
            if ranges.is_empty() {
                println!("No ranges found for: {code}");
            }
            for r in ranges {
                println!("{} - {}", r.start, r.end);
            }
        }

        Commands::Stats => {
            let stats = open(&data_path)?.stats();
            println!("Dataset statistics:");
            println!("  IPv4 ranges: {}", stats.ipv4_ranges);
            println!("  IPv6 ranges: {}", stats.ipv6_ranges);
            println!("  Codes: {}", stats.codes);
        }

        #[cfg(feature = "builder")]
        Commands::Update {
            details,
            sources,
            attempts,
            timeout,
            format,
            no_compress,
        } => {
            let mut config = ipgeodb_core::IngestConfig::default();
            if let Some(details) = details {
                config.details_path = details;
            }
            if !sources.is_empty() {
                config.sources = sources;
            }
            config.fetch.attempts = attempts;
            config.fetch.timeout = std::time::Duration::from_secs(timeout);

            let (table, bytes) = ipgeodb_core::build_database(
                &config,
                data_format(format),
                compression(no_compress),
            )
            .context("Rebuilding the dataset failed; the existing file was left untouched")?;

            let current = std::fs::read(&data_path).ok();
            if current.as_deref() == Some(bytes.as_slice()) {
                println!("Dataset at {} is up to date", data_path.display());
            } else {
                ipgeodb_core::loader::common_io::write_atomic(&data_path, &bytes)
                    .with_context(|| format!("Cannot write {}", data_path.display()))?;
                let stats = table.stats();
                println!(
                    "Wrote {} ({} IPv4 / {} IPv6 ranges, {} codes)",
                    data_path.display(),
                    stats.ipv4_ranges,
                    stats.ipv6_ranges,
                    stats.codes
                );
            }
        }

        Commands::Convert {
            format,
            out,
            no_compress,
        } => {
            let table = RangeTable::load_from_path(&data_path)
                .with_context(|| format!("Cannot load {}", data_path.display()))?;
            table
                .save_as_with(&out, data_format(format), compression(no_compress))
                .with_context(|| format!("Cannot write {}", out.display()))?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}

fn open(path: &Path) -> anyhow::Result<IndexedTable> {
    let table = RangeTable::load_from_path(path)
        .with_context(|| format!("Cannot load dataset {}", path.display()))?;
    Ok(IndexedTable::new(table))
}

fn data_format(format: FormatArg) -> DataFormat {
    match format {
        FormatArg::Binary => DataFormat::Binary,
        FormatArg::Json => DataFormat::LegacyJson,
    }
}

fn compression(no_compress: bool) -> CompressionMode {
    if no_compress {
        CompressionMode::None
    } else {
        CompressionMode::preferred()
    }
}
