//! Resolve a few addresses against the bundled dataset.
//!
//! ```text
//! cargo run -p ipgeodb-core --example basic_lookup -- 196.3.190.34 ::1
//! ```
use ipgeodb_core::{IndexedTable, IpLookup, RangeTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = RangeTable::load()?;
    let db = IndexedTable::new(table);

    let stats = db.stats();
    println!(
        "Loaded {} IPv4 ranges, {} IPv6 ranges, {} codes",
        stats.ipv4_ranges, stats.ipv6_ranges, stats.codes
    );

    let mut addresses: Vec<String> = std::env::args().skip(1).collect();
    if addresses.is_empty() {
        addresses = ["196.3.190.34", "94.79.51.169", "192.168.0.1", "::1"]
            .map(String::from)
            .to_vec();
    }

    for address in &addresses {
        match db.lookup(address)? {
            Some(d) => println!(
                "{address:<40} {} {} ({})",
                d.flag.as_deref().unwrap_or("  "),
                d.description,
                d.kind
            ),
            None => println!("{address:<40} not found"),
        }
    }
    Ok(())
}
