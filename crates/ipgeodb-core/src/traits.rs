// crates/ipgeodb-core/src/traits.rs
use crate::codec::{format_ipv4, format_ipv6, ipv6_to_u128, parse_ipv4, parse_ipv6};
use crate::common::TableStats;
use crate::error::Result;
use crate::model::{CodeDetails, CodeRange, Ipv4Range, Ipv6Range, RangeTable};
use std::collections::BTreeMap;

/// Resolver operations over a loaded range table.
///
/// Implementors only decide *how* the owning range of a numeric address is
/// found ([`IpLookup::find_ipv4`] / [`IpLookup::find_ipv6`]); everything a
/// caller uses is provided on top of that. Two implementations ship with the
/// crate:
///
/// - [`RangeTable`]: linear scan in insertion order.
/// - [`IndexedTable`](crate::model::IndexedTable): binary search over
///   pre-flattened segments.
///
/// Both return the same answer for every address, including where ranges
/// overlap (the first inserted range wins).
///
/// # Example
///
/// ```no_run
/// use ipgeodb_core::{IpLookup, RangeTable};
///
/// let table = RangeTable::load().unwrap();
///
/// match table.lookup("196.3.190.34").unwrap() {
///     Some(details) => println!("{} ({:?})", details.description, details.country_code),
///     None => println!("not registered"),
/// }
/// ```
pub trait IpLookup {
    /// The underlying table (ranges in insertion order + dictionary).
    fn table(&self) -> &RangeTable;

    /// First range, in insertion order, containing `address`.
    fn find_ipv4(&self, address: u32) -> Option<&Ipv4Range>;

    /// First range, in insertion order, containing the 128-bit `address`.
    fn find_ipv6(&self, address: u128) -> Option<&Ipv6Range>;

    /// Code of the range owning `address`.
    ///
    /// Text containing a `.` is treated as IPv4, otherwise text containing a
    /// `:` as IPv6. Anything else is simply not found.
    fn lookup_code(&self, address: &str) -> Result<Option<&str>> {
        let code = if address.contains('.') {
            let value = parse_ipv4(address)?;
            self.find_ipv4(value).map(|r| r.code.as_str())
        } else if address.contains(':') {
            let (upper, lower) = parse_ipv6(address)?;
            self.find_ipv6(ipv6_to_u128(upper, lower))
                .map(|r| r.code.as_str())
        } else {
            None
        };
        Ok(code)
    }

    /// Details of the code owning `address`, `None` when no range matches.
    fn lookup(&self, address: &str) -> Result<Option<&CodeDetails>> {
        Ok(self
            .lookup_code(address)?
            .and_then(|code| self.table().code_to_details.get(code)))
    }

    /// The full `code -> details` dictionary.
    fn list_codes(&self) -> &BTreeMap<String, CodeDetails> {
        &self.table().code_to_details
    }

    /// All ranges owned by `code` as text, IPv4 first, each family in table
    /// order.
    fn ranges_for_code(&self, code: &str) -> Vec<CodeRange> {
        let table = self.table();
        let v4 = table
            .ipv4
            .iter()
            .filter(|r| r.code == code)
            .map(|r| CodeRange {
                start: format_ipv4(r.start),
                end: format_ipv4(r.end),
            });
        let v6 = table
            .ipv6
            .iter()
            .filter(|r| r.code == code)
            .map(|r| CodeRange {
                start: format_ipv6(r.start_upper, r.start_lower),
                end: format_ipv6(r.end_upper, r.end_lower),
            });
        v4.chain(v6).collect()
    }

    fn stats(&self) -> TableStats {
        let table = self.table();
        TableStats {
            ipv4_ranges: table.ipv4.len(),
            ipv6_ranges: table.ipv6.len(),
            codes: table.code_to_details.len(),
        }
    }
}
