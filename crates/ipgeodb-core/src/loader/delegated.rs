// crates/ipgeodb-core/src/loader/delegated.rs

//! Parser for RIR delegated-stats files.
//!
//! ```text
//! 2|apnic|20240101|...                        <- version header (skipped)
//! apnic|*|ipv4|*|12345|summary                <- summary (skipped)
//! apnic|JP|ipv4|1.0.16.0|4096|20110412|allocated
//! apnic|AU|ipv6|2001:200::|35|19990813|allocated|A91872ED
//! ```
//!
//! Only `allocated` / `assigned` rows of type `ipv4` / `ipv6` are kept.

use crate::common::AddressFamily;

/// Country code used when a kept row leaves the column empty (APNIC's
/// regional pool convention).
pub const DEFAULT_CODE: &str = "AP";

/// One kept delegation row, borrowing from the file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delegation<'a> {
    pub registry: &'a str,
    pub code: &'a str,
    pub family: AddressFamily,
    /// First address of the block.
    pub start: &'a str,
    /// Host count for IPv4, prefix length for IPv6.
    pub value: &'a str,
    pub status: &'a str,
}

fn is_kept_status(status: &str) -> bool {
    matches!(status, "allocated" | "assigned")
}

/// Parses one line; `None` for comments, headers, summaries and any row that
/// is not an allocated/assigned address block.
pub fn parse_line(line: &str) -> Option<Delegation<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split('|');
    let registry = fields.next()?;
    let code = fields.next()?;
    let family = AddressFamily::from_record_type(fields.next()?)?;
    let start = fields.next()?;
    let value = fields.next()?;
    let _date = fields.next()?;
    let status = fields.next()?;

    if !is_kept_status(status) {
        return None;
    }

    Some(Delegation {
        registry,
        code: if code.is_empty() { DEFAULT_CODE } else { code },
        family,
        start,
        value,
        status,
    })
}

/// All kept rows of a delegated-stats document, in file order.
pub fn parse_delegated(text: &str) -> impl Iterator<Item = Delegation<'_>> {
    text.lines().filter_map(parse_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2|lacnic|20240101|1234|19870101|20240101|-0300
# a comment
lacnic|*|ipv4|*|4|summary
lacnic|*|asn|*|2|summary

lacnic|JM|ipv4|196.3.190.0|256|19930101|assigned|abc
lacnic|BR|asn|1916|1|19940101|allocated|def
lacnic|ZZ|ipv4|200.0.0.0|1024||available|
lacnic||ipv4|200.1.0.0|512|20000101|allocated|\r
lacnic|HN|ipv6|2803:100::|32|20060101|allocated|ghi
lacnic|AR|ipv6|2800::|12||reserved|
";

    #[test]
    fn keeps_only_allocated_and_assigned_blocks() {
        let rows: Vec<Delegation> = parse_delegated(SAMPLE).collect();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].code, "JM");
        assert_eq!(rows[0].family, AddressFamily::Ipv4);
        assert_eq!(rows[0].start, "196.3.190.0");
        assert_eq!(rows[0].value, "256");
        assert_eq!(rows[0].status, "assigned");

        assert_eq!(rows[1].code, DEFAULT_CODE);
        assert_eq!(rows[1].status, "allocated");

        assert_eq!(rows[2].code, "HN");
        assert_eq!(rows[2].family, AddressFamily::Ipv6);
        assert_eq!(rows[2].value, "32");
    }

    #[test]
    fn short_rows_are_ignored() {
        assert_eq!(parse_line("ripencc|NL|ipv4|1.2.3.0|256"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("#ripencc|NL|ipv4|1.2.3.0|256|x|allocated"), None);
    }
}
