// crates/ipgeodb-core/src/search.rs

use crate::model::{Ipv4Range, Ipv6Range, RangeTable};
use crate::traits::IpLookup;

/// Baseline resolver: a linear scan in insertion order.
///
/// O(n) per query. Fine for one-off and batch lookups against a few tens of
/// thousands of ranges; use [`IndexedTable`](crate::model::IndexedTable) for
/// hot paths.
impl IpLookup for RangeTable {
    fn table(&self) -> &RangeTable {
        self
    }

    fn find_ipv4(&self, address: u32) -> Option<&Ipv4Range> {
        self.ipv4.iter().find(|r| r.contains(address))
    }

    fn find_ipv6(&self, address: u128) -> Option<&Ipv6Range> {
        self.ipv6.iter().find(|r| r.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeDetails, CodeKind};
    use std::collections::BTreeMap;

    fn details(kind: CodeKind, description: &str) -> CodeDetails {
        CodeDetails {
            kind,
            description: description.to_string(),
            country_code: None,
            flag: None,
            lat: None,
            lon: None,
        }
    }

    fn table() -> RangeTable {
        let mut codes = BTreeMap::new();
        codes.insert("XA".to_string(), details(CodeKind::Country, "First"));
        codes.insert("XB".to_string(), details(CodeKind::Country, "Second"));
        let mut t = RangeTable::new(codes);
        t.ipv4.push(Ipv4Range { start: 100, end: 200, code: "XA".into() });
        t.ipv4.push(Ipv4Range { start: 150, end: 300, code: "XB".into() });
        // Upper words differ: only a true 128-bit comparison gets this right.
        t.ipv6.push(Ipv6Range {
            start_upper: 1,
            start_lower: 10,
            end_upper: 2,
            end_lower: 5,
            code: "XA".into(),
        });
        t
    }

    #[test]
    fn first_inserted_range_wins_on_overlap() {
        let t = table();
        assert_eq!(t.lookup_code("0.0.0.150").unwrap(), Some("XA"));
        assert_eq!(t.lookup_code("0.0.0.201").unwrap(), Some("XB"));
        assert_eq!(t.lookup_code("0.0.0.99").unwrap(), None);
    }

    #[test]
    fn ipv6_bounds_compare_as_128_bit_values() {
        let t = table();
        // (1, 20) lies inside (1,10)..=(2,5) although 20 > 5.
        assert_eq!(t.lookup_code("0:0:0:1:0:0:0:14").unwrap(), Some("XA"));
        // (2, 3) is inside although 3 < 10.
        assert_eq!(t.lookup_code("0:0:0:2:0:0:0:3").unwrap(), Some("XA"));
        assert_eq!(t.lookup_code("0:0:0:2:0:0:0:6").unwrap(), None);
        assert_eq!(t.lookup_code("0:0:0:1:0:0:0:9").unwrap(), None);
    }

    #[test]
    fn text_without_separators_is_not_found() {
        let t = table();
        assert_eq!(t.lookup("localhost").unwrap(), None);
        assert!(t.lookup("1.2.3").is_err());
    }

    #[test]
    fn ranges_for_code_lists_v4_then_v6() {
        let t = table();
        let ranges = t.ranges_for_code("XA");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, "0.0.0.100");
        assert_eq!(ranges[0].end, "0.0.0.200");
        assert_eq!(ranges[1].start, "0:0:0:1:0:0:0:a");
        assert_eq!(ranges[1].end, "0:0:0:2:0:0:0:5");
        assert!(t.ranges_for_code("ZZ").is_empty());
    }
}
