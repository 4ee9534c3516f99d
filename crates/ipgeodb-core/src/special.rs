// crates/ipgeodb-core/src/special.rs

//! Hard-coded special-use ranges appended after all registry data.

use crate::common::AddressFamily;

/// One special-use block and the code it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRange {
    pub family: AddressFamily,
    pub cidr: &'static str,
    pub code: &'static str,
}

const fn v4(cidr: &'static str, code: &'static str) -> SpecialRange {
    SpecialRange {
        family: AddressFamily::Ipv4,
        cidr,
        code,
    }
}

const fn v6(cidr: &'static str, code: &'static str) -> SpecialRange {
    SpecialRange {
        family: AddressFamily::Ipv6,
        cidr,
        code,
    }
}

/// Loopback, private, link-local and CGNAT blocks, in insertion order.
pub const SPECIAL_USE_RANGES: [SpecialRange; 9] = [
    // IPv4 local/internal
    v4("127.0.0.0/8", "loopback"),
    v4("10.0.0.0/8", "private"),
    v4("172.16.0.0/12", "private"),
    v4("192.168.0.0/16", "private"),
    v4("169.254.0.0/16", "link-local"),
    v4("100.64.0.0/10", "cgnat"),
    // IPv6 local/internal
    v6("::1/128", "loopback"),
    v6("fc00::/7", "private"),
    v6("fe80::/10", "link-local"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr::{ipv4_cidr_to_range, ipv6_cidr_to_range};

    #[test]
    fn every_block_expands() {
        for r in SPECIAL_USE_RANGES {
            let ok = match r.family {
                AddressFamily::Ipv4 => ipv4_cidr_to_range(r.cidr).is_ok(),
                AddressFamily::Ipv6 => ipv6_cidr_to_range(r.cidr).is_ok(),
            };
            assert!(ok, "{} does not expand", r.cidr);
        }
    }

    #[test]
    fn private_ipv4_block_bounds() {
        assert_eq!(
            ipv4_cidr_to_range(SPECIAL_USE_RANGES[3].cidr).unwrap(),
            (3_232_235_520, 3_232_301_055)
        );
    }
}
