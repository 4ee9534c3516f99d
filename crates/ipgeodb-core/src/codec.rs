// crates/ipgeodb-core/src/codec.rs

//! # Address Codec
//!
//! Converts address text to the numeric form stored in the range table and
//! back. IPv4 is a plain `u32`; IPv6 is kept as an `(upper, lower)` pair of
//! `u64` words, which is also how [`Ipv6Range`](crate::model::Ipv6Range)
//! stores its bounds.
//!
//! Formatting is intentionally simple: IPv6 output never re-introduces `::`
//! compression, so `format_ipv6(parse_ipv6(s))` is the same address as `s`
//! but not necessarily the same text.

use crate::error::{IpDbError, Result};

/// Parses dotted-quad text into its numeric value.
///
/// ```rust
/// use ipgeodb_core::codec::parse_ipv4;
///
/// assert_eq!(parse_ipv4("192.168.0.1").unwrap(), 3_232_235_521);
/// assert!(parse_ipv4("192.168.0").is_err());
/// ```
pub fn parse_ipv4(text: &str) -> Result<u32> {
    let mut acc: u64 = 0;
    let mut count = 0usize;

    for part in text.trim().split('.') {
        if count == 4 {
            return Err(IpDbError::InvalidAddress(text.to_string()));
        }
        // `u8::from_str` alone would also take a leading '+'.
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IpDbError::InvalidAddress(text.to_string()));
        }
        let octet: u8 = part
            .parse()
            .map_err(|_| IpDbError::InvalidAddress(text.to_string()))?;
        acc += u64::from(octet) << (24 - 8 * count);
        count += 1;
    }

    if count != 4 {
        return Err(IpDbError::InvalidAddress(text.to_string()));
    }
    // Four u8 octets sum to at most u32::MAX.
    Ok(acc as u32)
}

/// Formats a numeric IPv4 address as dotted-quad text.
pub fn format_ipv4(value: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (value >> 24) & 0xff,
        (value >> 16) & 0xff,
        (value >> 8) & 0xff,
        value & 0xff
    )
}

/// Parses IPv6 text (with or without `::`) into `(upper, lower)` words.
///
/// ```rust
/// use ipgeodb_core::codec::parse_ipv6;
///
/// assert_eq!(parse_ipv6("::1").unwrap(), (0, 1));
/// assert_eq!(parse_ipv6("fe80::").unwrap(), (0xfe80_0000_0000_0000, 0));
/// ```
pub fn parse_ipv6(text: &str) -> Result<(u64, u64)> {
    let text = text.trim();
    let invalid = || IpDbError::InvalidAddress(text.to_string());

    let groups: Vec<&str> = match text.split_once("::") {
        Some((left, right)) => {
            if right.contains("::") {
                return Err(invalid());
            }
            let left: Vec<&str> = left.split(':').filter(|g| !g.is_empty()).collect();
            let right: Vec<&str> = right.split(':').filter(|g| !g.is_empty()).collect();
            let present = left.len() + right.len();
            if present > 8 {
                return Err(invalid());
            }
            let mut all = left;
            all.extend(std::iter::repeat("0").take(8 - present));
            all.extend(right);
            all
        }
        None => text.split(':').collect(),
    };

    if groups.len() != 8 {
        return Err(invalid());
    }

    let mut words = [0u64; 2];
    for (i, group) in groups.iter().enumerate() {
        // An empty group reads as zero, the way a left-padded "" becomes "0000".
        let value = if group.is_empty() {
            0
        } else if group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        } else {
            u16::from_str_radix(group, 16).map_err(|_| invalid())?
        };
        let word = &mut words[i / 4];
        *word = (*word << 16) | u64::from(value);
    }

    Ok((words[0], words[1]))
}

/// Formats `(upper, lower)` as eight colon-separated hex groups without
/// leading zeros and without `::` compression.
///
/// ```rust
/// use ipgeodb_core::codec::format_ipv6;
///
/// assert_eq!(format_ipv6(0xfe80_0000_0000_0000, 1), "fe80:0:0:0:0:0:0:1");
/// ```
pub fn format_ipv6(upper: u64, lower: u64) -> String {
    let mut groups = Vec::with_capacity(8);
    for word in [upper, lower] {
        for shift in [48u32, 32, 16, 0] {
            groups.push(format!("{:x}", (word >> shift) & 0xffff));
        }
    }
    groups.join(":")
}

/// Joins the two IPv6 words into a single big-endian 128-bit value.
#[inline]
pub fn ipv6_to_u128(upper: u64, lower: u64) -> u128 {
    (u128::from(upper) << 64) | u128::from(lower)
}

/// Splits a 128-bit value back into `(upper, lower)`.
#[inline]
pub fn ipv6_from_u128(value: u128) -> (u64, u64) {
    ((value >> 64) as u64, value as u64)
}
