// crates/ipgeodb-core/src/cidr.rs

//! # CIDR Expander
//!
//! Turns `address/prefix` notation into inclusive numeric ranges.
//!
//! IPv4 has a second, legacy notation: registry files describe IPv4 blocks as
//! `first address + number of addresses`, so a value above 32 is read as a
//! host count rather than a prefix length.

use crate::codec::{parse_ipv4, parse_ipv6};
use crate::error::{IpDbError, Result};

/// Inclusive IPv6 range as `(start_upper, start_lower, end_upper, end_lower)`.
pub type Ipv6Bounds = (u64, u64, u64, u64);

fn split_cidr(cidr: &str) -> Result<(&str, &str)> {
    cidr.trim()
        .split_once('/')
        .ok_or_else(|| IpDbError::invalid_cidr(cidr, "missing '/'"))
}

/// Prefix length for a power-of-two host count, `None` otherwise.
fn prefix_for_count(count: u64) -> Option<u32> {
    if count == 0 || !count.is_power_of_two() || count > 1 << 32 {
        return None;
    }
    Some(32 - count.trailing_zeros())
}

fn ipv4_prefix_range(address: u32, prefix: u32) -> (u32, u32) {
    let host_bits = 32 - prefix;
    // Widened so /0 (a 32-bit shift) stays defined.
    let size = 1u64 << host_bits;
    let mask = !((size - 1) as u32);
    let start = address & mask;
    let end = (u64::from(start) + size - 1) as u32;
    (start, end)
}

/// Expands `address/value` into `(start, end)`.
///
/// `value <= 32` is a prefix length; anything larger is a host count that
/// must be a power of two no greater than 2^32.
///
/// ```rust
/// use ipgeodb_core::cidr::ipv4_cidr_to_range;
///
/// assert_eq!(
///     ipv4_cidr_to_range("192.168.0.0/16").unwrap(),
///     (3_232_235_520, 3_232_301_055)
/// );
/// // Legacy host-count form: 256 addresses == /24
/// assert_eq!(
///     ipv4_cidr_to_range("10.1.2.0/256").unwrap(),
///     ipv4_cidr_to_range("10.1.2.0/24").unwrap()
/// );
/// ```
pub fn ipv4_cidr_to_range(cidr: &str) -> Result<(u32, u32)> {
    let (address, value) = split_cidr(cidr)?;
    let value: u64 = value
        .parse()
        .map_err(|_| IpDbError::invalid_cidr(cidr, "prefix is not a number"))?;
    let address = parse_ipv4(address)?;

    let prefix = if value <= 32 {
        value as u32
    } else {
        prefix_for_count(value)
            .ok_or_else(|| IpDbError::invalid_cidr(cidr, "host count is not a power of two"))?
    };

    Ok(ipv4_prefix_range(address, prefix))
}

/// Range for a registry record given as `start` address plus `count` hosts.
///
/// Power-of-two counts are treated exactly like the equivalent prefix. Other
/// counts cannot be written as one CIDR block; they map to the literal span
/// `start ..= start + count - 1`.
pub fn ipv4_range_from_count(address: &str, count: u64) -> Result<(u32, u32)> {
    let start = parse_ipv4(address)?;
    let describe = || format!("{address}/{count}");

    if let Some(prefix) = prefix_for_count(count) {
        return Ok(ipv4_prefix_range(start, prefix));
    }
    if count == 0 {
        return Err(IpDbError::invalid_cidr(&describe(), "host count is zero"));
    }

    let end = u64::from(start) + count - 1;
    let end = u32::try_from(end)
        .map_err(|_| IpDbError::invalid_cidr(&describe(), "range runs past 255.255.255.255"))?;
    log::debug!("non power-of-two block {}: using literal span", describe());
    Ok((start, end))
}

/// Expands an IPv6 `address/prefix` into inclusive `(upper, lower)` bounds.
///
/// ```rust
/// use ipgeodb_core::cidr::ipv6_cidr_to_range;
///
/// let (su, sl, eu, el) = ipv6_cidr_to_range("fe80::/10").unwrap();
/// assert_eq!((su, sl), (0xfe80_0000_0000_0000, 0));
/// assert_eq!((eu, el), (0xfebf_ffff_ffff_ffff, u64::MAX));
/// ```
pub fn ipv6_cidr_to_range(cidr: &str) -> Result<Ipv6Bounds> {
    let (address, prefix) = split_cidr(cidr)?;
    let prefix: u32 = prefix
        .parse()
        .map_err(|_| IpDbError::invalid_cidr(cidr, "prefix is not a number"))?;
    if prefix > 128 {
        return Err(IpDbError::invalid_cidr(cidr, "prefix length must be 0..=128"));
    }

    let (upper, lower) = parse_ipv6(address)?;
    let variable_bits = 128 - prefix;

    let bounds = if variable_bits == 0 {
        (upper, lower, upper, lower)
    } else if variable_bits >= 64 {
        let upper_bits = variable_bits - 64;
        let mask = low_bits(upper_bits);
        (upper & !mask, 0, upper | mask, u64::MAX)
    } else {
        let mask = low_bits(variable_bits);
        (upper, lower & !mask, upper, lower | mask)
    };
    Ok(bounds)
}

/// A `u64` with the lowest `n` bits set (`n <= 64`).
#[inline]
fn low_bits(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}
