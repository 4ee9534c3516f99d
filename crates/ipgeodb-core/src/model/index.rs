// crates/ipgeodb-core/src/model/index.rs
use super::table::{Ipv4Range, Ipv6Range, RangeTable};
use crate::traits::IpLookup;
use std::collections::BTreeMap;

/// A disjoint piece of the address space owned by one range.
///
/// Both families are indexed in `u128` so one implementation serves both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    start: u128,
    end: u128,
    /// Position of the owning range in the table's list for this family.
    slot: usize,
}

/// A range table plus a binary-search index per address family.
///
/// The index flattens the (possibly overlapping) ranges into disjoint
/// segments sorted by start. Each segment is labelled with the *earliest
/// inserted* range covering it, so lookups agree with the linear scan of
/// [`RangeTable`] for every address.
///
/// ```rust
/// use ipgeodb_core::{IndexedTable, IpLookup, RangeTable};
///
/// let indexed = IndexedTable::new(RangeTable::default());
/// assert_eq!(indexed.lookup("10.0.0.1").unwrap(), None);
/// ```
#[derive(Clone, Debug)]
pub struct IndexedTable {
    table: RangeTable,
    ipv4: Vec<Segment>,
    ipv6: Vec<Segment>,
}

impl IndexedTable {
    pub fn new(table: RangeTable) -> Self {
        let ipv4 = flatten(
            table
                .ipv4
                .iter()
                .map(|r| (u128::from(r.start), u128::from(r.end))),
        );
        let ipv6 = flatten(table.ipv6.iter().map(|r| (r.start(), r.end())));
        Self { table, ipv4, ipv6 }
    }

    /// Gives the table back, dropping the index.
    pub fn into_inner(self) -> RangeTable {
        self.table
    }

    /// Number of disjoint segments per family, `(ipv4, ipv6)`.
    pub fn segment_counts(&self) -> (usize, usize) {
        (self.ipv4.len(), self.ipv6.len())
    }
}

impl From<RangeTable> for IndexedTable {
    fn from(table: RangeTable) -> Self {
        Self::new(table)
    }
}

impl IpLookup for IndexedTable {
    fn table(&self) -> &RangeTable {
        &self.table
    }

    fn find_ipv4(&self, address: u32) -> Option<&Ipv4Range> {
        find(&self.ipv4, u128::from(address)).map(|slot| &self.table.ipv4[slot])
    }

    fn find_ipv6(&self, address: u128) -> Option<&Ipv6Range> {
        find(&self.ipv6, address).map(|slot| &self.table.ipv6[slot])
    }
}

fn find(segments: &[Segment], address: u128) -> Option<usize> {
    let idx = segments.partition_point(|s| s.start <= address);
    let seg = segments.get(idx.checked_sub(1)?)?;
    (address <= seg.end).then_some(seg.slot)
}

/// Builds disjoint segments from inclusive ranges given in insertion order.
///
/// Later ranges only claim the gaps that earlier ranges left uncovered.
fn flatten(ranges: impl Iterator<Item = (u128, u128)>) -> Vec<Segment> {
    // start -> (end, slot); entries never overlap.
    let mut covered: BTreeMap<u128, (u128, usize)> = BTreeMap::new();

    for (slot, (start, end)) in ranges.enumerate() {
        if start > end {
            continue;
        }

        // Next address of [start, end] not yet known to be covered.
        let mut cursor = Some(start);
        if let Some((_, &(prev_end, _))) = covered.range(..start).next_back() {
            if prev_end >= start {
                cursor = prev_end.checked_add(1).filter(|&c| c <= end);
            }
        }

        let mut gaps = Vec::new();
        if let Some(first) = cursor {
            let mut next = Some(first);
            for (&seg_start, &(seg_end, _)) in covered.range(first..=end) {
                let Some(from) = next else { break };
                if seg_start > from {
                    gaps.push((from, seg_start - 1));
                }
                next = seg_end.checked_add(1).filter(|&c| c <= end);
            }
            if let Some(from) = next {
                gaps.push((from, end));
            }
        }

        for (gap_start, gap_end) in gaps {
            covered.insert(gap_start, (gap_end, slot));
        }
    }

    covered
        .into_iter()
        .map(|(start, (end, slot))| Segment { start, end, slot })
        .collect()
}
