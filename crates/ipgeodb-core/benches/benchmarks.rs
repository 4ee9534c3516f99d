use criterion::{criterion_group, criterion_main, Criterion};
use ipgeodb_core::{
    CodeDetails, CodeKind, IndexedTable, IpLookup, Ipv4Range, Ipv6Range, RangeTable,
};
use std::collections::BTreeMap;
use std::hint::black_box;

/// 20k disjoint /24s plus a few thousand /32 IPv6 blocks, all owned by "XX".
fn synthetic_table() -> RangeTable {
    let mut details = BTreeMap::new();
    details.insert(
        "XX".to_string(),
        CodeDetails {
            kind: CodeKind::Country,
            description: "Benchmark".into(),
            country_code: Some("XX".into()),
            flag: None,
            lat: None,
            lon: None,
        },
    );
    let mut table = RangeTable::new(details);
    for i in 0..20_000u32 {
        let start = 0x0100_0000 + i * 512;
        table.ipv4.push(Ipv4Range {
            start,
            end: start + 255,
            code: "XX".into(),
        });
    }
    for i in 0..4_000u64 {
        let upper = 0x2001_0000_0000_0000 + (i << 33);
        table.ipv6.push(Ipv6Range {
            start_upper: upper,
            end_upper: upper | 0xFFFF_FFFF,
            start_lower: 0,
            end_lower: u64::MAX,
            code: "XX".into(),
        });
    }
    table
}

fn bench_lookups(c: &mut Criterion) {
    let table = synthetic_table();
    let indexed = IndexedTable::new(table.clone());

    // Near the end of the list: worst case for the linear scan.
    let v4 = "1.154.176.10";
    let v6 = "2001:1f3e:1:2:3:4:5:6";

    let mut group = c.benchmark_group("lookup");
    group.bench_function("linear_ipv4", |b| {
        b.iter(|| table.lookup_code(black_box(v4)).unwrap())
    });
    group.bench_function("indexed_ipv4", |b| {
        b.iter(|| indexed.lookup_code(black_box(v4)).unwrap())
    });
    group.bench_function("linear_ipv6", |b| {
        b.iter(|| table.lookup_code(black_box(v6)).unwrap())
    });
    group.bench_function("indexed_ipv6", |b| {
        b.iter(|| indexed.lookup_code(black_box(v6)).unwrap())
    });
    group.finish();
}

fn bench_index_build(c: &mut Criterion) {
    let table = synthetic_table();
    c.bench_function("index_build", |b| {
        b.iter(|| IndexedTable::new(black_box(table.clone())))
    });
}

criterion_group!(benches, bench_lookups, bench_index_build);
criterion_main!(benches);
