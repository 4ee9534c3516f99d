#![cfg(all(feature = "json", feature = "compact"))]
//! Dataset files: writing, reading back, and rejecting broken input.

use ipgeodb_core::{
    CodeDetails, CodeKind, CompressionMode, DataFormat, IndexedTable, IpDbError, IpLookup,
    Ipv4Range, Ipv6Range, RangeTable,
};
use std::collections::BTreeMap;

fn sample_table() -> RangeTable {
    let mut details = BTreeMap::new();
    details.insert(
        "JM".to_string(),
        CodeDetails {
            kind: CodeKind::Country,
            description: "Jamaica".into(),
            country_code: Some("JM".into()),
            flag: Some("🇯🇲".into()),
            lat: Some(18.25),
            lon: Some(-77.5),
        },
    );
    details.insert(
        "loopback".to_string(),
        CodeDetails {
            kind: CodeKind::Loopback,
            description: "Loopback address".into(),
            country_code: None,
            flag: None,
            lat: None,
            lon: None,
        },
    );

    let mut table = RangeTable::new(details);
    table.ipv4.push(Ipv4Range {
        start: 0xC403_BE00, // 196.3.190.0
        end: 0xC403_BEFF,
        code: "JM".into(),
    });
    table.ipv4.push(Ipv4Range {
        start: 0x7F00_0000,
        end: 0x7FFF_FFFF,
        code: "loopback".into(),
    });
    table.ipv6.push(Ipv6Range {
        start_upper: 0,
        end_upper: 0,
        start_lower: 1,
        end_lower: 1,
        code: "loopback".into(),
    });
    // Words at the top of the 64-bit range must survive every layout.
    table.ipv6.push(Ipv6Range {
        start_upper: 0xFFFF_0000_0000_0000,
        end_upper: u64::MAX,
        start_lower: 0,
        end_lower: u64::MAX,
        code: "JM".into(),
    });
    table
}

#[test]
fn every_layout_reads_back_the_same_table() {
    let table = sample_table();
    for format in [DataFormat::Binary, DataFormat::LegacyJson] {
        for compression in [CompressionMode::Gzip, CompressionMode::None] {
            let bytes = table.to_bytes(format, compression).unwrap();
            let back = RangeTable::from_bytes(&bytes).unwrap();
            assert_eq!(back, table, "{format:?} / {compression:?}");
        }
    }
}

#[test]
fn saved_dataset_loads_and_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipgeodb.bin");
    sample_table().save_as(&path).unwrap();

    let loaded = RangeTable::load_from_path(&path).unwrap();
    assert_eq!(loaded.lookup_code("196.3.190.34").unwrap(), Some("JM"));
    assert_eq!(loaded.lookup_code("::1").unwrap(), Some("loopback"));
    assert_eq!(loaded.lookup_code("ffff:1::").unwrap(), Some("JM"));

    let indexed = IndexedTable::from(loaded);
    assert_eq!(indexed.lookup_code("127.1.2.3").unwrap(), Some("loopback"));
    assert_eq!(indexed.lookup_code("8.8.8.8").unwrap(), None);

    // No temp file left behind.
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, ["ipgeodb.bin"]);
}

#[test]
fn saving_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipgeodb.json.gz");
    std::fs::write(&path, b"stale").unwrap();

    sample_table()
        .save_as_with(&path, DataFormat::LegacyJson, CompressionMode::Gzip)
        .unwrap();
    assert_eq!(RangeTable::load_from_path(&path).unwrap(), sample_table());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    match RangeTable::load_from_path(dir.path().join("absent.bin")) {
        Err(IpDbError::NotFound(msg)) => assert!(msg.contains("absent.bin")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn garbage_is_rejected() {
    assert!(matches!(
        RangeTable::from_bytes(b"definitely not a dataset"),
        Err(IpDbError::InvalidData(_))
    ));
    assert!(matches!(
        RangeTable::from_bytes(b""),
        Err(IpDbError::InvalidData(_))
    ));
    assert!(matches!(
        RangeTable::from_bytes(b"{\"ipv4\": ["),
        Err(IpDbError::Json(_))
    ));
}

#[test]
fn truncated_gzip_is_an_error() {
    let bytes = sample_table()
        .to_bytes(DataFormat::Binary, CompressionMode::Gzip)
        .unwrap();
    assert!(RangeTable::from_bytes(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn legacy_json_with_unknown_code_is_refused() {
    let text = r#"{
      "ipv4": [{"start": 1, "end": 2, "code": "XX"}],
      "ipv6": [],
      "codeToDetails": {}
    }"#;
    match RangeTable::from_bytes(text.as_bytes()) {
        Err(IpDbError::MissingCode { code, .. }) => assert_eq!(code, "XX"),
        other => panic!("expected MissingCode, got {other:?}"),
    }
}

#[test]
fn legacy_json_accepts_bigint_strings_everywhere() {
    let text = r#"{
      "ipv4": [{"start": "bigint:16909056", "end": 16909311, "code": "JM"}],
      "ipv6": [{"startUpper": "bigint:18446744073709551615",
                "endUpper": "bigint:18446744073709551615",
                "startLower": "bigint:0",
                "endLower": "bigint:18446744073709551615",
                "code": "JM"}],
      "codeToDetails": {
        "JM": {"flag": "🇯🇲", "countryCode": "JM", "type": "country",
               "description": "Jamaica", "lat": 18.25, "lon": -77.5}
      }
    }"#;
    let table = RangeTable::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(table.lookup_code("1.2.3.4").unwrap(), Some("JM"));
    assert_eq!(
        table.lookup_code("ffff:ffff:ffff:ffff::1").unwrap(),
        Some("JM")
    );
    assert_eq!(table.ipv6[0].end(), u128::MAX);
}
