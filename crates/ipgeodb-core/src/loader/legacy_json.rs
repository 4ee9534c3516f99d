// crates/ipgeodb-core/src/loader/legacy_json.rs

// ---------------------------------------------------------------------------
// ⚠️ FILE GUARD: This entire file is skipped if 'json' feature is missing.
// ---------------------------------------------------------------------------
#![cfg(feature = "json")]

//! The JSON dataset layout used before the native format existed.
//!
//! Plain JSON numbers cannot carry 64-bit integers exactly, so every IPv6
//! word is written as the string `"bigint:<decimal digits>"`. IPv4 bounds fit
//! and stay plain numbers. On the way in, any integer field accepts either
//! form.
//!
//! These wire types also describe the details dictionary (`details.json`),
//! which uses the same `code -> details` shape.

use crate::error::Result;
use crate::model::{CodeDetails, CodeKind, Ipv4Range, Ipv6Range, RangeTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangesJson {
    ipv4: Vec<Ipv4RangeJson>,
    ipv6: Vec<Ipv6RangeJson>,
    code_to_details: BTreeMap<String, DetailsJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Ipv4RangeJson {
    #[serde(deserialize_with = "bigint::deserialize_u32")]
    start: u32,
    #[serde(deserialize_with = "bigint::deserialize_u32")]
    end: u32,
    code: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ipv6RangeJson {
    #[serde(with = "bigint")]
    start_upper: u64,
    #[serde(with = "bigint")]
    end_upper: u64,
    #[serde(with = "bigint")]
    start_lower: u64,
    #[serde(with = "bigint")]
    end_lower: u64,
    code: String,
}

/// One entry of a `code -> details` JSON map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailsJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country_code: Option<String>,
    #[serde(rename = "type")]
    kind: CodeKind,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lon: Option<f64>,
}

impl From<DetailsJson> for CodeDetails {
    fn from(d: DetailsJson) -> Self {
        CodeDetails {
            kind: d.kind,
            description: d.description,
            country_code: d.country_code,
            flag: d.flag,
            lat: d.lat,
            lon: d.lon,
        }
    }
}

impl From<&CodeDetails> for DetailsJson {
    fn from(d: &CodeDetails) -> Self {
        DetailsJson {
            flag: d.flag.clone(),
            country_code: d.country_code.clone(),
            kind: d.kind,
            description: d.description.clone(),
            lat: d.lat,
            lon: d.lon,
        }
    }
}

pub(crate) fn encode(table: &RangeTable) -> Result<Vec<u8>> {
    let json = RangesJson {
        ipv4: table
            .ipv4
            .iter()
            .map(|r| Ipv4RangeJson {
                start: r.start,
                end: r.end,
                code: r.code.clone(),
            })
            .collect(),
        ipv6: table
            .ipv6
            .iter()
            .map(|r| Ipv6RangeJson {
                start_upper: r.start_upper,
                end_upper: r.end_upper,
                start_lower: r.start_lower,
                end_lower: r.end_lower,
                code: r.code.clone(),
            })
            .collect(),
        code_to_details: table
            .code_to_details
            .iter()
            .map(|(code, d)| (code.clone(), d.into()))
            .collect(),
    };
    Ok(serde_json::to_vec_pretty(&json)?)
}

pub(crate) fn decode(payload: &[u8]) -> Result<RangeTable> {
    let json: RangesJson = serde_json::from_slice(payload)?;
    Ok(RangeTable {
        ipv4: json
            .ipv4
            .into_iter()
            .map(|r| Ipv4Range {
                start: r.start,
                end: r.end,
                code: r.code,
            })
            .collect(),
        ipv6: json
            .ipv6
            .into_iter()
            .map(|r| Ipv6Range {
                start_upper: r.start_upper,
                end_upper: r.end_upper,
                start_lower: r.start_lower,
                end_lower: r.end_lower,
                code: r.code,
            })
            .collect(),
        code_to_details: json
            .code_to_details
            .into_iter()
            .map(|(code, d)| (code, d.into()))
            .collect(),
    })
}

pub(crate) fn decode_details(reader: impl std::io::Read) -> Result<BTreeMap<String, CodeDetails>> {
    let raw: BTreeMap<String, DetailsJson> = serde_json::from_reader(reader)?;
    Ok(raw.into_iter().map(|(code, d)| (code, d.into())).collect())
}

/// `"bigint:<digits>"` <-> `u64`.
mod bigint {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    const PREFIX: &str = "bigint:";

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{PREFIX}{value}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(BigIntVisitor)
    }

    pub fn deserialize_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = deserialize(deserializer)?;
        u32::try_from(value).map_err(|_| de::Error::custom(format!("{value} does not fit in u32")))
    }

    struct BigIntVisitor;

    impl<'de> Visitor<'de> for BigIntVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an unsigned integer or a \"bigint:<digits>\" string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative value {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            let digits = v
                .strip_prefix(PREFIX)
                .ok_or_else(|| E::custom(format!("expected \"{PREFIX}\" prefix, got \"{v}\"")))?;
            digits
                .parse()
                .map_err(|_| E::custom(format!("invalid bigint digits \"{digits}\"")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_words_use_bigint_strings() {
        let mut table = RangeTable::default();
        table.ipv6.push(Ipv6Range {
            start_upper: u64::MAX,
            end_upper: u64::MAX,
            start_lower: 0,
            end_lower: 18_446_744_073_709_551_615,
            code: "XX".into(),
        });
        table.ipv4.push(Ipv4Range {
            start: 1,
            end: u32::MAX,
            code: "XX".into(),
        });
        let text = String::from_utf8(encode(&table).unwrap()).unwrap();
        assert!(text.contains("\"startUpper\": \"bigint:18446744073709551615\""));
        assert!(text.contains("\"startLower\": \"bigint:0\""));
        assert!(text.contains("\"end\": 4294967295"));
        assert_eq!(decode(text.as_bytes()).unwrap(), table);
    }

    #[test]
    fn reads_reference_layout() {
        let text = r#"{
          "ipv4": [{"start": 2130706432, "end": 2147483647, "code": "loopback"}],
          "ipv6": [{"startUpper": "bigint:0", "endUpper": "bigint:0",
                    "startLower": "bigint:1", "endLower": 1, "code": "loopback"}],
          "codeToDetails": {
            "loopback": {"type": "loopback", "description": "Loopback address"},
            "JM": {"flag": "🇯🇲", "countryCode": "JM", "type": "country",
                   "description": "Jamaica", "lat": 18.1, "lon": -77.3}
          }
        }"#;
        let table = decode(text.as_bytes()).unwrap();
        assert_eq!(table.ipv4[0].start, 2_130_706_432);
        assert_eq!(table.ipv6[0].end_lower, 1);
        let jm = &table.code_to_details["JM"];
        assert_eq!(jm.kind, CodeKind::Country);
        assert_eq!(jm.flag.as_deref(), Some("🇯🇲"));
        assert_eq!(table.code_to_details["loopback"].flag, None);
    }

    #[test]
    fn rejects_malformed_bigints() {
        let bad = r#"{"ipv4": [], "codeToDetails": {},
            "ipv6": [{"startUpper": "big:1", "endUpper": "bigint:0",
                      "startLower": "bigint:0", "endLower": "bigint:0", "code": "x"}]}"#;
        assert!(decode(bad.as_bytes()).is_err());
    }
}
