//! Serde helpers for hashes
//!
//! Hashes cross the CLI boundary as `0x`-prefixed hex strings; these
//! modules plug into `#[serde(with = ...)]` for single hashes, lists of
//! hashes and lists of proofs.

use crate::types::{decode_hash32, to_hex_prefixed, Hash32};
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize/deserialize [u8; 32] as 0x-prefixed hex
pub mod hex32 {
    use super::*;

    pub fn serialize<S>(bytes: &Hash32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_hex_prefixed(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Hash32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_hash32(&s).map_err(serde::de::Error::custom)
    }
}

/// Serialize/deserialize Vec<[u8; 32]> as a list of 0x-prefixed hex strings
pub mod hex32_vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(hashes: &[Hash32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(hashes.len()))?;
        for hash in hashes {
            seq.serialize_element(&to_hex_prefixed(hash))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Hash32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| decode_hash32(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Serialize/deserialize Vec<Vec<[u8; 32]>> (one proof per operation)
pub mod hex32_nested {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(proofs: &[Vec<Hash32>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(proofs.len()))?;
        for proof in proofs {
            let hexed: Vec<String> = proof.iter().map(|h| to_hex_prefixed(h)).collect();
            seq.serialize_element(&hexed)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<Hash32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nested = Vec::<Vec<String>>::deserialize(deserializer)?;
        nested
            .iter()
            .map(|proof| {
                proof
                    .iter()
                    .map(|s| decode_hash32(s).map_err(serde::de::Error::custom))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::hex32")]
        root: [u8; 32],
        #[serde(with = "super::hex32_vec")]
        leaves: Vec<[u8; 32]>,
        #[serde(with = "super::hex32_nested")]
        proofs: Vec<Vec<[u8; 32]>>,
    }

    #[test]
    fn test_hex_fields_are_prefixed() {
        let sample = Sample {
            root: [0xab; 32],
            leaves: vec![[0x01; 32]],
            proofs: vec![vec![], vec![[0x02; 32]]],
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["root"], format!("0x{}", "ab".repeat(32)));
        assert_eq!(json["proofs"][0].as_array().unwrap().len(), 0);

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_rejects_short_hash() {
        let json = r#"{"root":"0xabcd","leaves":[],"proofs":[]}"#;
        let err = serde_json::from_str::<Sample>(json).unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }
}
