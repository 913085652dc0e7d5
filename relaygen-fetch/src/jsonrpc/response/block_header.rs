//! Types associated with the `getblockheader` RPC request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response to a `getblockheader` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GetBlockHeader {
    /// The verbose variant of the response. Returned when `verbose` is set to `true`.
    Verbose(VerboseBlockHeader),

    /// The compact variant of the response: the raw serialized header as
    /// hex. Returned when `verbose` is set to `false`.
    Compact(String),

    /// An unknown response shape.
    Unknown(serde_json::Value),
}

/// Verbose response to a `getblockheader` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerboseBlockHeader {
    /// The hash of the requested block.
    pub hash: String,

    /// The number of confirmations of this block in the best chain,
    /// or -1 if it is not in the best chain.
    pub confirmations: i64,

    /// The height of the requested block.
    pub height: u64,

    /// The version field of the requested block.
    pub version: i64,

    /// The merkle root of the requested block.
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,

    /// The block time of the requested block header in non-leap seconds since Jan 1 1970 GMT.
    pub time: i64,

    /// The nonce of the requested block header.
    pub nonce: u64,

    /// The difficulty threshold of the requested block header displayed in compact form.
    pub bits: String,

    /// Floating point number that represents the difficulty limit for this block as a multiple
    /// of the minimum difficulty for the network.
    pub difficulty: f64,

    /// Cumulative chain work for this block (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chainwork: Option<String>,

    /// The previous block hash of the requested block header.
    #[serde(
        rename = "previousblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_block_hash: Option<String>,

    /// The next block hash after the requested block header.
    #[serde(
        rename = "nextblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_block_hash: Option<String>,

    /// Catch-all for any extra/undocumented fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn verbose_json() -> &'static str {
        r#"{
          "hash": "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
          "confirmations": 2040,
          "height": 0,
          "version": 1,
          "versionHex": "00000001",
          "merkleroot": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
          "time": 1296688602,
          "mediantime": 1296688602,
          "nonce": 2,
          "bits": "207fffff",
          "difficulty": 4.656542373906925e-10,
          "chainwork": "0000000000000000000000000000000000000000000000000000000000000002",
          "nTx": 1,
          "nextblockhash": "57b9de95d2b6ae1d4d2105459881915973b6a28a3e4683b6d3d12d11c714ad2b"
        }"#
    }

    #[test]
    fn deserialize_verbose_includes_chainwork_and_extras() {
        let header: GetBlockHeader = serde_json::from_str(verbose_json()).unwrap();
        match header {
            GetBlockHeader::Verbose(v) => {
                assert_eq!(
                    v.hash,
                    "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206"
                );
                assert_eq!(v.height, 0);
                assert_eq!(
                    v.chainwork.as_deref(),
                    Some("0000000000000000000000000000000000000000000000000000000000000002")
                );
                // Genesis: no previous block.
                assert!(v.previous_block_hash.is_none());
                assert!(v.next_block_hash.is_some());
                assert_eq!(v.extra.get("nTx"), Some(&json!(1)));
            }
            other => panic!("expected Verbose variant, got: {other:?}"),
        }
    }

    #[test]
    fn compact_header_is_hex_string() {
        let s = r#""040102deadbeef""#;
        let header: GetBlockHeader = serde_json::from_str(s).unwrap();
        match header.clone() {
            GetBlockHeader::Compact(hex) => assert_eq!(hex, "040102deadbeef"),
            other => panic!("expected Compact variant, got: {other:?}"),
        }

        // Roundtrip
        let out = serde_json::to_string(&header).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn unknown_shape_falls_back_to_unknown_variant() {
        let weird = r#"{ "weird": 1, "unexpected": ["a","b","c"] }"#;
        let header: GetBlockHeader = serde_json::from_str(weird).unwrap();
        assert!(matches!(header, GetBlockHeader::Unknown(_)));
    }
}
