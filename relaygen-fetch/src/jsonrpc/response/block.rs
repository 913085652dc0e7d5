//! Types associated with the `getblock` RPC request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response to a `getblock` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GetBlockResponse {
    /// The verbose variant of the response. Returned when `verbosity` is 1.
    Object(Box<VerboseBlock>),

    /// The raw variant of the response. Returned when `verbosity` is 0.
    Raw(String),

    /// An unknown response shape.
    Unknown(serde_json::Value),
}

/// Verbose response to a `getblock` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerboseBlock {
    /// The hash of the requested block, big-endian display hex.
    pub hash: String,

    /// The number of confirmations of this block in the best chain,
    /// or -1 if it is not in the best chain.
    pub confirmations: i64,

    /// The height of the requested block.
    pub height: u64,

    /// The version field of the requested block.
    pub version: i64,

    /// The merkle root of the requested block, big-endian display hex.
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,

    /// Transaction ids in block order, big-endian display hex.
    pub tx: Vec<String>,

    /// The block time in non-leap seconds since Jan 1 1970 GMT.
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

    /// The previous block hash of the requested block.
    #[serde(
        rename = "previousblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_block_hash: Option<String>,

    /// The next block hash after the requested block.
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

    /// bitcoind verbose response, regtest.
    fn verbose_json() -> &'static str {
        r#"{
          "hash": "57b9de95d2b6ae1d4d2105459881915973b6a28a3e4683b6d3d12d11c714ad2b",
          "confirmations": 22,
          "strippedsize": 215,
          "size": 251,
          "weight": 896,
          "height": 2021,
          "version": 536870912,
          "versionHex": "20000000",
          "merkleroot": "4e7b21a1faa0a1b53627fdeba4e96ba4a2a7099fea4119895a0ccbd449eeb83b",
          "tx": [
            "4e7b21a1faa0a1b53627fdeba4e96ba4a2a7099fea4119895a0ccbd449eeb83b"
          ],
          "time": 1592233681,
          "mediantime": 1592233680,
          "nonce": 1,
          "bits": "207fffff",
          "difficulty": 4.656542373906925e-10,
          "chainwork": "0000000000000000000000000000000000000000000000000000000000000fca",
          "nTx": 1,
          "previousblockhash": "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206"
        }"#
    }

    #[test]
    fn deserialize_verbose_block() {
        let response: GetBlockResponse = serde_json::from_str(verbose_json()).unwrap();
        let block = match response {
            GetBlockResponse::Object(block) => block,
            other => panic!("expected Object variant, got: {other:?}"),
        };

        assert_eq!(
            block.hash,
            "57b9de95d2b6ae1d4d2105459881915973b6a28a3e4683b6d3d12d11c714ad2b"
        );
        assert_eq!(block.height, 2021);
        assert_eq!(block.tx.len(), 1);
        assert_eq!(block.tx[0], block.merkle_root);
        assert_eq!(
            block.chainwork.as_deref(),
            Some("0000000000000000000000000000000000000000000000000000000000000fca")
        );
        assert_eq!(
            block.previous_block_hash.as_deref(),
            Some("0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206")
        );
        assert!(block.next_block_hash.is_none());

        // Extras
        assert_eq!(block.extra.get("nTx"), Some(&json!(1)));
        assert_eq!(block.extra.get("versionHex"), Some(&json!("20000000")));
    }

    #[test]
    fn raw_block_is_hex_string() {
        let s = r#""0100000000dead""#;
        let response: GetBlockResponse = serde_json::from_str(s).unwrap();
        match response {
            GetBlockResponse::Raw(hex) => assert_eq!(hex, "0100000000dead"),
            other => panic!("expected Raw variant, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_shape_falls_back_to_unknown_variant() {
        let weird = r#"{ "weird": 1 }"#;
        let response: GetBlockResponse = serde_json::from_str(weird).unwrap();
        assert!(matches!(response, GetBlockResponse::Unknown(_)));
    }

    #[test]
    fn roundtrip_preserves_extras() {
        let response: GetBlockResponse = serde_json::from_str(verbose_json()).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.get("mediantime"), Some(&json!(1_592_233_680)));
        assert_eq!(object.get("height"), Some(&json!(2021)));
    }
}
