//! Export record types for the persisted fixture document.

use serde::{Deserialize, Serialize};

/// Membership proof entry for a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProofEntry {
    /// Transaction id, canonical big-endian `0x` hex.
    pub tx_id: String,

    /// Sibling hashes needed to recompute the merkle root from the
    /// transaction id, bottom-to-top, each canonical big-endian `0x` hex.
    #[serde(rename = "merklePath")]
    pub merkle_path: Vec<String>,

    /// 0-based position of the transaction within its block.
    pub tx_index: u32,
}

/// Export record for a single block.
///
/// Field names and hex canonicalization match what downstream relay test
/// suites consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExportRecord {
    /// Block hash, canonical big-endian `0x` hex.
    pub hash: String,

    /// Merkle root, canonical big-endian `0x` hex.
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,

    /// Cumulative chain work, `0x` hex.
    pub chainwork: String,

    /// Block height.
    pub height: u64,

    /// Raw serialized 80-byte block header, `0x` hex.
    pub header: String,

    /// Proof entries, preserving block order.
    pub tx: Vec<TransactionProofEntry>,

    /// Set when one or more per-transaction proofs failed and were
    /// omitted, so consumers can detect partial records.
    pub incomplete: bool,
}

/// The persisted fixture document: one record per exported block, in the
/// order the block ids were supplied. Written once per export run and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureFile(pub Vec<BlockExportRecord>);

impl FixtureFile {
    /// Serializes the document the way the fixture consumers expect it.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> BlockExportRecord {
        BlockExportRecord {
            hash: "0x57b9de95d2b6ae1d4d2105459881915973b6a28a3e4683b6d3d12d11c714ad2b"
                .to_string(),
            merkle_root: "0x4e7b21a1faa0a1b53627fdeba4e96ba4a2a7099fea4119895a0ccbd449eeb83b"
                .to_string(),
            chainwork: "0x0000000000000000000000000000000000000000000000000000000000000fca"
                .to_string(),
            height: 2021,
            header: "0x00000020".to_string(),
            tx: vec![TransactionProofEntry {
                tx_id: "0x4e7b21a1faa0a1b53627fdeba4e96ba4a2a7099fea4119895a0ccbd449eeb83b"
                    .to_string(),
                merkle_path: vec![],
                tx_index: 0,
            }],
            incomplete: false,
        }
    }

    #[test]
    fn record_serializes_with_consumer_field_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let object = value.as_object().unwrap();

        for key in ["hash", "merkleroot", "chainwork", "height", "header", "tx", "incomplete"] {
            assert!(object.contains_key(key), "missing field {key}");
        }

        let entry = &value["tx"][0];
        let entry_object = entry.as_object().unwrap();
        for key in ["tx_id", "merklePath", "tx_index"] {
            assert!(entry_object.contains_key(key), "missing field {key}");
        }
        assert_eq!(entry["merklePath"], serde_json::json!([]));
        assert_eq!(entry["tx_index"], serde_json::json!(0));
    }

    #[test]
    fn fixture_file_is_a_bare_array() {
        let fixture = FixtureFile(vec![sample_record()]);
        let json = fixture.to_json_pretty().unwrap();
        assert!(json.trim_start().starts_with('['));

        let decoded: FixtureFile = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, fixture);
    }
}
