//! Merkle-block proof fetching and deserialization functionality.

use std::io::Cursor;

use crate::chain::{
    error::ParseError,
    utils::{read_bytes, read_u32_le, read_u8, reverse_hex_bytes, skip_bytes},
};

/// Size of a serialized block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Size of a transaction or merkle-node hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Merkle-block format as returned by `gettxoutproof`:
/// <https://bitcoin.org/en/developer-reference#merkleblock>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutProof {
    // BlockHeader \[SKIPPED\] - Size\[bytes\]: 80
    /// Total number of transactions in the block.
    ///
    /// Size\[bytes\]: 4, little-endian
    tx_count: u32,
    /// Hashes included in the partial merkle tree, in bottom-up sibling
    /// order, each in little-endian wire order.
    ///
    /// Size\[bytes\]: 1 count byte + 32 per hash
    hashes: Vec<[u8; HASH_SIZE]>,
    // Flag bits describing the tree traversal \[IGNORED\]
}

impl TxOutProof {
    /// Parses a proof buffer, returning the unread remainder (the flag
    /// bits) alongside the decoded proof.
    ///
    /// The block header is skipped rather than decoded: callers fetch the
    /// header separately via `getblockheader`. The proof is trusted to
    /// target a single transaction, so the hash list is consumed in full
    /// as the linear sibling path and the flag bits are not interpreted.
    pub fn parse_from_slice(data: &[u8]) -> Result<(&[u8], Self), ParseError> {
        let mut cursor = Cursor::new(data);

        skip_bytes(
            &mut cursor,
            BLOCK_HEADER_SIZE,
            "Error skipping TxOutProof::BlockHeader",
        )?;
        let tx_count = read_u32_le(&mut cursor, "Error reading TxOutProof::TxCount")?;
        if tx_count == 0 {
            return Err(ParseError::MalformedProof(
                "declared transaction count is zero".to_string(),
            ));
        }
        let hash_count = read_u8(&mut cursor, "Error reading TxOutProof::HashCount")?;
        if u32::from(hash_count) > tx_count {
            return Err(ParseError::MalformedProof(format!(
                "hash count ({hash_count}) exceeds declared transaction count ({tx_count})"
            )));
        }
        let mut hashes = Vec::with_capacity(hash_count as usize);
        for _ in 0..hash_count {
            let bytes = read_bytes(&mut cursor, HASH_SIZE, "Error reading TxOutProof::Hash")?;
            hashes.push(bytes.try_into().expect("read_bytes returned 32 bytes"));
        }

        Ok((&data[cursor.position() as usize..], TxOutProof { tx_count, hashes }))
    }

    /// Parses a hex-encoded proof buffer as returned by the node.
    pub fn parse_hex(proof_hex: &str) -> Result<Self, ParseError> {
        let data = hex::decode(proof_hex.trim())?;
        let (_flag_bits, proof) = Self::parse_from_slice(&data)?;
        Ok(proof)
    }

    /// Total number of transactions declared by the proof.
    pub fn tx_count(&self) -> u32 {
        self.tx_count
    }

    /// Number of hashes included in the proof.
    pub fn hash_count(&self) -> usize {
        self.hashes.len()
    }

    /// The sibling path, bottom-to-top, with each wire-order hash
    /// reversed to canonical big-endian `0x` hex.
    ///
    /// Empty for a single-transaction block, where the transaction itself
    /// is the merkle root.
    pub fn merkle_path(&self) -> Vec<String> {
        self.hashes
            .iter()
            .map(|hash| {
                let wire_hex = hex::encode(hash);
                let display_hex =
                    reverse_hex_bytes(&wire_hex).expect("32-byte hash encodes to even-length hex");
                format!("0x{display_hex}")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assembles a proof buffer: 80-byte header, u32-LE tx count, u8 hash
    /// count, then the given hashes and flag bytes.
    fn make_proof(tx_count: u32, declared_hashes: u8, hashes: &[[u8; 32]], flags: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; BLOCK_HEADER_SIZE];
        data.extend_from_slice(&tx_count.to_le_bytes());
        data.push(declared_hashes);
        for hash in hashes {
            data.extend_from_slice(hash);
        }
        data.extend_from_slice(flags);
        data
    }

    #[test]
    fn single_transaction_block_yields_empty_path() {
        let data = make_proof(1, 0, &[], &[]);
        let (rest, proof) = TxOutProof::parse_from_slice(&data).unwrap();

        assert_eq!(proof.tx_count(), 1);
        assert_eq!(proof.hash_count(), 0);
        assert!(proof.merkle_path().is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn consumes_exactly_declared_hash_count() {
        let hashes = [[0x11u8; 32], [0x22u8; 32]];
        let flags = [0x1d, 0x00];
        let data = make_proof(7, 2, &hashes, &flags);

        let (rest, proof) = TxOutProof::parse_from_slice(&data).unwrap();
        assert_eq!(proof.hash_count(), 2);
        // Only the flag bits remain unread.
        assert_eq!(rest, &flags);
    }

    #[test]
    fn truncated_hash_list_is_detected() {
        // Declares 3 hashes but supplies only 2.
        let hashes = [[0xaau8; 32], [0xbbu8; 32]];
        let data = make_proof(5, 3, &hashes, &[]);

        match TxOutProof::parse_from_slice(&data) {
            Err(ParseError::TruncatedBuffer {
                context, expected, ..
            }) => {
                assert_eq!(context, "Error reading TxOutProof::Hash");
                assert_eq!(expected, HASH_SIZE);
            }
            other => panic!("expected TruncatedBuffer, got: {other:?}"),
        }
    }

    #[test]
    fn truncated_header_is_detected() {
        let data = vec![0u8; BLOCK_HEADER_SIZE - 1];
        assert!(matches!(
            TxOutProof::parse_from_slice(&data),
            Err(ParseError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn zero_transaction_count_is_rejected() {
        let data = make_proof(0, 0, &[], &[]);
        match TxOutProof::parse_from_slice(&data) {
            Err(ParseError::MalformedProof(msg)) => {
                assert!(msg.contains("zero"), "unexpected message: {msg}");
            }
            other => panic!("expected MalformedProof, got: {other:?}"),
        }
    }

    #[test]
    fn hash_count_exceeding_tx_count_is_rejected() {
        let hashes = [[0x33u8; 32], [0x44u8; 32], [0x55u8; 32]];
        let data = make_proof(2, 3, &hashes, &[]);
        assert!(matches!(
            TxOutProof::parse_from_slice(&data),
            Err(ParseError::MalformedProof(_))
        ));
    }

    #[test]
    fn path_hashes_are_reversed_to_display_order() {
        let mut wire_hash = [0u8; 32];
        wire_hash[0] = 0x01;
        wire_hash[31] = 0xff;
        let data = make_proof(4, 1, &[wire_hash], &[0x00]);

        let (_, proof) = TxOutProof::parse_from_slice(&data).unwrap();
        let path = proof.merkle_path();
        assert_eq!(path.len(), 1);
        // Wire order 01..ff becomes display order ff..01.
        assert!(path[0].starts_with("0xff"));
        assert!(path[0].ends_with("01"));
        assert_eq!(path[0].len(), 2 + 64);
    }

    #[test]
    fn parse_hex_accepts_node_output() {
        let data = make_proof(1, 0, &[], &[]);
        // Nodes emit the buffer as hex with a trailing newline.
        let proof_hex = format!("{}\n", hex::encode(&data));

        let proof = TxOutProof::parse_hex(&proof_hex).unwrap();
        assert_eq!(proof.tx_count(), 1);
        assert!(proof.merkle_path().is_empty());
    }

    #[test]
    fn parse_hex_rejects_invalid_hex() {
        assert!(matches!(
            TxOutProof::parse_hex("zz"),
            Err(ParseError::FromHex(_))
        ));
    }
}
