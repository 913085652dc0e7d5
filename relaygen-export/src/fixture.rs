//! Fixture assembly: merges decoded proofs and block metadata into export records.

use relaygen_fetch::chain::proof::TxOutProof;
use tracing::{info, warn};

use crate::{
    error::{ExportError, ProofEntryError},
    record::{BlockExportRecord, FixtureFile, TransactionProofEntry},
    source::ProofSource,
};

/// Canonicalizes a hash-like hex field for export: lowercase, `0x` prefixed.
fn canonical_hex(hex: &str) -> String {
    format!("0x{}", hex.trim_start_matches("0x").to_lowercase())
}

/// Assembles export records for a list of blocks from an injected source.
///
/// Blocks and their transactions are processed strictly sequentially, in
/// the supplied order. A failure to fetch or decode a single
/// transaction's proof omits that entry and marks the record incomplete;
/// a failure to fetch block metadata aborts the run.
pub struct FixtureAssembler<'a, S: ProofSource> {
    source: &'a S,
}

impl<'a, S: ProofSource> FixtureAssembler<'a, S> {
    /// Creates an assembler reading from `source`.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Builds the full fixture document for the supplied block hashes.
    pub async fn assemble(&self, block_hashes: &[String]) -> Result<FixtureFile, ExportError> {
        let mut records = Vec::with_capacity(block_hashes.len());
        for block_hash in block_hashes {
            records.push(self.assemble_block(block_hash).await?);
        }
        Ok(FixtureFile(records))
    }

    /// Builds the export record for a single block.
    pub async fn assemble_block(&self, block_hash: &str) -> Result<BlockExportRecord, ExportError> {
        let metadata = self
            .source
            .get_block_metadata(block_hash)
            .await
            .map_err(|source| ExportError::BlockMetadata {
                block_hash: block_hash.to_string(),
                source,
            })?;

        let mut entries = Vec::with_capacity(metadata.tx.len());
        let mut incomplete = false;
        for (tx_index, txid) in metadata.tx.iter().enumerate() {
            match self.transaction_entry(txid, tx_index, block_hash).await {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!(
                        block = %block_hash,
                        txid = %txid,
                        %err,
                        "omitting transaction proof entry"
                    );
                    incomplete = true;
                }
            }
        }

        info!(
            block = %block_hash,
            height = metadata.height,
            entries = entries.len(),
            incomplete,
            "assembled block record"
        );

        Ok(BlockExportRecord {
            hash: canonical_hex(&metadata.hash),
            merkle_root: canonical_hex(&metadata.merkle_root),
            chainwork: canonical_hex(&metadata.chainwork),
            height: metadata.height,
            header: canonical_hex(&metadata.header_hex),
            tx: entries,
            incomplete,
        })
    }

    async fn transaction_entry(
        &self,
        txid: &str,
        tx_index: usize,
        block_hash: &str,
    ) -> Result<TransactionProofEntry, ProofEntryError> {
        let proof_hex = self.source.get_transaction_proof(txid, block_hash).await?;
        let proof = TxOutProof::parse_hex(&proof_hex)?;

        Ok(TransactionProofEntry {
            tx_id: canonical_hex(txid),
            merkle_path: proof.merkle_path(),
            tx_index: tx_index as u32,
        })
    }
}
