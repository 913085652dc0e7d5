//! ProofSource is the connection relaygen holds to the serving full node.

use async_trait::async_trait;
use relaygen_fetch::jsonrpc::{
    connector::{JsonRpcConnector, RpcRequestError},
    response::{block::GetBlockResponse, block_header::GetBlockHeader},
};

/// Block metadata needed to assemble one export record.
///
/// Hash-like fields are big-endian display hex as returned by the node,
/// without a `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMetadata {
    /// Block hash.
    pub hash: String,
    /// Merkle root of the block's transactions.
    pub merkle_root: String,
    /// Cumulative chain work up to this block.
    pub chainwork: String,
    /// Block height.
    pub height: u64,
    /// Raw serialized 80-byte block header, hex-encoded.
    pub header_hex: String,
    /// Transaction ids in block order.
    pub tx: Vec<String>,
}

/// An error originating from a proof source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The node has no record of the requested block or transaction.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing node failed or returned unusable data.
    #[error("critical error in backing proof source: {0}")]
    Unrecoverable(String),
}

impl From<RpcRequestError> for SourceError {
    fn from(err: RpcRequestError) -> Self {
        match err {
            RpcRequestError::NotFound(e) => SourceError::NotFound(e.to_string()),
            other => SourceError::Unrecoverable(other.to_string()),
        }
    }
}

/// A trait for fetching block metadata and per-transaction membership
/// proofs from a backend.
///
/// The assembler takes this as an injected handle, so tests can swap in
/// a double without a running node.
#[async_trait]
pub trait ProofSource: Send + Sync {
    /// Returns the metadata and ordered txid list for a block.
    async fn get_block_metadata(&self, block_hash: &str) -> Result<BlockMetadata, SourceError>;

    /// Returns the raw hex merkle-block proof for one transaction.
    async fn get_transaction_proof(
        &self,
        txid: &str,
        block_hash: &str,
    ) -> Result<String, SourceError>;
}

/// A proof source backed by a bitcoind JsonRPC connection.
#[derive(Debug, Clone)]
pub struct JsonRpcSource {
    connector: JsonRpcConnector,
}

impl JsonRpcSource {
    /// Wraps an established connector.
    pub fn new(connector: JsonRpcConnector) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl ProofSource for JsonRpcSource {
    async fn get_block_metadata(&self, block_hash: &str) -> Result<BlockMetadata, SourceError> {
        let block = match self
            .connector
            .get_block(block_hash.to_string(), Some(1))
            .await?
        {
            GetBlockResponse::Object(block) => block,
            other => {
                return Err(SourceError::Unrecoverable(format!(
                    "unexpected getblock response shape: {other:?}"
                )))
            }
        };

        let header_hex = match self
            .connector
            .get_block_header(block_hash.to_string(), false)
            .await?
        {
            GetBlockHeader::Compact(hex) => hex,
            other => {
                return Err(SourceError::Unrecoverable(format!(
                    "unexpected getblockheader response shape: {other:?}"
                )))
            }
        };

        let chainwork = block.chainwork.ok_or_else(|| {
            SourceError::Unrecoverable(format!("node omitted chainwork for block {}", block.hash))
        })?;

        Ok(BlockMetadata {
            hash: block.hash,
            merkle_root: block.merkle_root,
            chainwork,
            height: block.height,
            header_hex,
            tx: block.tx,
        })
    }

    async fn get_transaction_proof(
        &self,
        txid: &str,
        block_hash: &str,
    ) -> Result<String, SourceError> {
        let proof = self
            .connector
            .get_tx_out_proof(vec![txid.to_string()], Some(block_hash.to_string()))
            .await?;
        Ok(proof.0)
    }
}
