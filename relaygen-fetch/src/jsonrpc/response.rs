//! Response types for the bitcoind JsonRPC methods relaygen uses.

use serde::{Deserialize, Serialize};

pub mod block;
pub mod block_header;

/// Response to a `getblockcount` RPC request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetBlockCountResponse(pub u64);

/// Response to a `gettxoutproof` RPC request: the hex-encoded raw
/// merkle block proving inclusion of the requested transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetTxOutProofResponse(pub String);

impl GetTxOutProofResponse {
    /// The raw proof buffer as hex text.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}
