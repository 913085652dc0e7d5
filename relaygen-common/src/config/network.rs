//! Network type for relaygen configuration.

use serde::{Deserialize, Serialize};

/// Network type for relaygen configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet network
    Mainnet,
    /// Testnet network
    Testnet,
    /// Regtest network (for local fixture generation)
    Regtest,
}

impl Network {
    /// Returns the `-chain=` name bitcoind uses for this network.
    pub fn chain_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
        }
    }
}
