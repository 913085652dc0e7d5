//! Full-node connection type for relaygen configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Full-node (bitcoind) connection settings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct NodeConfig {
    /// Full node JsonRPC listen address.
    pub rpc_listen_address: SocketAddr,

    /// Enable rpc cookie authentication with Some.
    /// Path to the node's cookie file.
    pub rpc_cookie_path: Option<PathBuf>,

    /// Full node rpc username.
    pub rpc_user: Option<String>,

    /// Full node rpc password.
    pub rpc_password: Option<String>,
}
