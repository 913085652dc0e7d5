//! Relaygen config.

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use tracing::{error, info};

use relaygen_common::{Network, NodeConfig};

use crate::error::RelaygendError;

/// Config information required for relaygen.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelaygendConfig {
    /// Block hashes to export, big-endian display hex, in output order.
    pub blocks: Vec<String>,

    /// Path the fixture document is written to.
    pub output_path: PathBuf,

    /// Full node connection settings.
    pub node_settings: NodeConfig,

    /// Network chain type.
    pub network: Network,
}

impl RelaygendConfig {
    /// Performs checks on config data.
    pub(crate) fn check_config(&self) -> Result<(), RelaygendError> {
        if self.blocks.is_empty() {
            return Err(RelaygendError::ConfigError(
                "No block hashes configured, nothing to export.".to_string(),
            ));
        }

        for block_hash in &self.blocks {
            let bare = block_hash.trim_start_matches("0x");
            if bare.len() != 64 || !bare.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(RelaygendError::ConfigError(format!(
                    "Invalid block hash '{block_hash}': expected 64 hex characters."
                )));
            }
        }

        // Check node cookie authentication settings.
        if let Some(ref cookie_path) = self.node_settings.rpc_cookie_path {
            if !std::path::Path::new(cookie_path).exists() {
                return Err(RelaygendError::ConfigError(format!(
                    "Node cookie authentication is enabled, but cookie path '{:?}' does not exist.",
                    cookie_path
                )));
            }
        }

        // Ensure relaygen only connects to nodes on private addresses.
        if !is_private_listen_addr(&self.node_settings.rpc_listen_address) {
            return Err(RelaygendError::ConfigError(
                "Relaygen may only connect to a node with a private IP address.".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for RelaygendConfig {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            output_path: PathBuf::from("blocks.json"),
            node_settings: NodeConfig {
                rpc_listen_address: "127.0.0.1:18443".parse().expect("hardcoded address parses"),
                rpc_cookie_path: None,
                rpc_user: Some("xxxxxx".to_string()),
                rpc_password: Some("xxxxxx".to_string()),
            },
            network: Network::Regtest,
        }
    }
}

/// Validates that the configured `address` is either:
/// - An RFC1918 (private) IPv4 address, or
/// - An IPv6 Unique Local Address (ULA) (using `is_unique_local()`)
pub(crate) fn is_private_listen_addr(addr: &SocketAddr) -> bool {
    let ip = addr.ip();
    match ip {
        IpAddr::V4(ipv4) => ipv4.is_private() || ipv4.is_loopback(),
        IpAddr::V6(ipv6) => ipv6.is_unique_local() || ip.is_loopback(),
    }
}

/// Attempts to load config data from a TOML file at the specified path.
///
/// Configuration sources are layered: Env > TOML > Defaults. The loaded
/// or default configuration undergoes further checks before use.
pub fn load_config(file_path: &PathBuf) -> Result<RelaygendConfig, RelaygendError> {
    let figment = Figment::new()
        // 1. Base defaults from `RelaygendConfig::default()`.
        .merge(Serialized::defaults(RelaygendConfig::default()))
        // 2. Override with values from the TOML configuration file.
        .merge(Toml::file(file_path))
        // 3. Override with values from environment variables prefixed with "RELAYGEN_".
        .merge(figment::providers::Env::prefixed("RELAYGEN_").split("-"));

    match figment.extract::<RelaygendConfig>() {
        Ok(parsed_config) => {
            parsed_config.check_config()?;
            info!(
                "Successfully loaded and validated config. Base TOML file checked: '{}'",
                file_path.display()
            );
            Ok(parsed_config)
        }
        Err(figment_error) => {
            error!(
                "Failed to extract configuration using figment: {}",
                figment_error
            );
            Err(RelaygendError::ConfigError(format!(
                "Relaygen configuration loading failed during figment extract '{}' (could be TOML file or environment variables). Details: {}",
                file_path.display(),
                figment_error
            )))
        }
    }
}
