//! Hold error types for the fixture exporter and related functionality.

use relaygen_export::error::ExportError;
use relaygen_fetch::jsonrpc::{connector::RpcRequestError, error::TransportError};

/// Relaygen errors.
#[derive(Debug, thiserror::Error)]
pub enum RelaygendError {
    /// Configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JsonRPC connector errors.
    #[error("JsonRPC connector error: {0}")]
    TransportError(#[from] TransportError),

    /// JsonRPC request errors.
    #[error("JsonRPC request error: {0}")]
    RpcRequestError(#[from] RpcRequestError),

    /// Fixture assembly errors.
    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    /// Filesystem errors writing the fixture document.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Fixture serialization errors.
    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
