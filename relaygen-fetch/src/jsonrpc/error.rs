//! Hold error types for the JsonRpcConnector and related functionality.

/// General error type for handling JsonRpcConnector errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Type for errors without an underlying source.
    #[error("Error: {0}")]
    JsonRpcClientError(String),

    /// Reqwest Based Errors.
    #[error("Error: HTTP Request Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// Invalid URI Errors.
    #[error("Error: Invalid URI: {0}")]
    InvalidUriError(#[from] http::uri::InvalidUri),

    /// URL Parse Errors.
    #[error("Error: Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// std::io::Error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Cookie file could not be read.
    #[error("Error: Failed to read cookie file: {0}")]
    CookieReadError(std::io::Error),

    /// Response status code outside the valid HTTP range.
    #[error("Error: Invalid HTTP status code: {0}")]
    InvalidStatusCode(u16),

    /// Informational or redirect status code where a response was expected.
    #[error("Error: Unexpected HTTP status code: {0}")]
    UnexpectedStatusCode(u16),

    /// Error status code returned by the server.
    #[error("Error: HTTP error status code: {0}")]
    ErrorStatusCode(u16),

    /// Response body contained neither a result nor an error.
    #[error("Error: Empty JsonRPC response body")]
    EmptyResponseBody,

    /// Response body that could not be deserialized as the expected type.
    #[error("Error: Bad node data for {1}: {0}")]
    BadNodeData(
        Box<dyn std::error::Error + Send + Sync + 'static>,
        &'static str,
    ),
}

impl TransportError {
    /// Constructor for errors without an underlying source
    pub fn new(msg: impl Into<String>) -> Self {
        TransportError::JsonRpcClientError(msg.into())
    }
}
