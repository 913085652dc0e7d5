//! JsonRPC client implementation.

use base64::{engine::general_purpose, Engine};
use http::Uri;
use reqwest::{Client, ClientBuilder, Url};
use serde::{Deserialize, Serialize};
use std::{
    any::type_name,
    fmt, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    },
    time::Duration,
};
use tracing::error;

use crate::jsonrpc::{
    error::TransportError,
    response::{
        block::GetBlockResponse, block_header::GetBlockHeader, GetBlockCountResponse,
        GetTxOutProofResponse,
    },
};

/// Error code bitcoind returns for an unknown block or transaction.
const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

#[derive(Serialize, Deserialize, Debug)]
struct RpcRequest<T> {
    jsonrpc: String,
    method: String,
    params: T,
    id: i32,
}

#[derive(Serialize, Deserialize, Debug)]
struct RpcResponse<T> {
    id: i64,
    jsonrpc: Option<String>,
    result: Option<T>,
    error: Option<RpcError>,
}

/// JsonRPC error object returned by the node.
#[derive(Serialize, Deserialize, Debug)]
pub struct RpcError {
    /// Error Code.
    pub code: i64,
    /// Error Message.
    pub message: String,
    /// Error Data.
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC Error (code: {}): {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Error type for JSON-RPC requests.
#[derive(Debug, thiserror::Error)]
pub enum RpcRequestError {
    /// Error variant for errors related to the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The node knows nothing about the requested block or transaction.
    #[error("Not found: {0}")]
    NotFound(RpcError),

    /// Error variant for errors related to the JSON-RPC method being called.
    #[error("Method error: {0}")]
    Method(RpcError),

    /// The provided input failed to serialize.
    #[error("request input failed to serialize: {0:?}")]
    JsonRpc(serde_json::Error),

    /// Server at capacity
    #[error("rpc server at capacity, please try again")]
    ServerWorkQueueFull,
}

// Helper function to read and parse the cookie file content.
// bitcoind's RPC server expects Basic Auth with username "__cookie__"
// and the token from the cookie file as the password.
// The cookie file itself is formatted as "__cookie__:<token>".
// This function extracts just the <token> part.
fn read_and_parse_cookie_token(cookie_path: &Path) -> Result<String, TransportError> {
    let cookie_content =
        fs::read_to_string(cookie_path).map_err(TransportError::CookieReadError)?;
    let trimmed_content = cookie_content.trim();
    if let Some(stripped) = trimmed_content.strip_prefix("__cookie__:") {
        Ok(stripped.to_string())
    } else {
        // If the prefix is not present, use the entire trimmed content.
        // This maintains compatibility with older formats or other cookie sources.
        Ok(trimmed_content.to_string())
    }
}

#[derive(Debug, Clone)]
enum AuthMethod {
    Basic { username: String, password: String },
    Cookie { cookie: String },
}

/// JsonRPC Client config data.
#[derive(Debug, Clone)]
pub struct JsonRpcConnector {
    url: Url,
    id_counter: Arc<AtomicI32>,
    client: Client,
    auth_method: AuthMethod,
}

impl JsonRpcConnector {
    /// Creates a new JsonRpcConnector with Basic Authentication.
    pub fn new_with_basic_auth(
        url: Url,
        username: String,
        password: String,
    ) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(TransportError::ReqwestError)?;

        Ok(Self {
            url,
            id_counter: Arc::new(AtomicI32::new(0)),
            client,
            auth_method: AuthMethod::Basic { username, password },
        })
    }

    /// Creates a new JsonRpcConnector with Cookie Authentication.
    pub fn new_with_cookie_auth(url: Url, cookie_path: &Path) -> Result<Self, TransportError> {
        let cookie_password = read_and_parse_cookie_token(cookie_path)?;

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .map_err(TransportError::ReqwestError)?;

        Ok(Self {
            url,
            id_counter: Arc::new(AtomicI32::new(0)),
            client,
            auth_method: AuthMethod::Cookie {
                cookie: cookie_password,
            },
        })
    }

    /// Helper function to create a connector from node config parts,
    /// probing the node before returning.
    pub async fn new_from_config_parts(
        rpc_address: SocketAddr,
        rpc_user: String,
        rpc_password: String,
        cookie_path: Option<PathBuf>,
    ) -> Result<Self, TransportError> {
        match cookie_path {
            Some(cookie_path) => JsonRpcConnector::new_with_cookie_auth(
                test_node_and_return_url(rpc_address, Some(cookie_path.clone()), None, None)
                    .await?,
                &cookie_path,
            ),
            None => JsonRpcConnector::new_with_basic_auth(
                test_node_and_return_url(
                    rpc_address,
                    None,
                    Some(rpc_user.clone()),
                    Some(rpc_password.clone()),
                )
                .await?,
                rpc_user,
                rpc_password,
            ),
        }
    }

    /// Returns the http::uri the JsonRpcConnector is configured to send requests to.
    pub fn uri(&self) -> Result<Uri, TransportError> {
        Ok(self.url.as_str().parse()?)
    }

    /// Returns the reqwest::url the JsonRpcConnector is configured to send requests to.
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Sends a jsonRPC request and returns the response.
    /// NOTE: This function currently resends the call up to 5 times on a server response of
    ///       "Work queue depth exceeded", as the node's queue can become overloaded and stop
    ///       servicing RPCs.
    async fn send_request<T: fmt::Debug + Serialize, R: fmt::Debug + for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, RpcRequestError> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);

        let max_attempts = 5;
        let mut attempts = 0;
        loop {
            attempts += 1;

            let request_builder = self
                .build_request(method, &params, id)
                .map_err(RpcRequestError::JsonRpc)?;

            let response = request_builder
                .send()
                .await
                .map_err(|e| RpcRequestError::Transport(TransportError::ReqwestError(e)))?;

            let status = response.status();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| RpcRequestError::Transport(TransportError::ReqwestError(e)))?;

            let body_str = String::from_utf8_lossy(&body_bytes);

            if body_str.contains("Work queue depth exceeded") {
                if attempts >= max_attempts {
                    return Err(RpcRequestError::ServerWorkQueueFull);
                }
                tokio::time::sleep(Duration::from_millis(500)).await;
                continue;
            }

            let code = status.as_u16();
            return match code {
                // Invalid
                ..100 | 600.. => Err(RpcRequestError::Transport(
                    TransportError::InvalidStatusCode(code),
                )),
                // Informational | Redirection
                100..200 | 300..400 => Err(RpcRequestError::Transport(
                    TransportError::UnexpectedStatusCode(code),
                )),
                // Success, and error statuses bitcoind uses for RPC-level
                // failures with a JSON body (404/500).
                200..300 | 400..600 => {
                    let response: RpcResponse<R> = match serde_json::from_slice(&body_bytes) {
                        Ok(response) => response,
                        Err(e) if (200..300).contains(&code) => {
                            return Err(RpcRequestError::Transport(TransportError::BadNodeData(
                                Box::new(e),
                                type_name::<R>(),
                            )))
                        }
                        Err(_) => {
                            return Err(RpcRequestError::Transport(
                                TransportError::ErrorStatusCode(code),
                            ))
                        }
                    };

                    match (response.error, response.result) {
                        (Some(error), _) if error.code == RPC_INVALID_ADDRESS_OR_KEY => {
                            Err(RpcRequestError::NotFound(error))
                        }
                        (Some(error), _) => Err(RpcRequestError::Method(error)),
                        (None, Some(result)) => Ok(result),
                        (None, None) => Err(RpcRequestError::Transport(
                            TransportError::EmptyResponseBody,
                        )),
                    }
                }
            };
        }
    }

    /// Builds a request from a given method, params, and id.
    fn build_request<T: fmt::Debug + Serialize>(
        &self,
        method: &str,
        params: T,
        id: i32,
    ) -> serde_json::Result<reqwest::RequestBuilder> {
        let req = RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id,
        };

        let mut request_builder = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json");

        match &self.auth_method {
            AuthMethod::Basic { username, password } => {
                request_builder = request_builder.basic_auth(username, Some(password));
            }
            AuthMethod::Cookie { cookie } => {
                request_builder = request_builder.header(
                    reqwest::header::AUTHORIZATION,
                    format!(
                        "Basic {}",
                        general_purpose::STANDARD.encode(format!("__cookie__:{cookie}"))
                    ),
                );
            }
        }

        let request_body = serde_json::to_string(&req)?;
        request_builder = request_builder.body(request_body);

        Ok(request_builder)
    }

    /// Returns the requested block by hash or height, as a [`GetBlockResponse`].
    ///
    /// bitcoind reference: [`getblock`](https://developer.bitcoin.org/reference/rpc/getblock.html)
    /// method: post
    /// tags: blockchain
    ///
    /// # Parameters
    ///
    /// - `hash_or_height`: (string, required, example="1") The hash or height for the block to be returned.
    /// - `verbosity`: (number, optional, default=1, example=1) 0 for hex encoded data, 1 for a json object
    ///   including the ordered txid list.
    pub async fn get_block(
        &self,
        hash_or_height: String,
        verbosity: Option<u8>,
    ) -> Result<GetBlockResponse, RpcRequestError> {
        let params = [
            serde_json::to_value(hash_or_height).map_err(RpcRequestError::JsonRpc)?,
            serde_json::to_value(verbosity.unwrap_or(1)).map_err(RpcRequestError::JsonRpc)?,
        ];
        self.send_request("getblock", params).await
    }

    /// If verbose is false, returns a string that is serialized, hex-encoded data for blockheader `hash`.
    /// If verbose is true, returns an Object with information about blockheader `hash`.
    ///
    /// bitcoind reference: [`getblockheader`](https://developer.bitcoin.org/reference/rpc/getblockheader.html)
    /// method: post
    /// tags: blockchain
    ///
    /// # Parameters
    ///
    /// - `hash`: (string, required) The block hash.
    /// - `verbose`: (boolean, optional, default=true) true for a json object, false for the hex encoded data.
    pub async fn get_block_header(
        &self,
        hash: String,
        verbose: bool,
    ) -> Result<GetBlockHeader, RpcRequestError> {
        let params = [
            serde_json::to_value(hash).map_err(RpcRequestError::JsonRpc)?,
            serde_json::to_value(verbose).map_err(RpcRequestError::JsonRpc)?,
        ];
        self.send_request("getblockheader", params).await
    }

    /// Returns a hex-encoded proof that the given transactions were included
    /// in a block (a raw merkle block).
    ///
    /// bitcoind reference: [`gettxoutproof`](https://developer.bitcoin.org/reference/rpc/gettxoutproof.html)
    /// method: post
    /// tags: blockchain
    ///
    /// # Parameters
    ///
    /// - `txids`: (json array of string, required) The txids to filter.
    /// - `block_hash`: (string, optional) Looks for the txids in the block with this hash;
    ///   without it the node must have an unspent output or txindex to locate the block.
    pub async fn get_tx_out_proof(
        &self,
        txids: Vec<String>,
        block_hash: Option<String>,
    ) -> Result<GetTxOutProofResponse, RpcRequestError> {
        let mut params = vec![serde_json::to_value(txids).map_err(RpcRequestError::JsonRpc)?];
        if let Some(block_hash) = block_hash {
            params.push(serde_json::to_value(block_hash).map_err(RpcRequestError::JsonRpc)?);
        }
        self.send_request("gettxoutproof", params).await
    }

    /// Returns the height of the most-work fully-validated chain.
    ///
    /// bitcoind reference: [`getblockcount`](https://developer.bitcoin.org/reference/rpc/getblockcount.html)
    /// method: post
    /// tags: blockchain
    pub async fn get_block_count(&self) -> Result<GetBlockCountResponse, RpcRequestError> {
        self.send_request::<(), GetBlockCountResponse>("getblockcount", ())
            .await
    }
}

/// Tests connection with bitcoind.
async fn test_node_connection(url: Url, auth_method: AuthMethod) -> Result<(), TransportError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let request_body = r#"{"jsonrpc":"2.0","method":"getblockcount","params":[],"id":1}"#;
    let mut request_builder = client
        .post(url.clone())
        .header("Content-Type", "application/json")
        .body(request_body);

    match &auth_method {
        AuthMethod::Basic { username, password } => {
            request_builder = request_builder.basic_auth(username, Some(password));
        }
        AuthMethod::Cookie { cookie } => {
            request_builder = request_builder.header(
                reqwest::header::AUTHORIZATION,
                format!(
                    "Basic {}",
                    general_purpose::STANDARD.encode(format!("__cookie__:{cookie}"))
                ),
            );
        }
    }

    let response = request_builder
        .send()
        .await
        .map_err(TransportError::ReqwestError)?;
    let body_bytes = response
        .bytes()
        .await
        .map_err(TransportError::ReqwestError)?;
    let _response: RpcResponse<serde_json::Value> = serde_json::from_slice(&body_bytes)
        .map_err(|e| TransportError::BadNodeData(Box::new(e), ""))?;
    Ok(())
}

/// Tries to connect to bitcoind using the provided SocketAddr and returns the correct URL.
pub async fn test_node_and_return_url(
    addr: SocketAddr,
    cookie_path: Option<PathBuf>,
    user: Option<String>,
    password: Option<String>,
) -> Result<Url, TransportError> {
    let auth_method = match cookie_path {
        Some(cookie_file_path) => {
            let cookie_password = read_and_parse_cookie_token(&cookie_file_path)?;
            AuthMethod::Cookie {
                cookie: cookie_password,
            }
        }
        None => AuthMethod::Basic {
            username: user.unwrap_or_else(|| "xxxxxx".to_string()),
            password: password.unwrap_or_else(|| "xxxxxx".to_string()),
        },
    };

    let host = match addr {
        SocketAddr::V4(_) => addr.ip().to_string(),
        SocketAddr::V6(_) => format!("[{}]", addr.ip()),
    };

    let url: Url = format!("http://{}:{}", host, addr.port()).parse()?;

    let mut interval = tokio::time::interval(Duration::from_millis(500));
    for _ in 0..3 {
        match test_node_connection(url.clone(), auth_method.clone()).await {
            Ok(_) => {
                return Ok(url);
            }
            Err(_) => {
                tokio::time::sleep(Duration::from_secs(3)).await;
            }
        }
        interval.tick().await;
    }
    error!("Error: Could not establish connection with node. Please check config and confirm node is listening at the correct address and the correct authorisation details have been entered.");
    Err(TransportError::new(format!(
        "could not establish connection with node at {url}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_token_strips_prefix() {
        let dir = std::env::temp_dir().join("relaygen-cookie-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".cookie");
        std::fs::write(&path, "__cookie__:s3cr3t-token\n").unwrap();

        let token = read_and_parse_cookie_token(&path).unwrap();
        assert_eq!(token, "s3cr3t-token");
    }

    #[test]
    fn cookie_token_without_prefix_is_used_whole() {
        let dir = std::env::temp_dir().join("relaygen-cookie-test-bare");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".cookie");
        std::fs::write(&path, "bare-token").unwrap();

        let token = read_and_parse_cookie_token(&path).unwrap();
        assert_eq!(token, "bare-token");
    }

    #[test]
    fn missing_cookie_file_is_a_cookie_read_error() {
        let path = Path::new("/nonexistent/relaygen/.cookie");
        assert!(matches!(
            read_and_parse_cookie_token(path),
            Err(TransportError::CookieReadError(_))
        ));
    }
}
