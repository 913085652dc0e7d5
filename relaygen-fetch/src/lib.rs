//! A chain-fetching and merkle-proof decoding service that uses bitcoind's JsonRPC interface.
//!
//! Provides the JsonRPC connector used to talk to a full node and the
//! binary parsing of the merkle-block proof buffers it returns.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod jsonrpc;
