//! Fixture assembly for relaygen.
//!
//! Combines block metadata and decoded merkle membership proofs into the
//! export records persisted for downstream relay test suites.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fixture;
pub mod record;
pub mod source;

pub use fixture::FixtureAssembler;
pub use record::{BlockExportRecord, FixtureFile, TransactionProofEntry};
pub use source::{BlockMetadata, JsonRpcSource, ProofSource, SourceError};
