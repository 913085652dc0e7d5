//! Hold error types for fixture assembly.

use relaygen_fetch::chain::error::ParseError;

use crate::source::SourceError;

/// Errors fatal to an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Block metadata could not be fetched. A fixture without a valid
    /// block record is not useful, so this aborts the run.
    #[error("failed to fetch metadata for block {block_hash}: {source}")]
    BlockMetadata {
        /// The block whose metadata fetch failed.
        block_hash: String,
        /// The underlying source failure.
        #[source]
        source: SourceError,
    },
}

/// Errors isolated to a single transaction's proof entry. Caught at the
/// assembler boundary: the entry is omitted and its record marked
/// incomplete instead of aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum ProofEntryError {
    /// The proof buffer could not be fetched from the node.
    #[error("proof fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// The proof buffer could not be decoded.
    #[error("proof decode failed: {0}")]
    Decode(#[from] ParseError),
}
