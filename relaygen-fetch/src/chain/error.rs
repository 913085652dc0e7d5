//! Hold error types for proof-buffer parsing and related functionality.

/// Parser Error Type.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Io Error.
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid Data Error
    #[error("Invalid Data Error: {0}")]
    InvalidData(String),

    /// Hexadecimal decoding error.
    #[error("Hex Decode Error: {0}")]
    FromHex(#[from] hex::FromHexError),

    /// Buffer shorter than its own declared lengths.
    #[error(
        "Truncated buffer: {context}: expected {expected} bytes, {remaining} remain at offset {offset}"
    )]
    TruncatedBuffer {
        /// Field being read when the buffer ran out.
        context: &'static str,
        /// Bytes the read required.
        expected: usize,
        /// Bytes left in the buffer.
        remaining: usize,
        /// Cursor offset at the start of the failed read.
        offset: u64,
    },

    /// Internally inconsistent proof counts.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Odd-length hex cannot represent a whole number of bytes.
    #[error("Odd-length hex string: {0} characters")]
    OddLengthHex(usize),
}
