//! Shared binary parsing utilities.

use std::io::Cursor;

use crate::chain::error::ParseError;

/// Returns the number of unread bytes left in the cursor.
pub fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    let data_len = cursor.get_ref().len() as u64;
    data_len.saturating_sub(cursor.position()) as usize
}

/// Reads the next `n` bytes, advancing the cursor by `n`.
pub fn read_bytes(
    cursor: &mut Cursor<&[u8]>,
    n: usize,
    context: &'static str,
) -> Result<Vec<u8>, ParseError> {
    let left = remaining(cursor);
    if left < n {
        return Err(ParseError::TruncatedBuffer {
            context,
            expected: n,
            remaining: left,
            offset: cursor.position(),
        });
    }
    let start = cursor.position() as usize;
    let bytes = cursor.get_ref()[start..start + n].to_vec();
    cursor.set_position((start + n) as u64);
    Ok(bytes)
}

/// Advances the cursor by `n` bytes without returning them.
pub fn skip_bytes(
    cursor: &mut Cursor<&[u8]>,
    n: usize,
    context: &'static str,
) -> Result<(), ParseError> {
    read_bytes(cursor, n, context).map(|_| ())
}

/// Reads a single byte.
pub fn read_u8(cursor: &mut Cursor<&[u8]>, context: &'static str) -> Result<u8, ParseError> {
    let bytes = read_bytes(cursor, 1, context)?;
    Ok(bytes[0])
}

/// Reads a little-endian u32.
pub fn read_u32_le(cursor: &mut Cursor<&[u8]>, context: &'static str) -> Result<u32, ParseError> {
    let bytes = read_bytes(cursor, 4, context)?;
    Ok(u32::from_le_bytes(
        bytes.try_into().expect("read_bytes returned 4 bytes"),
    ))
}

/// Reverses the byte order of a hex string, in fixed 2-character chunks.
///
/// Converts between little-endian wire hashes and big-endian display
/// hashes. Involutive: applying it twice returns the input. Fails on
/// odd-length input since a hex string must represent whole bytes.
pub fn reverse_hex_bytes(hex: &str) -> Result<String, ParseError> {
    if !hex.is_ascii() {
        return Err(ParseError::InvalidData(
            "hex string contains non-ascii characters".to_string(),
        ));
    }
    if hex.len() % 2 != 0 {
        return Err(ParseError::OddLengthHex(hex.len()));
    }
    let mut reversed = Vec::with_capacity(hex.len());
    for chunk in hex.as_bytes().chunks(2).rev() {
        reversed.extend_from_slice(chunk);
    }
    Ok(String::from_utf8(reversed).expect("chunk reversal preserves ascii"))
}
