//! LZ4 block decompression core.
//!
//! Implements the sequence loop of the LZ4 block format over safe slices:
//!   - `read_variable_length`: bounded variable-length integer decoder
//!   - `decompress_block_into`: appends one decoded block to a history buffer
//!
//! # Security boundary
//!
//! Every input is untrusted. Truncated literals, offsets of zero, offsets
//! reaching before the retained history and output beyond the caller's cap
//! all return an error; nothing in this module may panic on malformed input.

use core::fmt;

use super::types::{split_token, LENGTH_CONTINUE, MINMATCH, ML_MASK, RUN_MASK};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by LZ4 block decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The compressed data is malformed or truncated, or a match points
    /// outside the available history.
    MalformedInput,
    /// Decoding would produce more than the caller's output cap (the
    /// frame's maximum block size).
    OutputLimitExceeded,
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompressError::MalformedInput => f.write_str("malformed LZ4 block"),
            DecompressError::OutputLimitExceeded => {
                f.write_str("LZ4 block decodes beyond the maximum block size")
            }
        }
    }
}

impl std::error::Error for DecompressError {}

// ─────────────────────────────────────────────────────────────────────────────
// read_variable_length
// ─────────────────────────────────────────────────────────────────────────────

/// Read the extension bytes of a literal or match length starting at `*ip`.
///
/// Accumulates bytes until one below 255 is read. Running off the end of
/// `src` is an error, as is an accumulated length that overflows `usize`.
#[inline]
fn read_variable_length(src: &[u8], ip: &mut usize) -> Result<usize, DecompressError> {
    let mut length: usize = 0;
    loop {
        let s = *src.get(*ip).ok_or(DecompressError::MalformedInput)?;
        *ip += 1;
        length = length
            .checked_add(s as usize)
            .ok_or(DecompressError::MalformedInput)?;
        if s != LENGTH_CONTINUE {
            return Ok(length);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copy
// ─────────────────────────────────────────────────────────────────────────────

/// Append `len` bytes copied from `offset` bytes back in `out`.
///
/// Overlapping copies (`offset < len`) repeat the pattern, which is how LZ4
/// encodes runs.
#[inline]
fn copy_match(out: &mut Vec<u8>, offset: usize, len: usize) {
    let start = out.len() - offset;
    if offset >= len {
        out.extend_from_within(start..start + len);
        return;
    }
    out.reserve(len);
    let mut remaining = len;
    while remaining > 0 {
        // Each pass can copy up to the distance between source and cursor.
        let chunk = remaining.min(out.len() - start);
        out.extend_from_within(start..start + chunk);
        remaining -= chunk;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_block_into
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one LZ4 block from `src`, appending the output to `out`.
///
/// Bytes already in `out` are the history matches may reference: previous
/// blocks when the frame chains blocks, nothing when blocks are
/// independent. At most `max_output` bytes are appended.
///
/// The final sequence of a block normally carries literals only; a block
/// whose input ends right after a match is accepted as well.
///
/// Returns the number of bytes appended. On error `out` may hold a partial
/// block; callers discard it.
pub fn decompress_block_into(
    src: &[u8],
    out: &mut Vec<u8>,
    max_output: usize,
) -> Result<usize, DecompressError> {
    let base = out.len();
    let limit = base
        .checked_add(max_output)
        .ok_or(DecompressError::OutputLimitExceeded)?;
    let mut ip = 0usize;

    if src.is_empty() {
        return Err(DecompressError::MalformedInput);
    }

    while ip < src.len() {
        let token = src[ip];
        ip += 1;
        let (mut literal_len, mut match_len) = split_token(token);

        // ── literals ─────────────────────────────────────────────────────────
        if literal_len == RUN_MASK as usize {
            literal_len += read_variable_length(src, &mut ip)?;
        }
        let literal_end = ip
            .checked_add(literal_len)
            .filter(|&end| end <= src.len())
            .ok_or(DecompressError::MalformedInput)?;
        if out.len() + literal_len > limit {
            return Err(DecompressError::OutputLimitExceeded);
        }
        out.extend_from_slice(&src[ip..literal_end]);
        ip = literal_end;

        if ip == src.len() {
            break; // last sequence: literals only
        }

        // ── match ────────────────────────────────────────────────────────────
        if ip + 2 > src.len() {
            return Err(DecompressError::MalformedInput);
        }
        let offset = u16::from_le_bytes([src[ip], src[ip + 1]]) as usize;
        ip += 2;
        if offset == 0 || offset > out.len() {
            return Err(DecompressError::MalformedInput);
        }

        if match_len == ML_MASK as usize {
            match_len += read_variable_length(src, &mut ip)?;
        }
        match_len = match_len
            .checked_add(MINMATCH)
            .ok_or(DecompressError::MalformedInput)?;
        if out.len() + match_len > limit {
            return Err(DecompressError::OutputLimitExceeded);
        }
        copy_match(out, offset, match_len);
    }

    Ok(out.len() - base)
}
