//! LZ4 block-format constants shared by the block decoder and the history
//! codec.
//!
//! A compressed block is a run of *sequences*. Each sequence starts with a
//! one-byte token: the high nibble is the literal length, the low nibble the
//! match length minus [`MINMATCH`]. A nibble value of 15 means the length
//! continues in the following bytes (each `255` adds 255 and continues, the
//! first byte below 255 ends the run).

/// Minimum match length encoded by a token's low nibble.
pub const MINMATCH: usize = 4;

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

/// History window a chained block may reference: 64 KiB of previously
/// produced output.
pub const WINDOW_SIZE: usize = 64 * KB;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

/// Byte value that extends a variable-length literal or match length.
pub const LENGTH_CONTINUE: u8 = 255;

/// Split a sequence token into `(literal_length_nibble, match_length_nibble)`.
#[inline]
pub fn split_token(token: u8) -> (usize, usize) {
    (
        (token as u32 >> ML_BITS) as usize,
        (token as u32 & ML_MASK) as usize,
    )
}
