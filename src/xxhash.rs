//! Thin wrapper around the `xxhash-rust` crate providing the XXH32 API used
//! by the frame reader.
//!
//! XXH32 with seed 0 covers all three checksums of the frame format: the
//! single header byte, the optional per-block checksum and the optional
//! whole-content checksum.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// Seed used by every checksum in the LZ4 frame format.
pub const FRAME_CHECKSUM_SEED: u32 = 0;

/// One-shot XXH32 hash.
///
/// # Parity vectors
/// * `xxh32_oneshot(b"", 0)` == `0x02CC5D05`
/// * `xxh32_oneshot(b"hello\n", 0)` == `0x946B5BF9`
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

/// Fresh streaming state seeded for frame checksums.
#[inline]
pub fn frame_hasher() -> Xxh32State {
    Xxh32State::new(FRAME_CHECKSUM_SEED)
}
