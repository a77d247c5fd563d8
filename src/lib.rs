// lz4r-stream: pull-based LZ4 Frame decoder

pub mod display;
pub mod config;
pub mod xxhash;
pub mod block;
pub mod frame;
pub mod file;
pub mod cli;

// ── Version constants ────────────────────────────────────────────────────────
pub const LZ4STREAM_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    LZ4STREAM_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::codec::{BlockCodec, HistoryDecoder};
pub use file::{decompress_to_vec, decompress_to_writer, Lz4FrameReader};
pub use frame::types::{DecompressStage, FrameDescriptor, FrameError, ReadOptions};
