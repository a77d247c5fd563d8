//! LZ4 block decoding.
//!
//! The frame reader consumes blocks through the [`BlockCodec`] capability;
//! [`HistoryDecoder`] is the implementation used by default.

pub mod codec;
pub mod decompress_core;
pub mod types;

pub use codec::{BlockCodec, HistoryDecoder};
pub use decompress_core::{decompress_block_into, DecompressError};
pub use types::WINDOW_SIZE;
