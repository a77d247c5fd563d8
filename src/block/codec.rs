//! Block codec capability used by the frame reader, and its default
//! implementation backed by a rolling output history.
//!
//! The frame engine never touches decoded bytes directly. It hands each
//! block payload to a [`BlockCodec`], learns how many bytes were produced,
//! and later asks the codec to copy those bytes out piecewise with
//! [`BlockCodec::drain`]. A codec is opened per frame, so chaining history
//! can never leak from one frame into the next.

use crate::frame::types::FrameDescriptor;

use super::decompress_core::{decompress_block_into, DecompressError};
use super::types::WINDOW_SIZE;

/// Decoder state for one frame.
pub trait BlockCodec {
    /// Open a fresh codec for the frame described by `descriptor`.
    fn open(descriptor: &FrameDescriptor) -> Self
    where
        Self: Sized;

    /// Decompress one block, appending its output to the retained history.
    /// Returns the number of bytes produced.
    fn decode(&mut self, compressed: &[u8]) -> Result<usize, DecompressError>;

    /// Record an already-uncompressed block in the history so later chained
    /// blocks can reference it. Returns `raw.len()`.
    fn inject(&mut self, raw: &[u8]) -> usize;

    /// Copy `len` bytes into `dst`, starting `back_from_end` bytes before
    /// the most recently produced byte.
    ///
    /// Callers guarantee `len <= back_from_end <= ` the size of the last
    /// produced block and `dst.len() >= len`.
    fn drain(&self, dst: &mut [u8], back_from_end: usize, len: usize);
}

// ─────────────────────────────────────────────────────────────────────────────
// HistoryDecoder
// ─────────────────────────────────────────────────────────────────────────────

/// Default [`BlockCodec`]: LZ4 block decoding over a growable history
/// buffer.
///
/// With chaining enabled the last [`WINDOW_SIZE`] bytes survive into the
/// next block; with independent blocks the history is cleared before every
/// block.
#[derive(Debug)]
pub struct HistoryDecoder {
    history: Vec<u8>,
    chained: bool,
    max_block_size: usize,
}

impl HistoryDecoder {
    /// Make room for the next block: keep only the chaining window, or
    /// nothing at all for independent blocks.
    fn prepare_block(&mut self) {
        if !self.chained {
            self.history.clear();
        } else if self.history.len() > WINDOW_SIZE {
            let excess = self.history.len() - WINDOW_SIZE;
            self.history.drain(..excess);
        }
    }

    /// Bytes currently retained (window plus last block).
    pub fn retained(&self) -> usize {
        self.history.len()
    }
}

impl BlockCodec for HistoryDecoder {
    fn open(descriptor: &FrameDescriptor) -> Self {
        let window = if descriptor.block_chaining { WINDOW_SIZE } else { 0 };
        HistoryDecoder {
            history: Vec::with_capacity(window + descriptor.max_block_size),
            chained: descriptor.block_chaining,
            max_block_size: descriptor.max_block_size,
        }
    }

    fn decode(&mut self, compressed: &[u8]) -> Result<usize, DecompressError> {
        self.prepare_block();
        let start = self.history.len();
        match decompress_block_into(compressed, &mut self.history, self.max_block_size) {
            Ok(produced) => Ok(produced),
            Err(e) => {
                self.history.truncate(start);
                Err(e)
            }
        }
    }

    fn inject(&mut self, raw: &[u8]) -> usize {
        self.prepare_block();
        self.history.extend_from_slice(raw);
        raw.len()
    }

    fn drain(&self, dst: &mut [u8], back_from_end: usize, len: usize) {
        let from = self.history.len() - back_from_end;
        dst[..len].copy_from_slice(&self.history[from..from + len]);
    }
}
