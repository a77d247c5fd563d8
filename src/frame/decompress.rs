//! LZ4 Frame block reader: one frame's worth of state and the per-block
//! step of the decode state machine.
//!
//! ```text
//! AwaitingFrame ──header──▶ AwaitingBlock ──block──▶ HaveCompressedBlock | HaveRawBlock
//!       ▲                        ▲                              │
//!       │                        └──────── drained ─────────────┘
//!       └──── FrameTerminated ◀── zero-length block
//! ```
//!
//! [`ActiveFrame`] owns everything scoped to a single frame: the parsed
//! descriptor, the payload buffer and the block codec. Dropping it at the
//! terminator discards chaining history, so nothing leaks into the next
//! frame.

use std::io::Read;

use crate::block::codec::{BlockCodec, HistoryDecoder};
use crate::displaylevel;
use crate::frame::header::read_frame_header;
use crate::frame::primitive::{read_exact, read_payload};
use crate::frame::types::{
    FrameDescriptor, FrameError, ReadOptions, BF_SIZE, BH_SIZE, LZ4F_BLOCKSIZE_MASK,
    LZ4F_BLOCKUNCOMPRESSED_FLAG,
};
use crate::xxhash::{frame_hasher, xxh32_oneshot, Xxh32State, FRAME_CHECKSUM_SEED};

// ─────────────────────────────────────────────────────────────────────────────
// Block header
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded 4-byte block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHeader {
    /// Zero-length block closing the frame.
    EndMark,
    /// Payload of `size` bytes; `raw` when stored uncompressed.
    Data { size: usize, raw: bool },
}

impl BlockHeader {
    pub fn parse(word: u32) -> BlockHeader {
        if word == 0 {
            return BlockHeader::EndMark;
        }
        BlockHeader::Data {
            size: (word & LZ4F_BLOCKSIZE_MASK) as usize,
            raw: word & LZ4F_BLOCKUNCOMPRESSED_FLAG != 0,
        }
    }
}

/// Result of one block step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// A compressed block decoded to this many bytes.
    Compressed(usize),
    /// An uncompressed block of this many bytes entered the history.
    Raw(usize),
    /// The terminator (and the content checksum, if any) was consumed.
    Terminated,
}

impl BlockOutcome {
    /// Bytes made available for draining.
    pub fn produced(self) -> usize {
        match self {
            BlockOutcome::Compressed(n) | BlockOutcome::Raw(n) => n,
            BlockOutcome::Terminated => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ActiveFrame
// ─────────────────────────────────────────────────────────────────────────────

/// State of the frame currently being decoded.
pub struct ActiveFrame<C: BlockCodec = HistoryDecoder> {
    descriptor: FrameDescriptor,
    codec: C,
    /// Payload buffer, `max_block_size` bytes.
    block_buf: Vec<u8>,
    /// Running XXH32 over delivered bytes; only fed when verifying.
    content_hash: Option<Xxh32State>,
    blocks: u64,
}

impl<C: BlockCodec> ActiveFrame<C> {
    /// Allocate the per-frame resources for `descriptor`.
    pub fn open(descriptor: FrameDescriptor, options: &ReadOptions) -> Self {
        let content_hash =
            (options.verify_checksums && descriptor.content_checksum).then(frame_hasher);
        ActiveFrame {
            codec: C::open(&descriptor),
            block_buf: vec![0u8; descriptor.max_block_size],
            descriptor,
            content_hash,
            blocks: 0,
        }
    }

    /// Parse the next frame header and open it. `Ok(None)` at clean end of
    /// input.
    pub fn begin<R: Read + ?Sized>(
        src: &mut R,
        options: &ReadOptions,
    ) -> Result<Option<Self>, FrameError> {
        Ok(read_frame_header(src, options)?.map(|d| Self::open(d, options)))
    }

    pub fn descriptor(&self) -> &FrameDescriptor {
        &self.descriptor
    }

    /// Read and dispatch one block.
    ///
    /// Compressed blocks go through [`BlockCodec::decode`]; raw blocks are
    /// injected into the codec history unchanged. On `Terminated` the caller
    /// drops this frame.
    pub fn next_block<R: Read + ?Sized>(
        &mut self,
        src: &mut R,
        options: &ReadOptions,
    ) -> Result<BlockOutcome, FrameError> {
        let word = u32::from_le_bytes(read_exact::<_, BH_SIZE>(src, "block size")?);
        let (size, raw) = match BlockHeader::parse(word) {
            BlockHeader::EndMark => {
                self.finish(src)?;
                return Ok(BlockOutcome::Terminated);
            }
            BlockHeader::Data { size, raw } => (size, raw),
        };

        let max = self.descriptor.max_block_size;
        if size > max {
            return Err(FrameError::BlockTooLarge { size, max });
        }
        let payload = &mut self.block_buf[..size];
        read_payload(src, payload, "block data")?;

        if self.descriptor.block_checksum {
            let stored = u32::from_le_bytes(read_exact::<_, BF_SIZE>(src, "block checksum")?);
            if options.verify_checksums {
                let computed = xxh32_oneshot(payload, FRAME_CHECKSUM_SEED);
                if stored != computed {
                    return Err(FrameError::BlockChecksumMismatch { stored, computed });
                }
            }
        }

        self.blocks += 1;
        if raw {
            Ok(BlockOutcome::Raw(self.codec.inject(payload)))
        } else {
            Ok(BlockOutcome::Compressed(self.codec.decode(payload)?))
        }
    }

    /// Consume the optional content checksum after the terminator.
    fn finish<R: Read + ?Sized>(&mut self, src: &mut R) -> Result<(), FrameError> {
        if self.descriptor.content_checksum {
            let stored = u32::from_le_bytes(read_exact::<_, BF_SIZE>(src, "content checksum")?);
            if let Some(hash) = &self.content_hash {
                let computed = hash.digest();
                if stored != computed {
                    return Err(FrameError::ContentChecksumMismatch { stored, computed });
                }
            }
        }
        displaylevel!(4, "lz4stream: frame end after {} blocks\n", self.blocks);
        Ok(())
    }

    /// Copy `dst.len()` bytes of the last block's output, starting `pending`
    /// bytes before its end.
    pub fn drain(&mut self, dst: &mut [u8], pending: usize) {
        let len = dst.len();
        self.codec.drain(dst, pending, len);
        if let Some(hash) = &mut self.content_hash {
            hash.update(dst);
        }
    }
}
