//! LZ4 Frame format types, constants, and error handling.
//!
//! Covers:
//! - Wire constants (magic numbers, block-header flag, field sizes, FLG/BD bits)
//! - `BlockSizeId` and the block-size table
//! - `FrameDescriptor`, the parsed, immutable view of one frame header
//! - `DecompressStage`, the frame reader's observable state
//! - `ReadOptions`, the reader's configuration
//! - `FrameError` with `Display` + `Error` impls and the `io::Error` mapping

use core::fmt;
use std::io;

use crate::block::decompress_core::DecompressError;
use crate::block::types::{KB, MB};

// ─────────────────────────────────────────────────────────────────────────────
// Frame format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Magic number opening every LZ4 frame (little-endian on the wire).
pub const LZ4F_MAGICNUMBER: u32 = 0x184D_2204;

/// First skippable-frame magic; the low nibble may take any value.
pub const LZ4F_MAGIC_SKIPPABLE_START: u32 = 0x184D_2A50;

/// Mask selecting the fixed bits of a skippable-frame magic.
pub const LZ4F_SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;

/// High bit of a block header: the payload is stored uncompressed.
pub const LZ4F_BLOCKUNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Low 31 bits of a block header: payload byte count.
pub const LZ4F_BLOCKSIZE_MASK: u32 = 0x7FFF_FFFF;

/// Block header size in bytes.
pub const BH_SIZE: usize = 4;

/// Block checksum / content checksum size in bytes.
pub const BF_SIZE: usize = 4;

/// Magic number size in bytes.
pub const MAGIC_SIZE: usize = 4;

/// Size of the optional content-size header field.
pub const CONTENT_SIZE_FIELD: usize = 8;

/// Size of the optional dictionary-ID header field.
pub const DICT_ID_FIELD: usize = 4;

// FLG byte (low byte of FLG_BD)
pub const FLG_BLOCK_INDEPENDENCE: u8 = 1 << 5;
pub const FLG_BLOCK_CHECKSUM: u8 = 1 << 4;
pub const FLG_CONTENT_CHECKSUM: u8 = 1 << 2;

// BD byte (high byte of FLG_BD)
pub const BD_CONTENT_SIZE: u8 = 1 << 3;
pub const BD_DICT_ID: u8 = 1 << 0;
pub const BD_BLOCK_SIZE_SHIFT: u32 = 4;
pub const BD_BLOCK_SIZE_MASK: u8 = 0x07;

// ─────────────────────────────────────────────────────────────────────────────
// BlockSizeId
// ─────────────────────────────────────────────────────────────────────────────

/// Block size identifier determining the maximum block size within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BlockSizeId {
    #[default]
    Max64Kb = 4,
    Max256Kb = 5,
    Max1Mb = 6,
    Max4Mb = 7,
}

impl BlockSizeId {
    /// Resolve a 3-bit block size code.
    ///
    /// Codes 4..=7 are the defined sizes; every other code falls back to
    /// `Max64Kb` instead of being rejected.
    pub fn from_code(code: u8) -> BlockSizeId {
        match code {
            5 => BlockSizeId::Max256Kb,
            6 => BlockSizeId::Max1Mb,
            7 => BlockSizeId::Max4Mb,
            _ => BlockSizeId::Max64Kb,
        }
    }

    /// Maximum decoded bytes per block.
    pub fn block_size(self) -> usize {
        match self {
            BlockSizeId::Max64Kb => 64 * KB,
            BlockSizeId::Max256Kb => 256 * KB,
            BlockSizeId::Max1Mb => MB,
            BlockSizeId::Max4Mb => 4 * MB,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameDescriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded LZ4 frame header parameters.
///
/// Built once by the header parser when a frame begins and dropped with the
/// frame at its terminator block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// A content checksum follows the terminator block.
    pub content_checksum: bool,
    /// Blocks may reference the output of earlier blocks in the frame.
    pub block_chaining: bool,
    /// A 4-byte checksum follows every block payload.
    pub block_checksum: bool,
    /// Dictionary ID, when the header carries one.
    pub dictionary_id: Option<u32>,
    /// Declared uncompressed size, when the header carries one. Informative
    /// only; never checked against the decoded output.
    pub content_size: Option<u64>,
    /// Raw 3-bit block size code from the BD byte.
    pub block_size_code: u8,
    /// Maximum bytes one block may decode to.
    pub max_block_size: usize,
}

impl Default for FrameDescriptor {
    fn default() -> Self {
        FrameDescriptor {
            content_checksum: false,
            block_chaining: true,
            block_checksum: false,
            dictionary_id: None,
            content_size: None,
            block_size_code: BlockSizeId::Max64Kb as u8,
            max_block_size: BlockSizeId::Max64Kb.block_size(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecompressStage
// ─────────────────────────────────────────────────────────────────────────────

/// Frame reader state.
///
/// `FrameTerminated` is reported between the terminator block of a frame
/// and the header of the next one, which makes it the final stage of a
/// stream that ended cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompressStage {
    /// No active frame; the next read parses a frame header (or finds EOF).
    #[default]
    AwaitingFrame,
    /// Inside a frame with nothing pending; the next read fetches a block.
    AwaitingBlock,
    /// Output of a compressed block is waiting to be drained.
    HaveCompressedBlock,
    /// Output of an uncompressed block is waiting to be drained.
    HaveRawBlock,
    /// The terminator block was consumed and no new frame has started.
    FrameTerminated,
}

// ─────────────────────────────────────────────────────────────────────────────
// ReadOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Frame reader configuration.
///
/// The default accepts exactly what the frame format requires: checksums
/// are consumed but not verified, and skippable frames are malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Verify block checksums and the content checksum when a frame carries
    /// them.
    pub verify_checksums: bool,
    /// Silently skip skippable frames (`0x184D2A5?`) between LZ4 frames.
    pub skip_skippable_frames: bool,
}

impl ReadOptions {
    pub fn with_verify_checksums(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    pub fn with_skip_skippable_frames(mut self, enabled: bool) -> Self {
        self.skip_skippable_frames = enabled;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors produced while decoding an LZ4 frame stream.
///
/// Every error is fatal for the reader: the stream position is undefined
/// afterwards.
#[derive(Debug)]
pub enum FrameError {
    /// A frame was expected but the magic number is wrong.
    MalformedFrame { magic: u32 },
    /// The stored header checksum byte disagrees with the computed one.
    HeaderChecksumMismatch { stored: u8, computed: u8 },
    /// The source ended in the middle of a field or block payload.
    TruncatedStream {
        field: &'static str,
        expected: usize,
        received: usize,
    },
    /// The caller asked for something a read-only, non-seekable stream
    /// cannot do.
    InvalidOperation(&'static str),
    /// A block header announces more bytes than the frame's maximum block
    /// size.
    BlockTooLarge { size: usize, max: usize },
    /// The block codec rejected a compressed block.
    BlockDecompression(DecompressError),
    /// Block checksum verification failed.
    BlockChecksumMismatch { stored: u32, computed: u32 },
    /// Content checksum verification failed.
    ContentChecksumMismatch { stored: u32, computed: u32 },
    /// The underlying source failed.
    Io(io::Error),
}

impl FrameError {
    /// The `io::ErrorKind` this error surfaces as through `Read`.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            FrameError::TruncatedStream { .. } => io::ErrorKind::UnexpectedEof,
            FrameError::InvalidOperation(_) => io::ErrorKind::Unsupported,
            FrameError::Io(e) => e.kind(),
            _ => io::ErrorKind::InvalidData,
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::MalformedFrame { magic } => {
                write!(f, "magic number expected, found {magic:#010x}")
            }
            FrameError::HeaderChecksumMismatch { stored, computed } => write!(
                f,
                "header checksum mismatch: stored {stored:#04x}, computed {computed:#04x}"
            ),
            FrameError::TruncatedStream {
                field,
                expected,
                received,
            } => write!(
                f,
                "unexpected end of stream reading {field}: expected {expected} bytes, got {received}"
            ),
            FrameError::InvalidOperation(what) => {
                write!(f, "{what} is not supported on an LZ4 decode stream")
            }
            FrameError::BlockTooLarge { size, max } => {
                write!(f, "block of {size} bytes exceeds maximum block size {max}")
            }
            FrameError::BlockDecompression(e) => write!(f, "block decompression failed: {e}"),
            FrameError::BlockChecksumMismatch { stored, computed } => write!(
                f,
                "block checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
            ),
            FrameError::ContentChecksumMismatch { stored, computed } => write!(
                f,
                "content checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
            ),
            FrameError::Io(e) => write!(f, "read error: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::BlockDecompression(e) => Some(e),
            FrameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

impl From<DecompressError> for FrameError {
    fn from(e: DecompressError) -> Self {
        FrameError::BlockDecompression(e)
    }
}

impl From<FrameError> for io::Error {
    /// Source errors pass through untouched; frame errors are wrapped so
    /// callers can recover them with `get_ref()` / `into_inner()`.
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(inner) => inner,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}
