//! LZ4 Frame format: header parsing and the block state machine.
//!
//! The pull-based reader built on top of this lives in [`crate::file`].

pub mod decompress;
pub mod header;
pub mod primitive;
pub mod types;

// Re-export key public API items at the module level.
pub use decompress::{ActiveFrame, BlockHeader, BlockOutcome};
pub use header::{header_checksum, max_block_size_for_code, read_frame_descriptor, read_frame_header};
pub use types::{
    BlockSizeId, DecompressStage, FrameDescriptor, FrameError, ReadOptions, LZ4F_MAGICNUMBER,
    LZ4F_MAGIC_SKIPPABLE_START,
};
