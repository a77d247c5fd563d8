//! Frame header parsing, header checksum, and the block-size table.
//!
//! Header layout after the magic number:
//!
//! ```text
//! FLG (1) | BD (1) | [content size (8)] | [dictionary ID (4)] | HC (1)
//! ```
//!
//! HC is `(XXH32(FLG..last optional field, 0) >> 8) & 0xFF`.

use std::io::Read;

use crate::displaylevel;
use crate::frame::primitive::{
    read_exact, read_le32, read_u8, skip_exact, try_read_exact, FieldBytes,
};
use crate::frame::types::{
    BlockSizeId, FrameDescriptor, FrameError, ReadOptions, BD_BLOCK_SIZE_MASK,
    BD_BLOCK_SIZE_SHIFT, BD_CONTENT_SIZE, BD_DICT_ID, CONTENT_SIZE_FIELD, DICT_ID_FIELD,
    FLG_BLOCK_CHECKSUM, FLG_BLOCK_INDEPENDENCE, FLG_CONTENT_CHECKSUM, LZ4F_MAGICNUMBER,
    LZ4F_MAGIC_SKIPPABLE_START, LZ4F_SKIPPABLE_MASK, MAGIC_SIZE,
};
use crate::xxhash::{xxh32_oneshot, FRAME_CHECKSUM_SEED};

// ─────────────────────────────────────────────────────────────────────────────
// Block-size table
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum block byte count for a 3-bit BD block size code.
///
/// 4 → 64 KiB, 5 → 256 KiB, 6 → 1 MiB, 7 → 4 MiB; any other code → 64 KiB.
#[inline]
pub fn max_block_size_for_code(code: u8) -> usize {
    BlockSizeId::from_code(code).block_size()
}

// ─────────────────────────────────────────────────────────────────────────────
// Header checksum
// ─────────────────────────────────────────────────────────────────────────────

/// Computes the single-byte LZ4 frame header checksum over the descriptor
/// bytes (FLG through the last optional field).
#[inline]
pub fn header_checksum(descriptor_bytes: &[u8]) -> u8 {
    let xxh = xxh32_oneshot(descriptor_bytes, FRAME_CHECKSUM_SEED);
    ((xxh >> 8) & 0xFF) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// FLG / BD decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Build a descriptor from the FLG and BD bytes alone.
///
/// Optional fields are filled in by the caller once read. Version and
/// reserved bits are not validated.
pub fn descriptor_from_flags(flg: u8, bd: u8) -> FrameDescriptor {
    let block_size_code = (bd >> BD_BLOCK_SIZE_SHIFT) & BD_BLOCK_SIZE_MASK;
    FrameDescriptor {
        content_checksum: flg & FLG_CONTENT_CHECKSUM != 0,
        block_chaining: flg & FLG_BLOCK_INDEPENDENCE == 0,
        block_checksum: flg & FLG_BLOCK_CHECKSUM != 0,
        dictionary_id: None,
        content_size: None,
        block_size_code,
        max_block_size: max_block_size_for_code(block_size_code),
    }
}

#[inline]
fn is_skippable_magic(magic: u32) -> bool {
    magic & LZ4F_SKIPPABLE_MASK == LZ4F_MAGIC_SKIPPABLE_START
}

// ─────────────────────────────────────────────────────────────────────────────
// read_frame_header
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the next frame header from `src`.
///
/// Returns `Ok(None)` when the source ends cleanly where a magic number
/// would start. With `options.skip_skippable_frames`, skippable frames in
/// front of the next LZ4 frame are consumed and discarded.
pub fn read_frame_header<R: Read + ?Sized>(
    src: &mut R,
    options: &ReadOptions,
) -> Result<Option<FrameDescriptor>, FrameError> {
    let magic = loop {
        let magic = match try_read_exact::<_, MAGIC_SIZE>(src, "magic number")? {
            None => return Ok(None),
            Some(bytes) => u32::from_le_bytes(bytes),
        };
        if options.skip_skippable_frames && is_skippable_magic(magic) {
            let size = read_le32(src, "skippable frame size")?;
            skip_exact(src, u64::from(size), "skippable frame")?;
            displaylevel!(4, "lz4stream: skipped skippable frame ({} bytes)\n", size);
            continue;
        }
        break magic;
    };
    if magic != LZ4F_MAGICNUMBER {
        return Err(FrameError::MalformedFrame { magic });
    }

    let descriptor = read_frame_descriptor(src)?;
    displaylevel!(
        4,
        "lz4stream: frame header: block max {} bytes, chaining {}, block checksum {}, content checksum {}\n",
        descriptor.max_block_size,
        descriptor.block_chaining,
        descriptor.block_checksum,
        descriptor.content_checksum
    );
    Ok(Some(descriptor))
}

/// Parse the descriptor fields that follow the magic number, verifying the
/// header checksum.
pub fn read_frame_descriptor<R: Read + ?Sized>(src: &mut R) -> Result<FrameDescriptor, FrameError> {
    let mut raw = FieldBytes::new();

    let flg_bd: [u8; 2] = read_exact(src, "frame flags")?;
    raw.push(&flg_bd);
    let [flg, bd] = flg_bd;
    let mut descriptor = descriptor_from_flags(flg, bd);

    if bd & BD_CONTENT_SIZE != 0 {
        let size: [u8; CONTENT_SIZE_FIELD] = read_exact(src, "content size")?;
        raw.push(&size);
        descriptor.content_size = Some(u64::from_le_bytes(size));
    }
    if bd & BD_DICT_ID != 0 {
        let id: [u8; DICT_ID_FIELD] = read_exact(src, "dictionary id")?;
        raw.push(&id);
        descriptor.dictionary_id = Some(u32::from_le_bytes(id));
    }

    let computed = header_checksum(raw.as_slice());
    let stored = read_u8(src, "header checksum")?;
    if stored != computed {
        return Err(FrameError::HeaderChecksumMismatch { stored, computed });
    }
    Ok(descriptor)
}
