// Integration tests for src/block/decompress_core.rs against blocks built by
// the shared fixtures.

use lz4stream::block::{decompress_block_into, DecompressError};

use crate::frames::{literal_block, rle_block, sample_text};

fn decompress_block(src: &[u8], max_output: usize) -> Result<Vec<u8>, DecompressError> {
    let mut out = Vec::new();
    decompress_block_into(src, &mut out, max_output)?;
    Ok(out)
}

#[test]
fn literal_blocks_of_every_length_class() {
    for len in [1usize, 14, 15, 16, 269, 270, 271, 10_000] {
        let data = sample_text(len);
        assert_eq!(decompress_block(&literal_block(&data), len).unwrap(), data, "len {len}");
    }
}

#[test]
fn rle_blocks_with_long_match_lengths() {
    for len in [10usize, 24, 25, 300, 65_536] {
        let block = rle_block(b'r', len);
        assert_eq!(decompress_block(&block, len).unwrap(), vec![b'r'; len], "len {len}");
    }
}

#[test]
fn output_limit_is_exact() {
    let block = rle_block(b'r', 100);
    assert!(decompress_block(&block, 100).is_ok());
    assert_eq!(decompress_block(&block, 99), Err(DecompressError::OutputLimitExceeded));
}

#[test]
fn decode_into_appends_after_existing_history() {
    let mut out = b"history:".to_vec();
    let produced = decompress_block_into(&literal_block(b"new"), &mut out, 64).unwrap();
    assert_eq!(produced, 3);
    assert_eq!(out, b"history:new");
}

#[test]
fn match_reaching_into_history() {
    let mut out = b"0123456789".to_vec();
    // no literals, match of 6 at offset 10, then one literal
    let produced = decompress_block_into(&[0x02, 0x0A, 0x00, 0x10, b'$'], &mut out, 64).unwrap();
    assert_eq!(produced, 7);
    assert_eq!(out, b"0123456789012345$");
}

#[test]
fn truncated_blocks_are_malformed() {
    let block = rle_block(b'r', 300);
    for cut in 1..block.len() {
        let result = decompress_block(&block[..cut], 300);
        // A cut right after a complete sequence is a shorter, valid block.
        if let Ok(out) = result {
            assert!(out.len() < 300, "cut {cut}");
            continue;
        }
        assert_eq!(result, Err(DecompressError::MalformedInput), "cut {cut}");
    }
}

#[test]
fn empty_and_zero_offset_blocks() {
    assert_eq!(decompress_block(&[], 16), Err(DecompressError::MalformedInput));
    assert_eq!(
        decompress_block(&[0x10, b'a', 0x00, 0x00], 16),
        Err(DecompressError::MalformedInput)
    );
}
