// Integration tests for src/frame/header.rs: magic, descriptor flags,
// optional fields, header checksum and skippable frames.

use std::io::Cursor;

use lz4stream::frame::header::{header_checksum, max_block_size_for_code, read_frame_header};
use lz4stream::frame::types::{BlockSizeId, FrameError, ReadOptions};

use crate::frames::{empty_frame, header, hc, skippable_frame, FrameSpec};

// ─────────────────────────────────────────────────────────────────────────────
// Block size table
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_size_codes() {
    assert_eq!(max_block_size_for_code(4), 64 * 1024);
    assert_eq!(max_block_size_for_code(5), 256 * 1024);
    assert_eq!(max_block_size_for_code(6), 1024 * 1024);
    assert_eq!(max_block_size_for_code(7), 4 * 1024 * 1024);
}

#[test]
fn unknown_block_size_codes_fall_back_to_64k() {
    for code in 0..4u8 {
        assert_eq!(max_block_size_for_code(code), 64 * 1024, "code {code}");
        assert_eq!(BlockSizeId::from_code(code), BlockSizeId::Max64Kb);
    }
}

#[test]
fn descriptor_reports_block_size_from_bd() {
    for code in 0..8u8 {
        let spec = FrameSpec { block_size_code: code, ..FrameSpec::default() };
        let bytes = header(&spec);
        let desc = read_frame_header(&mut Cursor::new(bytes), &ReadOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(desc.block_size_code, code);
        assert_eq!(desc.max_block_size, max_block_size_for_code(code));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flags and optional fields
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flags_round_trip_through_descriptor() {
    let spec = FrameSpec {
        independent: false,
        block_checksum: true,
        content_checksum: true,
        content_size: Some(0x0102_0304_0506_0708),
        dict_id: Some(0xCAFE_F00D),
        block_size_code: 7,
    };
    let bytes = header(&spec);
    let mut src = Cursor::new(bytes.clone());
    let desc = read_frame_header(&mut src, &ReadOptions::default()).unwrap().unwrap();

    assert!(desc.block_chaining);
    assert!(desc.block_checksum);
    assert!(desc.content_checksum);
    assert_eq!(desc.content_size, Some(0x0102_0304_0506_0708));
    assert_eq!(desc.dictionary_id, Some(0xCAFE_F00D));
    assert_eq!(desc.max_block_size, 4 * 1024 * 1024);
    // Parsing stops exactly after the header checksum byte.
    assert_eq!(src.position() as usize, bytes.len());
}

#[test]
fn header_checksum_matches_fixture() {
    assert_eq!(header_checksum(&[0x64, 0x40]), 0xA7);
    assert_eq!(header_checksum(&[0x60, 0x40]), 0x82);
    assert_eq!(header_checksum(&[0x40, 0x40]), hc(&[0x40, 0x40]));
}

#[test]
fn version_and_reserved_bits_are_not_checked() {
    // FLG version 00 with reserved bit 1, BD reserved bit 7; checksum recomputed.
    let desc = [0x22u8, 0xC0];
    let mut bytes = vec![0x04, 0x22, 0x4D, 0x18];
    bytes.extend_from_slice(&desc);
    bytes.push(hc(&desc));
    let parsed = read_frame_header(&mut Cursor::new(bytes), &ReadOptions::default())
        .unwrap()
        .unwrap();
    assert!(!parsed.block_chaining);
    assert_eq!(parsed.max_block_size, 64 * 1024);
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_flipped_header_checksum_is_rejected() {
    let good = header(&FrameSpec::default());
    let last = good.len() - 1;
    for bit in 0..8 {
        let mut bad = good.clone();
        bad[last] ^= 1 << bit;
        let err = read_frame_header(&mut Cursor::new(bad), &ReadOptions::default()).unwrap_err();
        assert!(
            matches!(err, FrameError::HeaderChecksumMismatch { .. }),
            "bit {bit}: {err:?}"
        );
    }
}

#[test]
fn corrupted_descriptor_is_rejected() {
    let mut bad = header(&FrameSpec { content_size: Some(99), ..FrameSpec::default() });
    bad[6] ^= 0x01; // first content-size byte
    let err = read_frame_header(&mut Cursor::new(bad), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, FrameError::HeaderChecksumMismatch { .. }));
}

#[test]
fn wrong_magic_is_malformed() {
    let err = read_frame_header(
        &mut Cursor::new(vec![0x02, 0x21, 0x4C, 0x18, 0x40, 0x40]),
        &ReadOptions::default(),
    )
    .unwrap_err();
    match err {
        FrameError::MalformedFrame { magic } => assert_eq!(magic, 0x184C_2102),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn clean_eof_before_magic_is_end_of_stream() {
    let got = read_frame_header(&mut Cursor::new(Vec::new()), &ReadOptions::default()).unwrap();
    assert!(got.is_none());
}

#[test]
fn partial_magic_is_truncation() {
    let err = read_frame_header(&mut Cursor::new(vec![0x04, 0x22]), &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, FrameError::TruncatedStream { .. }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Skippable frames
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn skippable_frame_rejected_by_default() {
    let bytes = skippable_frame(3, b"metadata");
    let err = read_frame_header(&mut Cursor::new(bytes), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, FrameError::MalformedFrame { .. }));
}

#[test]
fn skippable_frames_stepped_over_when_enabled() {
    let mut bytes = skippable_frame(0, b"one");
    bytes.extend(skippable_frame(15, &[0u8; 300]));
    bytes.extend(empty_frame(FrameSpec::default()));
    let opts = ReadOptions::default().with_skip_skippable_frames(true);
    let mut src = Cursor::new(bytes.clone());
    let desc = read_frame_header(&mut src, &opts).unwrap();
    assert!(desc.is_some());
    // Only the 4-byte terminator of the empty frame remains.
    assert_eq!(bytes.len() - src.position() as usize, 4);
}

#[test]
fn skippable_frame_alone_is_end_of_stream_when_enabled() {
    let opts = ReadOptions::default().with_skip_skippable_frames(true);
    let got = read_frame_header(&mut Cursor::new(skippable_frame(1, b"xyz")), &opts).unwrap();
    assert!(got.is_none());
}
