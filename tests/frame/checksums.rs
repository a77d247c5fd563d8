// Block and content checksums: always consumed, verified only when
// `ReadOptions::verify_checksums` is set.

use std::io::{Cursor, Read};

use lz4stream::{FrameError, Lz4FrameReader, ReadOptions};

use crate::frames::{sample_text, FrameBuilder, FrameSpec};

fn checked_spec() -> FrameSpec {
    FrameSpec { block_checksum: true, content_checksum: true, ..FrameSpec::default() }
}

fn decode(bytes: &[u8], options: ReadOptions) -> Result<Vec<u8>, FrameError> {
    let mut reader = Lz4FrameReader::with_options(Cursor::new(bytes), options);
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match reader.read_interactive(&mut buf)? {
            0 => return Ok(out),
            n => out.extend_from_slice(&buf[..n]),
        }
    }
}

fn verifying() -> ReadOptions {
    ReadOptions::default().with_verify_checksums(true)
}

#[test]
fn valid_checksums_accepted_in_both_modes() {
    let builder = FrameBuilder::new(checked_spec())
        .literal(&sample_text(3000))
        .raw(b"raw part")
        .rle(b'=', 50);
    let frame = builder.build();
    assert_eq!(decode(&frame, ReadOptions::default()).unwrap(), builder.content());
    assert_eq!(decode(&frame, verifying()).unwrap(), builder.content());
}

#[test]
fn corrupted_block_checksum() {
    let builder = FrameBuilder::new(checked_spec()).literal(b"payload");
    let mut frame = builder.build();
    // header (7) + block size (4) + payload (8) → first checksum byte
    frame[7 + 4 + 8] ^= 0xFF;

    assert_eq!(decode(&frame, ReadOptions::default()).unwrap(), b"payload");
    let err = decode(&frame, verifying()).unwrap_err();
    assert!(matches!(err, FrameError::BlockChecksumMismatch { .. }), "{err:?}");
}

#[test]
fn corrupted_content_checksum() {
    let builder = FrameBuilder::new(checked_spec()).raw(b"content");
    let mut frame = builder.build();
    let last = frame.len() - 1;
    frame[last] ^= 0x01;

    assert_eq!(decode(&frame, ReadOptions::default()).unwrap(), b"content");
    match decode(&frame, verifying()).unwrap_err() {
        FrameError::ContentChecksumMismatch { stored, computed } => assert_ne!(stored, computed),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn content_checksum_covers_every_block() {
    let builder = FrameBuilder::new(FrameSpec { content_checksum: true, ..FrameSpec::default() })
        .literal(b"alpha")
        .literal(b"beta");
    let mut frame = builder.build();
    // Swap the last literal byte; block checksums are off so only the
    // content hash can notice.
    let pos = frame.len() - 4 - 4 - 1;
    assert_eq!(frame[pos], b'a');
    frame[pos] = b'A';
    let err = decode(&frame, verifying()).unwrap_err();
    assert!(matches!(err, FrameError::ContentChecksumMismatch { .. }));
}

#[test]
fn content_checksum_verified_with_small_reads() {
    let builder = FrameBuilder::new(checked_spec()).literal(&sample_text(777));
    let mut reader = Lz4FrameReader::with_options(Cursor::new(builder.build()), verifying());
    let mut out = Vec::new();
    let mut buf = [0u8; 13];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, builder.content());
}

#[test]
fn checksum_error_maps_to_invalid_data() {
    let mut frame = FrameBuilder::new(checked_spec()).literal(b"x").build();
    frame[7 + 4 + 2] ^= 0x10;
    let mut reader = Lz4FrameReader::with_options(Cursor::new(frame), verifying());
    let err = reader.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<FrameError>());
    assert!(matches!(inner, Some(FrameError::BlockChecksumMismatch { .. })));
}
