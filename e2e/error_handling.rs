// e2e/error_handling.rs: error surfacing through the public API
//
// Every failure reaches callers both as a typed `FrameError` (from
// `read_interactive` / `decompress_to_vec`) and as an `io::Error` with a
// matching kind (from `Read::read`).

#[path = "../tests/support/frames.rs"]
mod frames;

use std::error::Error;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom};

use lz4stream::{decompress_to_vec, FrameError, Lz4FrameReader, ReadOptions};

use frames::{header, raw_frame, FrameBuilder, FrameSpec};

fn io_error_of(bytes: Vec<u8>, options: ReadOptions) -> io::Error {
    let mut reader = Lz4FrameReader::with_options(Cursor::new(bytes), options);
    let mut sink = Vec::new();
    reader.read_to_end(&mut sink).unwrap_err()
}

fn frame_error(err: &io::Error) -> &FrameError {
    err.get_ref()
        .and_then(|e| e.downcast_ref::<FrameError>())
        .expect("io::Error should wrap a FrameError")
}

// ── 1. Error kinds ───────────────────────────────────────────────────────────

#[test]
fn test_bad_magic_is_invalid_data() {
    let err = io_error_of(b"not an lz4 frame".to_vec(), ReadOptions::default());
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(matches!(frame_error(&err), FrameError::MalformedFrame { magic: 0x2074_6f6e }));
    assert_eq!(err.to_string(), "magic number expected, found 0x20746f6e");
}

#[test]
fn test_header_checksum_is_invalid_data() {
    let mut bytes = header(&FrameSpec::default());
    *bytes.last_mut().unwrap() ^= 0xFF;
    let err = io_error_of(bytes, ReadOptions::default());
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(matches!(frame_error(&err), FrameError::HeaderChecksumMismatch { .. }));
}

#[test]
fn test_truncation_is_unexpected_eof() {
    let frame = raw_frame(FrameSpec::default(), b"abcdef", 64);
    let err = io_error_of(frame[..frame.len() - 1].to_vec(), ReadOptions::default());
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    match frame_error(&err) {
        FrameError::TruncatedStream { field, expected, received } => {
            assert_eq!(*field, "block size");
            assert_eq!((*expected, *received), (4, 3));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_corrupt_block_has_source() {
    let frame = FrameBuilder::new(FrameSpec::default())
        .compressed(&[0x10, b'a', 0x09, 0x00], b"")
        .build();
    let err = decompress_to_vec(&frame).unwrap_err();
    assert!(matches!(err, FrameError::BlockDecompression(_)));
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("block decompression failed"));
}

#[test]
fn test_source_error_passes_through_unchanged() {
    struct Broken;
    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "no access"))
        }
    }
    let mut reader = Lz4FrameReader::new(Broken);
    let err = reader.read(&mut [0u8; 16]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(err.to_string(), "no access");

    match reader.read_interactive(&mut [0u8; 16]).unwrap_err() {
        FrameError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::PermissionDenied),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_interrupted_source_is_retried() {
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }
    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(ErrorKind::Interrupted.into());
            }
            let n = buf.len().min(self.data.len()).min(3);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }
    let frame = raw_frame(FrameSpec::default(), b"survives interrupts", 64);
    let mut reader = Lz4FrameReader::new(Flaky { data: &frame, interrupt: false });
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"survives interrupts");
}

// ── 2. Unsupported operations ────────────────────────────────────────────────

#[test]
fn test_seek_is_unsupported() {
    let frame = raw_frame(FrameSpec::default(), b"0123456789", 64);
    let mut reader = Lz4FrameReader::new(Cursor::new(frame));
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).unwrap();

    assert_eq!(reader.stream_position().unwrap(), 4);
    for pos in [SeekFrom::Start(0), SeekFrom::End(0), SeekFrom::Current(1)] {
        let err = reader.seek(pos).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(matches!(frame_error(&err), FrameError::InvalidOperation("seek")));
    }
    // A failed seek leaves the stream readable.
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"4567");
}

// ── 3. Limits ────────────────────────────────────────────────────────────────

#[test]
fn test_block_over_declared_size_rejected() {
    let mut frame = header(&FrameSpec { block_size_code: 5, ..FrameSpec::default() });
    frame.extend_from_slice(&(256 * 1024 + 1u32 | 0x8000_0000).to_le_bytes());
    frame.extend(std::iter::repeat(0u8).take(256 * 1024 + 1));
    let err = io_error_of(frame, ReadOptions::default());
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(matches!(
        frame_error(&err),
        FrameError::BlockTooLarge { size: 262_145, max: 262_144 }
    ));
}

#[test]
fn test_compressed_block_expanding_past_limit_rejected() {
    // Offset-1 match of 70000 bytes inside a 64 KiB frame.
    let frame = FrameBuilder::new(FrameSpec::default())
        .rle(b'x', 70_000)
        .build();
    let err = decompress_to_vec(&frame).unwrap_err();
    assert!(matches!(err, FrameError::BlockDecompression(_)), "{err:?}");
}

#[test]
fn test_checksum_errors_only_when_verifying() {
    let mut frame = FrameBuilder::new(FrameSpec { content_checksum: true, ..FrameSpec::default() })
        .raw(b"data")
        .build();
    let last = frame.len() - 1;
    frame[last] = frame[last].wrapping_add(1);

    assert_eq!(decompress_to_vec(&frame).unwrap(), b"data");
    let err = io_error_of(frame, ReadOptions::default().with_verify_checksums(true));
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(matches!(frame_error(&err), FrameError::ContentChecksumMismatch { .. }));
}
