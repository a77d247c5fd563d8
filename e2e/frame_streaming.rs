// e2e/frame_streaming.rs: end-to-end streaming decode tests
//
// Drives the public API the way an application would: files on disk,
// buffered sources, `io::copy`, and frame streams produced by the reference
// `lz4` tool.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read, Write};

use lz4stream::{decompress_to_vec, decompress_to_writer, Lz4FrameReader, ReadOptions};
use tempfile::TempDir;

use frames::{literal_frame, raw_frame, sample_text, skippable_frame, FrameBuilder, FrameSpec};

/// `printf 'hello\n' | lz4 -c` (independent blocks, content checksum).
const LZ4_CLI_HELLO: [u8; 25] = [
    0x04, 0x22, 0x4D, 0x18, 0x64, 0x40, 0xA7, 0x06, 0x00, 0x00, 0x80, b'h', b'e', b'l', b'l',
    b'o', b'\n', 0x00, 0x00, 0x00, 0x00, 0xF9, 0x5B, 0x6B, 0x94,
];

// ── 1. Reference frames ──────────────────────────────────────────────────────

#[test]
fn test_reference_hello_frame() {
    assert_eq!(decompress_to_vec(&LZ4_CLI_HELLO).unwrap(), b"hello\n");
}

#[test]
fn test_reference_hello_frame_verified() {
    let mut out = Vec::new();
    let n = decompress_to_writer(
        &LZ4_CLI_HELLO[..],
        &mut out,
        ReadOptions::default().with_verify_checksums(true),
    )
    .unwrap();
    assert_eq!(n, 6);
    assert_eq!(out, b"hello\n");
}

// ── 2. Files on disk ─────────────────────────────────────────────────────────

#[test]
fn test_decode_file_through_bufreader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("text.lz4");
    let data = sample_text(300_000);
    let spec = FrameSpec { block_checksum: true, content_checksum: true, ..FrameSpec::default() };
    fs::write(&path, literal_frame(spec, &data, 60_000)).unwrap();

    let file = BufReader::with_capacity(1000, File::open(&path).unwrap());
    let options = ReadOptions::default().with_verify_checksums(true);
    let mut reader = Lz4FrameReader::with_options(file, options);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
    assert_eq!(reader.frames_decoded(), 1);
    assert_eq!(reader.position(), data.len() as u64);
}

#[test]
fn test_decode_to_file_with_io_copy() {
    let dir = TempDir::new().unwrap();
    let data = sample_text(100_000);
    let compressed = raw_frame(FrameSpec::default(), &data, 10_000);

    let out_path = dir.path().join("plain.txt");
    let mut out = File::create(&out_path).unwrap();
    let mut reader = Lz4FrameReader::new(Cursor::new(compressed));
    let copied = io::copy(&mut reader, &mut out).unwrap();
    out.flush().unwrap();
    drop(out);

    assert_eq!(copied, data.len() as u64);
    assert_eq!(fs::read(&out_path).unwrap(), data);
}

// ── 3. Multi-frame streams ───────────────────────────────────────────────────

#[test]
fn test_many_frames_back_to_back() {
    let mut stream = Vec::new();
    let mut expected = Vec::new();
    for i in 0..20usize {
        let chunk = sample_text(i * 997 + 1);
        let spec = FrameSpec {
            independent: i % 2 == 0,
            block_checksum: i % 3 == 0,
            content_checksum: i % 4 == 0,
            block_size_code: 4 + (i % 4) as u8,
            ..FrameSpec::default()
        };
        stream.extend(literal_frame(spec, &chunk, 4096));
        expected.extend(chunk);
    }
    let options = ReadOptions::default().with_verify_checksums(true);
    let mut reader = Lz4FrameReader::with_options(&stream[..], options);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
    assert_eq!(reader.frames_decoded(), 20);
}

#[test]
fn test_skippable_frames_interleaved() {
    let mut stream = skippable_frame(0, b"index");
    stream.extend(raw_frame(FrameSpec::default(), b"alpha ", 64));
    stream.extend(skippable_frame(9, &[0xAB; 2048]));
    stream.extend(raw_frame(FrameSpec::default(), b"omega", 64));
    stream.extend(skippable_frame(2, b""));

    let mut out = Vec::new();
    decompress_to_writer(
        &stream[..],
        &mut out,
        ReadOptions::default().with_skip_skippable_frames(true),
    )
    .unwrap();
    assert_eq!(out, b"alpha omega");

    assert!(decompress_to_vec(&stream).is_err());
}

// ── 4. Chained frames and large blocks ───────────────────────────────────────

#[test]
fn test_chained_frame_with_long_history() {
    // Block 2 copies 60 KiB starting 64 KiB back, from block 1's output.
    let first = sample_text(64 * 1024);
    let mut payload = vec![0x0F, 0xFF, 0xFF];
    let mut extra = 60 * 1024 - 4 - 15;
    while extra >= 255 {
        payload.push(255);
        extra -= 255;
    }
    payload.push(extra as u8);
    payload.extend_from_slice(&[0x50, b'[', b'e', b'n', b'd', b']']);

    let start = 64 * 1024 - 65_535;
    let mut second = first[start..start + 60 * 1024].to_vec();
    second.extend_from_slice(b"[end]");

    let builder = FrameBuilder::new(FrameSpec { independent: false, ..FrameSpec::default() })
        .raw(&first)
        .compressed(&payload, &second);
    assert_eq!(decompress_to_vec(&builder.build()).unwrap(), builder.content());
}

#[test]
fn test_four_megabyte_blocks() {
    let data = sample_text(4 * 1024 * 1024);
    let spec = FrameSpec { block_size_code: 7, content_checksum: true, ..FrameSpec::default() };
    let frame = FrameBuilder::new(spec).raw(&data).build();

    let options = ReadOptions::default().with_verify_checksums(true);
    let mut reader = Lz4FrameReader::with_options(&frame[..], options);
    let mut buf = vec![0u8; 8 * 1024 * 1024];
    let n = reader.read(&mut buf).unwrap();
    assert_eq!(n, data.len());
    assert_eq!(&buf[..n], &data[..]);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}
