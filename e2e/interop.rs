// e2e/interop.rs: frames from independent encoders
//
// Streams produced by the `lz4_flex` frame encoder are decoded with
// checksum verification across block modes, block sizes and inputs that
// span many blocks. When a system `lz4` binary is available its output is
// checked too; otherwise those tests print a skip message and return
// without failing, so they always appear in the test count.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::io::{Read, Write};
use std::process::{Command, Stdio};

use lz4_flex::frame::{BlockMode, BlockSize, FrameEncoder, FrameInfo};
use lz4stream::{decompress_to_vec, DecompressStage, Lz4FrameReader, ReadOptions};

use frames::Dribble;

const SIZES: [usize; 6] = [0, 1, 100, 65_536, 300_000, 1_500_000];

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Text runs interleaved with pseudo-random spans, so encoders emit both
/// compressed and stored blocks and matches reach back across block edges.
fn mixed_data(len: usize) -> Vec<u8> {
    const PHRASES: [&[u8]; 3] = [
        b"the quick brown fox jumps over the lazy dog. ",
        b"pack my box with five dozen liquor jugs; ",
        b"sphinx of black quartz, judge my vow! ",
    ];
    let mut state = 0x2545_F491u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let r = next();
        if r % 5 == 0 {
            let span = 64 + (r as usize >> 8) % 4096;
            out.extend((0..span).map(|_| next() as u8));
        } else {
            let phrase = PHRASES[r as usize % PHRASES.len()];
            for _ in 0..1 + (r >> 4) % 40 {
                out.extend_from_slice(phrase);
            }
        }
    }
    out.truncate(len);
    out
}

fn frame_info(mode: BlockMode, size: BlockSize) -> FrameInfo {
    let mut info = FrameInfo::new();
    info.block_mode = mode;
    info.block_size = size;
    info.block_checksums = true;
    info.content_checksum = true;
    info
}

fn flex_frame(info: FrameInfo, data: &[u8]) -> Vec<u8> {
    let mut enc = FrameEncoder::with_frame_info(info, Vec::new());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn verifying() -> ReadOptions {
    ReadOptions::default().with_verify_checksums(true)
}

fn decode_verified(stream: &[u8]) -> Vec<u8> {
    let mut reader = Lz4FrameReader::with_options(stream, verifying());
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(reader.stage(), DecompressStage::FrameTerminated);
    out
}

/// Every block mode and size at every input length, each frame written
/// twice back to back.
fn check_all_sizes(size: BlockSize, size_name: &str) {
    for mode in [BlockMode::Linked, BlockMode::Independent] {
        for n in SIZES {
            let data = mixed_data(n);
            let frame = flex_frame(frame_info(mode, size), &data);
            let stream = [frame.as_slice(), frame.as_slice()].concat();
            let out = decode_verified(&stream);
            assert_eq!(out.len(), 2 * n, "{mode:?} {size_name} n={n}");
            assert!(
                out[..n] == data[..] && out[n..] == data[..],
                "{mode:?} {size_name} n={n}: content differs"
            );
        }
    }
}

/// Path to the system `lz4` binary, or `None` if not found.
fn system_lz4() -> Option<String> {
    if let Ok(p) = std::env::var("LZ4_BIN") {
        if std::path::Path::new(&p).exists() {
            return Some(p);
        }
    }
    let out = Command::new("which").arg("lz4").output().ok()?;
    if out.status.success() {
        let path = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if !path.is_empty() {
            return Some(path);
        }
    }
    None
}

/// Compress `data` through `lz4 -c <flags>` reading standard input.
fn system_compress(lz4_bin: &str, flags: &[&str], data: &[u8]) -> Vec<u8> {
    let mut child = Command::new(lz4_bin)
        .arg("-c")
        .args(flags)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn lz4");
    let mut stdin = child.stdin.take().unwrap();
    let input = data.to_vec();
    let feeder = std::thread::spawn(move || stdin.write_all(&input));
    let out = child.wait_with_output().expect("wait for lz4");
    feeder.join().unwrap().unwrap();
    assert!(out.status.success(), "lz4 {flags:?} failed");
    out.stdout
}

// ── 1. lz4_flex: block modes × block sizes ───────────────────────────────────

#[test]
fn test_flex_frames_64k_blocks() {
    check_all_sizes(BlockSize::Max64KB, "64K");
}

#[test]
fn test_flex_frames_256k_blocks() {
    check_all_sizes(BlockSize::Max256KB, "256K");
}

#[test]
fn test_flex_frames_4m_blocks() {
    check_all_sizes(BlockSize::Max4MB, "4M");
}

// ── 2. lz4_flex: reading patterns ────────────────────────────────────────────

#[test]
fn test_flex_linked_frame_small_reads_from_dribbling_source() {
    let data = mixed_data(300_000);
    let frame = flex_frame(frame_info(BlockMode::Linked, BlockSize::Max64KB), &data);
    let mut reader = Lz4FrameReader::with_options(Dribble::new(&frame, 7), verifying());
    let mut out = Vec::new();
    let mut buf = [0u8; 1000];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        assert!(n <= 64 * 1024);
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, data);
    assert_eq!(reader.frames_decoded(), 1);
}

#[test]
fn test_flex_mixed_frame_settings_concatenated() {
    let a = mixed_data(200_000);
    let b = mixed_data(70_000);
    let mut plain = FrameInfo::new();
    plain.block_mode = BlockMode::Independent;
    let mut stream = flex_frame(frame_info(BlockMode::Linked, BlockSize::Max256KB), &a);
    stream.extend(flex_frame(plain, &b));
    stream.extend(flex_frame(frame_info(BlockMode::Independent, BlockSize::Max64KB), &a));

    let out = decompress_to_vec(&stream).unwrap();
    assert_eq!(out, [a.as_slice(), b.as_slice(), a.as_slice()].concat());
    assert_eq!(decode_verified(&stream), out);
}

#[test]
fn test_flex_corrupted_block_checksum_rejected() {
    let data = mixed_data(100_000);
    let mut frame = flex_frame(frame_info(BlockMode::Linked, BlockSize::Max64KB), &data);
    // First block header sits right after the 7-byte frame header.
    let first = u32::from_le_bytes(frame[7..11].try_into().unwrap()) & 0x7FFF_FFFF;
    let checksum_at = 11 + first as usize;
    frame[checksum_at] ^= 0x5A;

    let mut reader = Lz4FrameReader::with_options(&frame[..], verifying());
    let err = reader.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert_eq!(decompress_to_vec(&frame).unwrap(), data);
}

// ── 3. System lz4 ────────────────────────────────────────────────────────────

#[test]
fn test_system_lz4_frames() {
    let lz4_bin = match system_lz4() {
        Some(p) => p,
        None => {
            println!("SKIP test_system_lz4_frames: system lz4 binary not found");
            return;
        }
    };
    let data = mixed_data(1_500_000);
    let variants: [&[&str]; 4] = [
        &[],
        &["-BD", "-BX", "-B4"],
        &["-BX", "-B5"],
        &["-BD", "-B7", "-9"],
    ];
    for flags in variants {
        let frame = system_compress(&lz4_bin, flags, &data);
        let stream = [frame.as_slice(), frame.as_slice()].concat();
        let out = decode_verified(&stream);
        assert!(
            out.len() == 2 * data.len() && out[..data.len()] == data[..],
            "lz4 {flags:?}: content differs"
        );
    }
}

#[test]
fn test_system_lz4_empty_input() {
    let lz4_bin = match system_lz4() {
        Some(p) => p,
        None => {
            println!("SKIP test_system_lz4_empty_input: system lz4 binary not found");
            return;
        }
    };
    let frame = system_compress(&lz4_bin, &["-BX"], &[]);
    assert!(decode_verified(&frame).is_empty());
}
