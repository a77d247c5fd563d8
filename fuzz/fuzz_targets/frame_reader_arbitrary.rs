#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;
use lz4stream::{decompress_to_vec, Lz4FrameReader, ReadOptions};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce output or an error, never a panic.
    let _ = decompress_to_vec(data);

    // First byte picks the options and read size for a second pass, so
    // checksum verification and short interactive reads get covered too.
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let options = ReadOptions::default()
        .with_verify_checksums(selector & 1 != 0)
        .with_skip_skippable_frames(selector & 2 != 0);
    let mut buf = vec![0u8; usize::from(selector >> 2) + 1];
    let mut reader = Lz4FrameReader::with_options(rest, options);
    while let Ok(n) = reader.read(&mut buf) {
        if n == 0 {
            break;
        }
    }
});
