//! Argument parsing for `lz4cat`.
//!
//! Flags are declared with clap's derive API. Size values accept the same
//! `K`/`M` suffixes (optionally followed by `i` and/or `B`) as the rest of
//! the lz4 tool family, e.g. `-B 64K` or `--buffer-size 1MiB`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{CAT_BUFFER_SIZE, CAT_BUFFER_SIZE_MIN, DISPLAY_LEVEL_DEFAULT, STDIO_MARK};
use crate::frame::types::ReadOptions;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "lz4cat",
    version,
    about = "Decompress LZ4 frame streams to standard output or a file"
)]
pub struct CatArgs {
    /// Input files; `-` or no file at all reads standard input.
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Write decompressed data to FILE instead of standard output.
    #[arg(short = 'o', long = "output", value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write to standard output even when it is a console.
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Overwrite an existing output file.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// More verbose notifications (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Fewer notifications (repeatable).
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Verify block and content checksums instead of only consuming them.
    #[arg(long = "verify-checksums")]
    pub verify_checksums: bool,

    /// Step over skippable frames instead of rejecting them.
    #[arg(long = "skip-skippable")]
    pub skip_skippable: bool,

    /// Bytes requested from the decoder per read call.
    #[arg(
        short = 'B',
        long = "buffer-size",
        value_name = "SIZE",
        default_value_t = CAT_BUFFER_SIZE,
        value_parser = parse_buffer_size
    )]
    pub buffer_size: usize,
}

impl CatArgs {
    /// Decoder options selected by the flags.
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::default()
            .with_verify_checksums(self.verify_checksums)
            .with_skip_skippable_frames(self.skip_skippable)
    }

    /// Notification level after `-v` / `-q` adjustments, clamped at 0.
    pub fn display_level(&self) -> i32 {
        (DISPLAY_LEVEL_DEFAULT + i32::from(self.verbose) - i32::from(self.quiet)).max(0)
    }

    /// True when decoded bytes go to standard output.
    pub fn writes_stdout(&self) -> bool {
        self.output
            .as_deref()
            .map_or(true, |p| p == std::path::Path::new(STDIO_MARK))
    }

    /// Decoded output would land on a console and `-c` was not given.
    pub fn refuses_console(&self, stdout_is_terminal: bool) -> bool {
        stdout_is_terminal && self.writes_stdout() && !self.stdout
    }

    /// Inputs in processing order. No file arguments means standard input.
    pub fn inputs(&self) -> Vec<&str> {
        if self.files.is_empty() {
            vec![STDIO_MARK]
        } else {
            self.files.iter().map(String::as_str).collect()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Size parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parses a decimal size with an optional `K` / `M` / `G` multiplier.
///
/// Returns `None` when `s` does not start with a digit, carries trailing
/// garbage, or overflows `usize`.
pub fn parse_size(s: &str) -> Option<usize> {
    let digits_end = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits_end == 0 {
        return None;
    }
    let value: usize = s[..digits_end].parse().ok()?;
    let mut rest = &s[digits_end..];

    let shift = match rest.as_bytes().first() {
        Some(b'K') => 10,
        Some(b'M') => 20,
        Some(b'G') => 30,
        _ => 0,
    };
    if shift != 0 {
        rest = &rest[1..];
        rest = rest.strip_prefix('i').unwrap_or(rest);
        rest = rest.strip_prefix('B').unwrap_or(rest);
    }
    if !rest.is_empty() {
        return None;
    }
    value.checked_mul(1usize << shift)
}

fn parse_buffer_size(s: &str) -> Result<usize, String> {
    match parse_size(s) {
        Some(n) if n >= CAT_BUFFER_SIZE_MIN => Ok(n),
        Some(n) => Err(format!("buffer size must be at least {CAT_BUFFER_SIZE_MIN}, got {n}")),
        None => Err(format!("invalid size '{s}'")),
    }
}
