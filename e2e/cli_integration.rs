// e2e/cli_integration.rs: `lz4cat` black-box tests
//
// Runs the binary with std::process::Command. Covers stdin/stdout
// streaming, file inputs, -o with and without -f, decoder flags, exit
// codes and the -B chunk size.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

use frames::{literal_frame, raw_frame, sample_text, skippable_frame, FrameBuilder, FrameSpec};

fn lz4cat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4cat"))
}

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(lz4cat_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn lz4cat");
    let mut pipe = child.stdin.take().unwrap();
    let input = stdin.to_vec();
    // Feed stdin from a thread so a full stdout pipe cannot deadlock us.
    let feeder = std::thread::spawn(move || {
        let _ = pipe.write_all(&input);
    });
    let out = child.wait_with_output().unwrap();
    feeder.join().unwrap();
    out
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(lz4cat_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run lz4cat")
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path.to_str().unwrap().to_owned()
}

// ── 1. stdin → stdout ────────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_to_stdout() {
    let data = sample_text(50_000);
    let out = run_with_stdin(&[], &literal_frame(FrameSpec::default(), &data, 8192));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, data);
}

#[test]
fn test_cli_dash_means_stdin() {
    let out = run_with_stdin(&["-", "-c"], &raw_frame(FrameSpec::default(), b"dash", 64));
    assert!(out.status.success());
    assert_eq!(out.stdout, b"dash");
}

#[test]
fn test_cli_tiny_buffer_size() {
    let builder = FrameBuilder::new(FrameSpec::default())
        .literal(b"chunked ")
        .rle(b'.', 100)
        .raw(b" done");
    let out = run_with_stdin(&["-B", "3"], &builder.build());
    assert!(out.status.success());
    assert_eq!(out.stdout, builder.content());
}

// ── 2. Files ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_multiple_files_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write_input(dir.path(), "a.lz4", &raw_frame(FrameSpec::default(), b"first,", 64));
    let b = write_input(dir.path(), "b.lz4", &literal_frame(FrameSpec::default(), b"second", 64));
    let out = run_in(dir.path(), &[b.as_str(), a.as_str(), b.as_str()]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"secondfirst,second");
}

#[test]
fn test_cli_output_file_and_force() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "in.lz4", &raw_frame(FrameSpec::default(), b"payload", 64));
    let output = dir.path().join("out.txt");
    let output_s = output.to_str().unwrap();

    let out = run_in(dir.path(), &["-o", output_s, input.as_str()]);
    assert!(out.status.success());
    assert_eq!(fs::read(&output).unwrap(), b"payload");
    assert!(out.stdout.is_empty());

    // Existing output is kept without -f.
    let out = run_in(dir.path(), &["-o", output_s, input.as_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    fs::write(&output, b"stale content that is longer").unwrap();
    let out = run_in(dir.path(), &["-f", "-o", output_s, input.as_str()]);
    assert!(out.status.success());
    assert_eq!(fs::read(&output).unwrap(), b"payload");
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_in(dir.path(), &["does-not-exist.lz4"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("does-not-exist.lz4"));
}

// ── 3. Decoder flags ─────────────────────────────────────────────────────────

#[test]
fn test_cli_corrupt_input_exit_code() {
    let mut frame = raw_frame(FrameSpec::default(), b"xyz", 64);
    frame[6] ^= 0x55; // header checksum
    let out = run_with_stdin(&[], &frame);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("header checksum mismatch"));
}

#[test]
fn test_cli_verify_checksums_flag() {
    let mut frame = FrameBuilder::new(FrameSpec { content_checksum: true, ..FrameSpec::default() })
        .raw(b"checked")
        .build();
    let last = frame.len() - 1;
    frame[last] ^= 0x01;

    let out = run_with_stdin(&[], &frame);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"checked");

    let out = run_with_stdin(&["--verify-checksums"], &frame);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("content checksum mismatch"));
}

#[test]
fn test_cli_skip_skippable_flag() {
    let mut stream = skippable_frame(4, b"ignored");
    stream.extend(raw_frame(FrameSpec::default(), b"kept", 64));

    let out = run_with_stdin(&[], &stream);
    assert_eq!(out.status.code(), Some(1));

    let out = run_with_stdin(&["--skip-skippable"], &stream);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"kept");
}

// ── 4. Usage ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_bad_usage() {
    let out = run_with_stdin(&["--no-such-flag"], b"");
    assert!(!out.status.success());
    let out = run_with_stdin(&["-c", "-o", "x"], b"");
    assert!(!out.status.success());
}

#[test]
fn test_cli_quiet_and_verbose() {
    let frame = raw_frame(FrameSpec::default(), b"v", 64);
    let out = run_with_stdin(&["-q"], &frame);
    assert!(out.status.success());
    assert!(out.stderr.is_empty());

    let out = run_with_stdin(&["-vv"], &frame);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"v");
    assert!(!out.stderr.is_empty());
}
