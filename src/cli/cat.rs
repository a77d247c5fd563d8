//! The `lz4cat` copy loop.
//!
//! Every input is decoded in order through its own [`Lz4FrameReader`] and
//! appended to a single output sink. Reads are issued in `buffer_size`
//! chunks, so each call returns at most one block's worth of bytes.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::args::CatArgs;
use crate::config::STDIO_MARK;
use crate::file::Lz4FrameReader;
use crate::frame::types::ReadOptions;

/// Totals reported after a successful run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatSummary {
    pub inputs: usize,
    pub frames: u64,
    pub bytes_written: u64,
}

/// Decodes every input named by `args` into the selected output.
pub fn run(args: &CatArgs) -> Result<CatSummary> {
    let mut out = open_output(args)?;
    let mut chunk = vec![0u8; args.buffer_size];
    let options = args.read_options();
    let mut summary = CatSummary::default();

    for name in args.inputs() {
        let input = open_input(name)?;
        let (frames, bytes) = cat_one(input, &mut *out, options, &mut chunk)
            .with_context(|| format!("{}: decompression failed", display_name(name)))?;
        crate::displaylevel!(3, "{}: {} frame(s), {} bytes\n", display_name(name), frames, bytes);
        summary.inputs += 1;
        summary.frames += frames;
        summary.bytes_written += bytes;
    }

    out.flush().context("cannot flush output")?;
    crate::displaylevel!(
        2,
        "decoded {} input(s), {} frame(s), {} bytes\n",
        summary.inputs,
        summary.frames,
        summary.bytes_written
    );
    Ok(summary)
}

/// Streams one input through a frame reader into `out`.
///
/// Returns `(frames_decoded, bytes_written)`.
pub fn cat_one<R: Read, W: Write + ?Sized>(
    input: R,
    out: &mut W,
    options: ReadOptions,
    chunk: &mut [u8],
) -> io::Result<(u64, u64)> {
    let mut reader = Lz4FrameReader::with_options(input, options);
    let mut written = 0u64;
    loop {
        let n = match reader.read(chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&chunk[..n])?;
        written += n as u64;
    }
    Ok((reader.frames_decoded(), written))
}

// ─────────────────────────────────────────────────────────────────────────────
// Input / output resolution
// ─────────────────────────────────────────────────────────────────────────────

fn display_name(name: &str) -> &str {
    if name == STDIO_MARK {
        "stdin"
    } else {
        name
    }
}

fn open_input(name: &str) -> Result<Box<dyn Read>> {
    if name == STDIO_MARK {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("refusing to read from a console");
        }
        crate::displaylevel!(4, "using stdin for input\n");
        return Ok(Box::new(stdin.lock()));
    }
    let file = File::open(name).with_context(|| format!("{name}: cannot open input"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(args: &CatArgs) -> Result<Box<dyn Write>> {
    let Some(path) = args.output.as_deref().filter(|p| *p != Path::new(STDIO_MARK)) else {
        let stdout = io::stdout();
        if args.refuses_console(stdout.is_terminal()) {
            bail!("refusing to write to console without -c");
        }
        crate::displaylevel!(4, "using stdout for output\n");
        return Ok(Box::new(BufWriter::new(stdout.lock())));
    };

    let mut open = OpenOptions::new();
    open.write(true);
    if args.force {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }
    let file = open.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            anyhow::anyhow!("{}: already exists; use -f to overwrite", path.display())
        } else {
            anyhow::Error::new(e).context(format!("{}: cannot open output", path.display()))
        }
    })?;
    crate::displaylevel!(4, "writing to {}\n", path.display());
    Ok(Box::new(BufWriter::new(file)))
}
