//! Streaming LZ4 frame reader over any `R: Read`.
//!
//! # Public API
//! - [`Lz4FrameReader`]: pull-based decompressor implementing [`std::io::Read`]
//! - [`decompress_to_writer`]: drain a whole frame stream into a writer
//! - [`decompress_to_vec`]: decode an in-memory frame stream
//!
//! # Interactive reads
//!
//! A single `read` call returns the bytes of at most one decoded block,
//! even when the caller's buffer has room for more and more input is
//! available. Callers loop until they have what they need (`read_exact`,
//! `read_to_end` and `io::copy` already do). A return of `0` means the
//! source is exhausted at a frame boundary.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::block::codec::{BlockCodec, HistoryDecoder};
use crate::frame::decompress::{ActiveFrame, BlockOutcome};
use crate::frame::types::{DecompressStage, FrameDescriptor, FrameError, ReadOptions};

// ─────────────────────────────────────────────────────────────────────────────
// Lz4FrameReader
// ─────────────────────────────────────────────────────────────────────────────

/// Which kind of block the pending bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Compressed,
    Raw,
}

/// Streaming LZ4 frame decompressor backed by any `R: Read`.
///
/// The frame header is parsed lazily on the first read. Concatenated frames
/// are decoded one after the other; the reader owns `inner` and drops it
/// with itself.
///
/// ```
/// use std::io::Read;
/// use lz4stream::Lz4FrameReader;
///
/// // "hello\n" stored in one uncompressed block, with content checksum.
/// let frame: &[u8] = &[
///     0x04, 0x22, 0x4D, 0x18, 0x64, 0x40, 0xA7, 0x06, 0x00, 0x00, 0x80,
///     b'h', b'e', b'l', b'l', b'o', b'\n', 0x00, 0x00, 0x00, 0x00,
///     0xF9, 0x5B, 0x6B, 0x94,
/// ];
/// let mut text = String::new();
/// Lz4FrameReader::new(frame).read_to_string(&mut text).unwrap();
/// assert_eq!(text, "hello\n");
/// ```
pub struct Lz4FrameReader<R, C: BlockCodec = HistoryDecoder> {
    inner: R,
    options: ReadOptions,
    /// `None` while awaiting a frame header.
    frame: Option<ActiveFrame<C>>,
    /// Decoded bytes of the last block not yet handed to the caller.
    pending: usize,
    pending_kind: Option<PendingKind>,
    /// Decompressed bytes delivered so far.
    position: u64,
    frames_decoded: u64,
    /// Set once a terminator is consumed; cleared by the next frame header.
    terminated: bool,
}

impl<R: Read> Lz4FrameReader<R> {
    /// Reader with default options and the default block codec.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, ReadOptions::default())
    }

    /// Reader with explicit options and the default block codec.
    pub fn with_options(inner: R, options: ReadOptions) -> Self {
        Self::with_codec(inner, options)
    }
}

impl<R: Read, C: BlockCodec> Lz4FrameReader<R, C> {
    /// Reader with explicit options and a caller-chosen block codec:
    /// `Lz4FrameReader::<_, MyCodec>::with_codec(src, options)`.
    pub fn with_codec(inner: R, options: ReadOptions) -> Self {
        Lz4FrameReader {
            inner,
            options,
            frame: None,
            pending: 0,
            pending_kind: None,
            position: 0,
            frames_decoded: 0,
            terminated: false,
        }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Current state of the frame state machine.
    pub fn stage(&self) -> DecompressStage {
        match (&self.frame, self.pending_kind) {
            (None, _) if self.terminated => DecompressStage::FrameTerminated,
            (None, _) => DecompressStage::AwaitingFrame,
            (Some(_), _) if self.pending == 0 => DecompressStage::AwaitingBlock,
            (Some(_), Some(PendingKind::Raw)) => DecompressStage::HaveRawBlock,
            (Some(_), _) => DecompressStage::HaveCompressedBlock,
        }
    }

    /// Descriptor of the frame being decoded, if one is active.
    pub fn descriptor(&self) -> Option<&FrameDescriptor> {
        self.frame.as_ref().map(|f| f.descriptor())
    }

    /// Decoded bytes of the current block still waiting to be read.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Frames whose terminator has been consumed.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Decompressed bytes delivered so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the source. Reading from it directly desynchronises
    /// the decoder.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Release the source, discarding any undelivered output.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fetch blocks until some output is pending. Returns `false` at clean
    /// end of input.
    fn fill_pending(&mut self) -> Result<bool, FrameError> {
        while self.pending == 0 {
            if self.frame.is_none() {
                self.frame = ActiveFrame::begin(&mut self.inner, &self.options)?;
                if self.frame.is_some() {
                    self.terminated = false;
                }
            }
            let Some(frame) = self.frame.as_mut() else {
                return Ok(false);
            };
            let outcome = frame.next_block(&mut self.inner, &self.options)?;
            self.pending_kind = match outcome {
                BlockOutcome::Compressed(_) => Some(PendingKind::Compressed),
                BlockOutcome::Raw(_) => Some(PendingKind::Raw),
                BlockOutcome::Terminated => {
                    self.frame = None;
                    self.frames_decoded += 1;
                    self.terminated = true;
                    None
                }
            };
            self.pending = outcome.produced();
        }
        Ok(true)
    }

    /// Interactive read returning the frame error directly.
    ///
    /// Delivers `min(buf.len(), pending)` bytes from the current block,
    /// decoding the next block first when nothing is pending. Returns `0`
    /// for an empty `buf` (without touching the source) or at end of input.
    pub fn read_interactive(&mut self, buf: &mut [u8]) -> Result<usize, FrameError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.fill_pending()? {
            return Ok(0);
        }
        let n = buf.len().min(self.pending);
        if let Some(frame) = &mut self.frame {
            frame.drain(&mut buf[..n], self.pending);
        }
        self.pending -= n;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: Read, C: BlockCodec> Read for Lz4FrameReader<R, C> {
    /// Decompress into `buf`; see [`Lz4FrameReader::read_interactive`].
    /// Frame errors surface as `io::Error` wrapping a [`FrameError`].
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_interactive(buf).map_err(io::Error::from)
    }
}

impl<R: Read, C: BlockCodec> Seek for Lz4FrameReader<R, C> {
    /// Only position queries (`SeekFrom::Current(0)`) are supported; any
    /// movement fails with an `Unsupported` invalid-operation error.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.position),
            _ => Err(FrameError::InvalidOperation("seek").into()),
        }
    }
}

impl<R, C: BlockCodec> std::fmt::Debug for Lz4FrameReader<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lz4FrameReader")
            .field("options", &self.options)
            .field("descriptor", &self.frame.as_ref().map(|fr| *fr.descriptor()))
            .field("pending", &self.pending)
            .field("position", &self.position)
            .field("frames_decoded", &self.frames_decoded)
            .field("terminated", &self.terminated)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience functions
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress every frame from `reader` into `writer`.
///
/// Returns the number of decompressed bytes written.
pub fn decompress_to_writer<R: Read, W: Write + ?Sized>(
    reader: R,
    writer: &mut W,
    options: ReadOptions,
) -> io::Result<u64> {
    let mut lz4r = Lz4FrameReader::with_options(reader, options);
    io::copy(&mut lz4r, writer)
}

/// Decode an in-memory frame stream.
pub fn decompress_to_vec(src: &[u8]) -> Result<Vec<u8>, FrameError> {
    let mut lz4r = Lz4FrameReader::new(src);
    let mut out = Vec::new();
    let mut chunk = [0u8; 16 * 1024];
    loop {
        let n = lz4r.read_interactive(&mut chunk)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&chunk[..n]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
