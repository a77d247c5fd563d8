//! Fixed-width field reads from a blocking byte source.
//!
//! Every helper here loops over `Read::read` until the field is complete,
//! because a source may hand out a single byte per call. `Interrupted` is
//! retried; end of input inside a field is a `TruncatedStream` error.
//!
//! Fields come back by value (`[u8; N]`) so each read is self-contained.
//! The header parser collects the raw bytes it needs for its checksum in a
//! [`FieldBytes`] scoped to one parse.

use std::io::{self, Read};

use crate::frame::types::FrameError;

/// Capacity of [`FieldBytes`]; the largest checksummed header span is
/// FLG_BD (2) + content size (8) + dictionary ID (4).
pub const FIELD_BYTES_CAPACITY: usize = 16;

/// Read into `buf` until it is full or the source reports end of input.
/// Returns the number of bytes obtained.
fn fill<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly `N` bytes; end of input anywhere inside the field is an
/// error.
pub fn read_exact<R: Read + ?Sized, const N: usize>(
    src: &mut R,
    field: &'static str,
) -> Result<[u8; N], FrameError> {
    let mut buf = [0u8; N];
    read_payload(src, &mut buf, field)?;
    Ok(buf)
}

/// Read exactly `N` bytes, except that end of input before the first byte
/// yields `Ok(None)`.
///
/// Used where a clean end of the outer stream is legal (before a frame's
/// magic number); running out after the first byte is still truncation.
pub fn try_read_exact<R: Read + ?Sized, const N: usize>(
    src: &mut R,
    field: &'static str,
) -> Result<Option<[u8; N]>, FrameError> {
    let mut buf = [0u8; N];
    let got = fill(src, &mut buf)?;
    match got {
        0 if N > 0 => Ok(None),
        n if n == N => Ok(Some(buf)),
        n => Err(FrameError::TruncatedStream {
            field,
            expected: N,
            received: n,
        }),
    }
}

/// Fill `dst` completely from the source.
pub fn read_payload<R: Read + ?Sized>(
    src: &mut R,
    dst: &mut [u8],
    field: &'static str,
) -> Result<(), FrameError> {
    let got = fill(src, dst)?;
    if got != dst.len() {
        return Err(FrameError::TruncatedStream {
            field,
            expected: dst.len(),
            received: got,
        });
    }
    Ok(())
}

#[inline]
pub fn read_u8<R: Read + ?Sized>(src: &mut R, field: &'static str) -> Result<u8, FrameError> {
    Ok(read_exact::<_, 1>(src, field)?[0])
}

#[inline]
pub fn read_le32<R: Read + ?Sized>(src: &mut R, field: &'static str) -> Result<u32, FrameError> {
    Ok(u32::from_le_bytes(read_exact(src, field)?))
}

/// Discard exactly `n` bytes from the source.
pub fn skip_exact<R: Read + ?Sized>(
    src: &mut R,
    n: u64,
    field: &'static str,
) -> Result<(), FrameError> {
    let mut scratch = [0u8; 4096];
    let mut remaining = n;
    while remaining > 0 {
        let want = remaining.min(scratch.len() as u64) as usize;
        let got = fill(src, &mut scratch[..want])?;
        remaining -= got as u64;
        if got < want {
            return Err(FrameError::TruncatedStream {
                field,
                expected: usize::try_from(n).unwrap_or(usize::MAX),
                received: usize::try_from(n - remaining).unwrap_or(usize::MAX),
            });
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldBytes
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-capacity accumulator for the raw bytes of a field group.
#[derive(Debug, Clone, Copy)]
pub struct FieldBytes {
    buf: [u8; FIELD_BYTES_CAPACITY],
    len: usize,
}

impl FieldBytes {
    pub const fn new() -> Self {
        FieldBytes {
            buf: [0u8; FIELD_BYTES_CAPACITY],
            len: 0,
        }
    }

    /// Append `bytes`.
    ///
    /// # Panics
    /// When the total would exceed [`FIELD_BYTES_CAPACITY`]; header field
    /// groups are bounded well below it.
    pub fn push(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        assert!(end <= FIELD_BYTES_CAPACITY, "FieldBytes overflow");
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for FieldBytes {
    fn default() -> Self {
        Self::new()
    }
}
