// Frame-building fixtures shared by the integration and end-to-end suites.
//
// Blocks are produced either raw (stored) or with a tiny literal-only /
// run-length LZ4 encoder, which is enough to exercise every decoder path
// without depending on a compressor.

#![allow(dead_code)]

use xxhash_rust::xxh32::xxh32;

pub const MAGIC: [u8; 4] = [0x04, 0x22, 0x4D, 0x18];
pub const END_MARK: [u8; 4] = [0, 0, 0, 0];
pub const RAW_FLAG: u32 = 0x8000_0000;

/// Frame-level flags. Content-size and dictionary-ID presence bits live in
/// BD (bits 3 and 0) in this format.
#[derive(Debug, Clone, Copy)]
pub struct FrameSpec {
    pub independent: bool,
    pub block_checksum: bool,
    pub content_checksum: bool,
    pub content_size: Option<u64>,
    pub dict_id: Option<u32>,
    pub block_size_code: u8,
}

impl Default for FrameSpec {
    fn default() -> Self {
        FrameSpec {
            independent: true,
            block_checksum: false,
            content_checksum: false,
            content_size: None,
            dict_id: None,
            block_size_code: 4,
        }
    }
}

/// Header checksum byte for a descriptor (FLG..optional fields).
pub fn hc(descriptor: &[u8]) -> u8 {
    ((xxh32(descriptor, 0) >> 8) & 0xFF) as u8
}

/// Magic, descriptor and header checksum for `spec`.
pub fn header(spec: &FrameSpec) -> Vec<u8> {
    let mut flg = 0x40u8;
    if spec.independent {
        flg |= 0x20;
    }
    if spec.block_checksum {
        flg |= 0x10;
    }
    if spec.content_checksum {
        flg |= 0x04;
    }
    let mut bd = (spec.block_size_code & 0x07) << 4;
    if spec.content_size.is_some() {
        bd |= 0x08;
    }
    if spec.dict_id.is_some() {
        bd |= 0x01;
    }
    let mut desc = vec![flg, bd];
    if let Some(size) = spec.content_size {
        desc.extend_from_slice(&size.to_le_bytes());
    }
    if let Some(id) = spec.dict_id {
        desc.extend_from_slice(&id.to_le_bytes());
    }
    let check = hc(&desc);
    let mut out = MAGIC.to_vec();
    out.extend_from_slice(&desc);
    out.push(check);
    out
}

fn push_length(out: &mut Vec<u8>, mut rest: usize) {
    while rest >= 255 {
        out.push(255);
        rest -= 255;
    }
    out.push(rest as u8);
}

/// LZ4 block holding `data` as a single literal run.
pub fn literal_block(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 255 + 2);
    if data.len() >= 15 {
        out.push(0xF0);
        push_length(&mut out, data.len() - 15);
    } else {
        out.push((data.len() as u8) << 4);
    }
    out.extend_from_slice(data);
    out
}

/// LZ4 block decoding to `len` copies of `byte` (len >= 10).
///
/// One literal, an overlapping offset-1 match, then five trailing literals.
pub fn rle_block(byte: u8, len: usize) -> Vec<u8> {
    assert!(len >= 10, "rle_block needs at least 10 bytes");
    let match_len = len - 6;
    let mut out = Vec::new();
    let ml_code = match_len - 4;
    if ml_code >= 15 {
        out.push(0x1F);
    } else {
        out.push(0x10 | ml_code as u8);
    }
    out.push(byte);
    out.extend_from_slice(&1u16.to_le_bytes());
    if ml_code >= 15 {
        push_length(&mut out, ml_code - 15);
    }
    out.push(0x50);
    out.extend_from_slice(&[byte; 5]);
    out
}

/// One block as it appears on the wire plus what it decodes to.
#[derive(Debug, Clone)]
pub struct Block {
    pub payload: Vec<u8>,
    pub raw: bool,
    pub decoded: Vec<u8>,
}

/// Assembles a frame block by block.
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    pub spec: FrameSpec,
    pub blocks: Vec<Block>,
}

impl FrameBuilder {
    pub fn new(spec: FrameSpec) -> Self {
        FrameBuilder { spec, blocks: Vec::new() }
    }

    pub fn raw(mut self, data: &[u8]) -> Self {
        self.blocks.push(Block { payload: data.to_vec(), raw: true, decoded: data.to_vec() });
        self
    }

    pub fn literal(mut self, data: &[u8]) -> Self {
        self.blocks.push(Block { payload: literal_block(data), raw: false, decoded: data.to_vec() });
        self
    }

    pub fn rle(mut self, byte: u8, len: usize) -> Self {
        self.blocks.push(Block { payload: rle_block(byte, len), raw: false, decoded: vec![byte; len] });
        self
    }

    /// A hand-encoded compressed block and its expected output.
    pub fn compressed(mut self, payload: &[u8], decoded: &[u8]) -> Self {
        self.blocks.push(Block { payload: payload.to_vec(), raw: false, decoded: decoded.to_vec() });
        self
    }

    pub fn content(&self) -> Vec<u8> {
        self.blocks.iter().flat_map(|b| b.decoded.iter().copied()).collect()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = header(&self.spec);
        for block in &self.blocks {
            let mut word = block.payload.len() as u32;
            if block.raw {
                word |= RAW_FLAG;
            }
            out.extend_from_slice(&word.to_le_bytes());
            out.extend_from_slice(&block.payload);
            if self.spec.block_checksum {
                out.extend_from_slice(&xxh32(&block.payload, 0).to_le_bytes());
            }
        }
        out.extend_from_slice(&END_MARK);
        if self.spec.content_checksum {
            out.extend_from_slice(&xxh32(&self.content(), 0).to_le_bytes());
        }
        out
    }
}

/// `data` split into raw blocks of at most `block` bytes.
pub fn raw_frame(spec: FrameSpec, data: &[u8], block: usize) -> Vec<u8> {
    data.chunks(block)
        .fold(FrameBuilder::new(spec), |b, chunk| b.raw(chunk))
        .build()
}

/// `data` split into literal-only compressed blocks of at most `block` bytes.
///
/// The encoded block is slightly larger than its input, so `block` must leave
/// room under the frame's maximum block size.
pub fn literal_frame(spec: FrameSpec, data: &[u8], block: usize) -> Vec<u8> {
    data.chunks(block)
        .fold(FrameBuilder::new(spec), |b, chunk| b.literal(chunk))
        .build()
}

/// Frame with no data blocks.
pub fn empty_frame(spec: FrameSpec) -> Vec<u8> {
    FrameBuilder::new(spec).build()
}

/// Skippable frame carrying `payload`.
pub fn skippable_frame(nibble: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = (0x184D_2A50u32 | u32::from(nibble & 0x0F)).to_le_bytes().to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Deterministic mixed text used as payload.
pub fn sample_text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times; "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

/// `std::io::Read` source handing out at most `step` bytes per call.
pub struct Dribble<'a> {
    data: &'a [u8],
    step: usize,
}

impl<'a> Dribble<'a> {
    pub fn new(data: &'a [u8], step: usize) -> Self {
        Dribble { data, step: step.max(1) }
    }
}

impl std::io::Read for Dribble<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}
