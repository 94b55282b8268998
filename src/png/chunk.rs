//! PNG chunk framing.
//!
//! Every chunk is `length | tag | payload | crc32(tag ++ payload)` with
//! big-endian integers.

use crc32fast::Hasher;
use tracing::debug;

use crate::error::{Error, Result};

/// Size of the length + tag + CRC framing around a payload.
pub const FRAME_OVERHEAD: usize = 12;

/// Chunk kinds this codec acts on.
///
/// Unknown ancillary chunks are carried as [`ChunkKind::Ancillary`] so the
/// decoder can skip them; unknown critical chunks never make it this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Image header.
    Ihdr,
    /// Image data.
    Idat,
    /// Image trailer.
    Iend,
    /// Any chunk whose tag starts with a lowercase letter.
    Ancillary([u8; 4]),
}

impl ChunkKind {
    /// Classify a tag.
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        match &tag {
            b"IHDR" => Ok(ChunkKind::Ihdr),
            b"IDAT" => Ok(ChunkKind::Idat),
            b"IEND" => Ok(ChunkKind::Iend),
            _ if tag[0].is_ascii_lowercase() => Ok(ChunkKind::Ancillary(tag)),
            _ => Err(Error::UnsupportedChunk(tag)),
        }
    }

    /// The four tag bytes.
    pub fn tag(&self) -> [u8; 4] {
        match self {
            ChunkKind::Ihdr => *b"IHDR",
            ChunkKind::Idat => *b"IDAT",
            ChunkKind::Iend => *b"IEND",
            ChunkKind::Ancillary(tag) => *tag,
        }
    }
}

/// Whether the reader checks chunk CRCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrcPolicy {
    /// Reject chunks whose stored CRC differs from the computed one.
    #[default]
    Verify,
    /// Read the CRC field but do not check it.
    Ignore,
}

/// One chunk borrowed from the input buffer.
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'a> {
    /// Raw tag bytes.
    pub tag: [u8; 4],
    /// Payload bytes.
    pub data: &'a [u8],
    /// CRC as stored in the stream.
    pub crc: u32,
}

impl RawChunk<'_> {
    /// Classify this chunk's tag.
    pub fn kind(&self) -> Result<ChunkKind> {
        ChunkKind::from_tag(self.tag)
    }
}

/// CRC32 over tag and payload, as stored in the chunk trailer.
pub fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let mut crc = Hasher::new();
    crc.update(tag);
    crc.update(data);
    crc.finalize()
}

/// Write a PNG chunk (length, type, data, CRC32) to the output buffer.
pub fn write_chunk(output: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    output.reserve(FRAME_OVERHEAD + data.len());

    let crc = chunk_crc(chunk_type, data);

    output.extend_from_slice(&(data.len() as u32).to_be_bytes());
    output.extend_from_slice(chunk_type);
    output.extend_from_slice(data);
    output.extend_from_slice(&crc.to_be_bytes());
}

/// Iterator over the chunks following the PNG signature.
///
/// Yields `Err` once and then stops if a chunk overruns the buffer or fails
/// its CRC check.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    policy: CrcPolicy,
    failed: bool,
}

impl<'a> ChunkReader<'a> {
    /// Read chunks from `data`, which must start right after the signature.
    pub fn new(data: &'a [u8], policy: CrcPolicy) -> Self {
        Self {
            data,
            pos: 0,
            policy,
            failed: false,
        }
    }

    fn read_next(&mut self) -> Result<RawChunk<'a>> {
        let remaining = self.data.len() - self.pos;
        if remaining < FRAME_OVERHEAD {
            return Err(Error::TruncatedStream {
                expected: FRAME_OVERHEAD,
                actual: remaining,
            });
        }

        let header = &self.data[self.pos..];
        let length = read_u32_be(&header[0..4]) as usize;
        let tag = [header[4], header[5], header[6], header[7]];

        let framed = length
            .checked_add(FRAME_OVERHEAD)
            .ok_or_else(|| Error::MalformedStream("chunk length overflow".into()))?;
        if framed > remaining {
            return Err(Error::TruncatedStream {
                expected: framed,
                actual: remaining,
            });
        }

        let data = &header[8..8 + length];
        let crc = read_u32_be(&header[8 + length..12 + length]);

        if self.policy == CrcPolicy::Verify {
            let computed = chunk_crc(&tag, data);
            if computed != crc {
                return Err(Error::CrcMismatch {
                    tag,
                    stored: crc,
                    computed,
                });
            }
        }

        debug!(
            tag = %String::from_utf8_lossy(&tag),
            length,
            offset = self.pos,
            "read chunk"
        );
        self.pos += framed;
        Ok(RawChunk { tag, data, crc })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<RawChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let item = self.read_next();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

#[inline]
fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
