//! PNG decoding.
//!
//! Supported:
//! - Color type 6 (RGBA), bit depth 8, non-interlaced
//! - All five scanline filters
//! - IDAT split across any number of chunks
//! - CRC validation for every chunk (can be relaxed per call)
//!
//! Not supported:
//! - Any other color type or bit depth
//! - Interlaced PNGs
//! - Unknown critical chunks; ancillary chunks are skipped uninterpreted

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use super::chunk::{ChunkKind, ChunkReader, CrcPolicy};
use super::filter::unfilter_scanlines;
use super::{BIT_DEPTH, COLOR_TYPE_RGBA, MAX_DIMENSION, PNG_SIGNATURE};
use crate::canvas::Canvas;
use crate::color::BYTES_PER_PIXEL;
use crate::error::{Error, Result};

/// Decoder options.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Whether chunk CRCs are checked. Defaults to [`CrcPolicy::Verify`].
    pub crc: CrcPolicy,
}

impl DecodeOptions {
    /// Options that skip CRC checks, for hand-authored fixtures.
    pub fn lax() -> Self {
        Self {
            crc: CrcPolicy::Ignore,
        }
    }
}

/// IHDR chunk fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ihdr {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Bits per sample.
    pub bit_depth: u8,
    /// PNG color type.
    pub color_type: u8,
    /// Compression method (0 = zlib).
    pub compression_method: u8,
    /// Filter method (0 = adaptive five-filter set).
    pub filter_method: u8,
    /// Interlace method (0 = none).
    pub interlace_method: u8,
}

impl Ihdr {
    /// IHDR payload length.
    pub const LEN: usize = 13;

    /// Parse the 13-byte IHDR payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(Error::MalformedStream(format!(
                "IHDR length must be 13, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
            height: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            bit_depth: data[8],
            color_type: data[9],
            compression_method: data[10],
            filter_method: data[11],
            interlace_method: data[12],
        })
    }

    /// Serialize to the 13-byte IHDR payload.
    pub fn to_bytes(&self) -> [u8; 13] {
        let mut out = [0u8; 13];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression_method;
        out[11] = self.filter_method;
        out[12] = self.interlace_method;
        out
    }

    /// Reject everything except 8-bit RGBA, zlib, filter method 0, no interlace.
    fn validate(&self) -> Result<()> {
        let supported = self.bit_depth == BIT_DEPTH
            && self.color_type == COLOR_TYPE_RGBA
            && self.compression_method == 0
            && self.filter_method == 0
            && self.interlace_method == 0;
        if !supported {
            return Err(Error::UnsupportedFormat {
                bit_depth: self.bit_depth,
                color_type: self.color_type,
                compression: self.compression_method,
                filter: self.filter_method,
                interlace: self.interlace_method,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }
        Ok(())
    }

    /// Bytes per unfiltered row.
    fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

/// Decode a PNG from memory with CRC checking enabled.
pub fn decode(png_data: &[u8]) -> Result<Canvas> {
    decode_with_options(png_data, &DecodeOptions::default())
}

/// Decode a PNG from memory.
pub fn decode_with_options(png_data: &[u8], options: &DecodeOptions) -> Result<Canvas> {
    if png_data.len() < PNG_SIGNATURE.len() || png_data[..8] != PNG_SIGNATURE {
        return Err(Error::InvalidSignature);
    }

    let mut ihdr: Option<Ihdr> = None;
    let mut idat: Vec<u8> = Vec::new();
    let mut idat_chunks = 0usize;
    let mut seen_iend = false;

    for chunk in ChunkReader::new(&png_data[8..], options.crc) {
        let chunk = chunk?;
        let kind = chunk.kind()?;

        match (kind, ihdr.is_some()) {
            (ChunkKind::Ihdr, false) => {
                let header = Ihdr::parse(chunk.data)?;
                header.validate()?;
                ihdr = Some(header);
            }
            (ChunkKind::Ihdr, true) => {
                return Err(Error::MalformedStream("multiple IHDR chunks".into()));
            }
            (_, false) => {
                return Err(Error::MalformedStream(format!(
                    "first chunk must be IHDR, found {}",
                    String::from_utf8_lossy(&kind.tag())
                )));
            }
            (ChunkKind::Idat, true) => {
                idat.extend_from_slice(chunk.data);
                idat_chunks += 1;
            }
            (ChunkKind::Iend, true) => {
                if !chunk.data.is_empty() {
                    return Err(Error::MalformedStream("IEND payload must be empty".into()));
                }
                seen_iend = true;
                break;
            }
            (ChunkKind::Ancillary(_), true) => {
                // Ancillary chunks are ignored.
            }
        }
    }

    let ihdr = ihdr.ok_or_else(|| Error::MalformedStream("missing IHDR chunk".into()))?;
    if idat_chunks == 0 {
        return Err(Error::MalformedStream("missing IDAT chunk".into()));
    }
    if !seen_iend {
        return Err(Error::MalformedStream("missing IEND chunk".into()));
    }

    let row_bytes = ihdr.row_bytes();
    let height = ihdr.height as usize;
    let expected = (row_bytes + 1)
        .checked_mul(height)
        .ok_or_else(|| Error::MalformedStream("image size overflow".into()))?;

    let decompressed = inflate_zlib(&idat, expected)?;
    if decompressed.len() < expected {
        return Err(Error::TruncatedStream {
            expected,
            actual: decompressed.len(),
        });
    }

    debug!(
        width = ihdr.width,
        height = ihdr.height,
        idat_chunks,
        compressed = idat.len(),
        "decoding PNG"
    );

    let pixels = unfilter_scanlines(&decompressed, row_bytes, height, BYTES_PER_PIXEL)?;
    Canvas::from_pixels(ihdr.width, ihdr.height, pixels)
}

/// Inflate a zlib stream, reading at most `limit` bytes of output.
///
/// A stream that ends early yields a short buffer; the caller decides
/// whether that is an error.
fn inflate_zlib(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    // Deflate expands at most ~1032:1; don't trust the header beyond that.
    let mut out = Vec::with_capacity(limit.min(data.len().saturating_mul(1032)));
    ZlibDecoder::new(data)
        .take(limit as u64)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(out)
}
