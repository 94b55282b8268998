//! PNG encoder implementation.
//!
//! Writes 8-bit RGBA, non-interlaced PNG files: signature, IHDR, a single
//! IDAT holding the zlib stream of filter-None scanlines, and IEND. No
//! optional chunks are emitted, so output is byte-for-byte reproducible.

pub mod chunk;
pub mod decode;
pub mod filter;

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::debug;

use crate::canvas::Canvas;
use crate::color::BYTES_PER_PIXEL;
use crate::error::{Error, Result};

pub use chunk::CrcPolicy;
pub use decode::{decode, decode_with_options, DecodeOptions, Ihdr};
pub use filter::FilterType;

/// PNG file signature (magic bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Bit depth written to and accepted from IHDR.
pub const BIT_DEPTH: u8 = 8;

/// PNG color type for truecolor with alpha.
pub const COLOR_TYPE_RGBA: u8 = 6;

/// Maximum supported image dimension.
pub const MAX_DIMENSION: u32 = 1 << 24; // 16 million pixels

/// PNG encoding options.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// zlib compression level (0-9, default 9).
    pub compression_level: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            // Baselines are written once and checked often; favor size.
            compression_level: 9,
        }
    }
}

impl EncodeOptions {
    /// Fastest preset, useful for throwaway artifacts.
    pub fn fast() -> Self {
        Self {
            compression_level: 1,
        }
    }

    /// Highest compression preset (the default).
    pub fn max_compression() -> Self {
        Self::default()
    }
}

/// Encode a canvas as PNG.
///
/// # Returns
/// Complete PNG file as bytes.
pub fn encode(canvas: &Canvas) -> Result<Vec<u8>> {
    encode_with_options(canvas, &EncodeOptions::default())
}

/// Encode a canvas as PNG with custom options.
pub fn encode_with_options(canvas: &Canvas, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    encode_into(&mut output, canvas, options)?;
    Ok(output)
}

/// Encode a canvas as PNG into a caller-provided buffer.
///
/// The `output` buffer will be cleared before writing. This API allows callers
/// to reuse an allocation across multiple encodes.
pub fn encode_into(output: &mut Vec<u8>, canvas: &Canvas, options: &EncodeOptions) -> Result<()> {
    if options.compression_level > 9 {
        return Err(Error::InvalidCompressionLevel(options.compression_level));
    }
    let (width, height) = canvas.size();
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    let filtered = filter::apply_filters(canvas.pixels(), width as usize * BYTES_PER_PIXEL);
    let compressed = deflate_zlib(&filtered, options.compression_level)?;

    output.clear();
    output.reserve(PNG_SIGNATURE.len() + 3 * chunk::FRAME_OVERHEAD + 13 + compressed.len());
    output.extend_from_slice(&PNG_SIGNATURE);
    write_ihdr(output, width, height);
    chunk::write_chunk(output, b"IDAT", &compressed);
    write_iend(output);

    debug!(
        width,
        height,
        raw = filtered.len(),
        compressed = compressed.len(),
        total = output.len(),
        "encoded PNG"
    );
    Ok(())
}

/// Compress the filtered scanline stream into a zlib stream.
fn deflate_zlib(data: &[u8], level: u8) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 4 + 64),
        Compression::new(level as u32),
    );
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))
}

/// Write IHDR (image header) chunk.
fn write_ihdr(output: &mut Vec<u8>, width: u32, height: u32) {
    let ihdr = Ihdr {
        width,
        height,
        bit_depth: BIT_DEPTH,
        color_type: COLOR_TYPE_RGBA,
        compression_method: 0,
        filter_method: 0,
        interlace_method: 0,
    };
    chunk::write_chunk(output, b"IHDR", &ihdr.to_bytes());
}

/// Write IEND (image end) chunk.
fn write_iend(output: &mut Vec<u8>) {
    chunk::write_chunk(output, b"IEND", &[]);
}
