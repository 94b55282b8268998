//! Error types for the hudpng library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for hudpng operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or checking images.
///
/// Layout violations are not errors; they are reported through
/// [`crate::layout::Verdict`].
#[derive(Debug, Error)]
pub enum Error {
    /// The first eight bytes are not the PNG signature.
    #[error("not a PNG file: invalid signature")]
    InvalidSignature,

    /// IHDR declares a format this codec does not handle.
    #[error(
        "unsupported PNG format: bit depth {bit_depth}, color type {color_type}, \
         compression {compression}, filter {filter}, interlace {interlace} \
         (only 8-bit RGBA, non-interlaced is supported)"
    )]
    UnsupportedFormat {
        /// Declared bit depth.
        bit_depth: u8,
        /// Declared color type.
        color_type: u8,
        /// Declared compression method.
        compression: u8,
        /// Declared filter method.
        filter: u8,
        /// Declared interlace method.
        interlace: u8,
    },

    /// A scanline carries a filter type byte outside 0..=4.
    #[error("unsupported scanline filter type {0}")]
    UnsupportedFilter(u8),

    /// The byte stream ended before the data it declared.
    #[error("truncated stream: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// Chunks are missing, duplicated or out of order.
    #[error("malformed PNG stream: {0}")]
    MalformedStream(String),

    /// A critical chunk this codec does not understand.
    #[error("unsupported critical chunk {}", String::from_utf8_lossy(.0))]
    UnsupportedChunk([u8; 4]),

    /// Stored chunk CRC does not match the computed one.
    #[error(
        "CRC mismatch in {} chunk: stored {stored:#010x}, computed {computed:#010x}",
        String::from_utf8_lossy(tag)
    )]
    CrcMismatch {
        /// Chunk tag.
        tag: [u8; 4],
        /// CRC read from the stream.
        stored: u32,
        /// CRC computed over tag and payload.
        computed: u32,
    },

    /// Invalid image dimensions (zero width or height).
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Pixel data length doesn't match expected size.
    #[error("invalid pixel data length: expected {expected} bytes, got {actual}")]
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },

    /// Image dimensions exceed maximum supported size.
    #[error("image {width}x{height} exceeds maximum dimension {max}")]
    ImageTooLarge {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Maximum supported dimension.
        max: u32,
    },

    /// Invalid zlib compression level (must be 0-9).
    #[error("invalid compression level {0}: must be 0-9")]
    InvalidCompressionLevel(u8),

    /// A color token could not be parsed.
    #[error("unsupported color token: {0:?}")]
    InvalidColor(String),

    /// The deflate primitive rejected the input.
    #[error("compression error: {0}")]
    Compression(String),

    /// The IDAT stream is not valid zlib data.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// A baseline directory is missing or holds no PNG files.
    #[error("no baseline PNGs found in {}", .0.display())]
    NoBaselines(PathBuf),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
