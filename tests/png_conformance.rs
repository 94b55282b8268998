//! PNG conformance tests.
//!
//! Checks the wire layout of encoded files, decodes our output with the
//! `image` crate, and decodes `image`-encoded files covering every scanline
//! filter.

mod support;

use hudpng::png::{self, DecodeOptions, EncodeOptions};
use hudpng::{Canvas, Error, Rgba};
use image::codecs::png::{CompressionType, FilterType as ImageFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use rand::{rngs::StdRng, Rng, SeedableRng};

use support::synthetic;

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode with the `image` crate using one filter for every row.
fn encode_external(canvas: &Canvas, filter: ImageFilter) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, filter)
        .write_image(
            canvas.pixels(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgba8,
        )
        .expect("external encode");
    out
}

/// Walk chunk tags in order.
fn chunk_tags(png: &[u8]) -> Vec<[u8; 4]> {
    let mut tags = Vec::new();
    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        tags.push(png[pos + 4..pos + 8].try_into().unwrap());
        pos += 12 + len;
    }
    tags
}

#[test]
fn test_png_signature() {
    let result = png::encode(&synthetic::solid(1, 1, Rgba::new(255, 0, 0, 255))).unwrap();
    assert_eq!(&result[0..8], &SIGNATURE);
}

#[test]
fn test_ihdr_chunk() {
    let result = png::encode(&synthetic::solid(100, 60, Rgba::WHITE)).unwrap();

    // Length should be 13
    assert_eq!(&result[8..12], &[0, 0, 0, 13]);
    assert_eq!(&result[12..16], b"IHDR");
    assert_eq!(&result[16..20], &[0, 0, 0, 100]);
    assert_eq!(&result[20..24], &[0, 0, 0, 60]);

    // Bit depth 8, color type 6, compression 0, filter 0, interlace 0
    assert_eq!(&result[24..29], &[8, 6, 0, 0, 0]);
}

#[test]
fn test_iend_chunk() {
    let result = png::encode(&synthetic::gradient(10, 10)).unwrap();
    let iend_start = result.len() - 12;

    assert_eq!(&result[iend_start..iend_start + 4], &[0, 0, 0, 0]);
    assert_eq!(&result[iend_start + 4..iend_start + 8], b"IEND");
    assert_eq!(
        &result[iend_start + 8..iend_start + 12],
        &[0xAE, 0x42, 0x60, 0x82]
    );
}

#[test]
fn test_chunk_order() {
    let result = png::encode(&synthetic::noise(17, 9, 3)).unwrap();
    assert_eq!(chunk_tags(&result), vec![*b"IHDR", *b"IDAT", *b"IEND"]);
}

#[test]
fn test_chunk_crcs() {
    let result = png::encode(&synthetic::gradient(32, 32)).unwrap();
    let mut pos = 8;
    while pos < result.len() {
        let len = u32::from_be_bytes(result[pos..pos + 4].try_into().unwrap()) as usize;
        let body = &result[pos + 4..pos + 8 + len];
        let stored = u32::from_be_bytes(result[pos + 8 + len..pos + 12 + len].try_into().unwrap());
        assert_eq!(crc32fast::hash(body), stored);
        pos += 12 + len;
    }
    assert_eq!(pos, result.len());
}

#[test]
fn test_external_decoder_reads_output() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..8 {
        let w = rng.gen_range(1..=48);
        let h = rng.gen_range(1..=48);
        let canvas = synthetic::noise(w, h, rng.gen());
        let encoded = png::encode(&canvas).unwrap();
        let decoded = image::load_from_memory(&encoded)
            .expect("decode")
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (w, h));
        assert_eq!(decoded.as_raw().as_slice(), canvas.pixels());
    }
}

#[test]
fn test_decode_external_every_filter() {
    let canvas = synthetic::gradient(37, 23);
    for filter in [
        ImageFilter::NoFilter,
        ImageFilter::Sub,
        ImageFilter::Up,
        ImageFilter::Avg,
        ImageFilter::Paeth,
        ImageFilter::Adaptive,
    ] {
        let encoded = encode_external(&canvas, filter);
        let decoded = png::decode(&encoded).unwrap();
        assert_eq!(decoded, canvas, "filter {filter:?}");
    }
}

#[test]
fn test_decode_external_noise() {
    let canvas = synthetic::noise(64, 40, 11);
    let decoded = png::decode(&encode_external(&canvas, ImageFilter::Adaptive)).unwrap();
    assert_eq!(decoded, canvas);
}

#[test]
fn test_roundtrip_patterns() {
    let cases = [
        synthetic::solid(1, 1, Rgba::TRANSPARENT),
        synthetic::solid(3, 5, synthetic::HUD_BG),
        synthetic::gradient(129, 7),
        synthetic::checkerboard(40, 24, Rgba::WHITE, synthetic::HUD_BG),
        synthetic::noise(31, 31, 99),
    ];
    for canvas in cases {
        for opts in [EncodeOptions::fast(), EncodeOptions::default()] {
            let encoded = png::encode_with_options(&canvas, &opts).unwrap();
            assert_eq!(png::decode(&encoded).unwrap(), canvas);
        }
    }
}

#[test]
fn test_compression_levels() {
    let canvas = synthetic::checkerboard(128, 128, Rgba::WHITE, synthetic::HUD_BG);
    let stored = png::encode_with_options(
        &canvas,
        &EncodeOptions {
            compression_level: 0,
        },
    )
    .unwrap();
    let best = png::encode(&canvas).unwrap();
    assert!(best.len() < stored.len());
    assert_eq!(png::decode(&stored).unwrap(), canvas);
}

#[test]
fn test_hud_frame_roundtrip() {
    let canvas = synthetic::hud_with_block(hudpng::Rect::new(928, 24, 288, 128), Rgba::WHITE);
    let decoded = png::decode(&png::encode(&canvas).unwrap()).unwrap();
    assert_eq!(decoded, canvas);
}

#[test]
fn test_corrupted_idat_crc() {
    let mut encoded = png::encode(&synthetic::gradient(8, 8)).unwrap();
    // Flip a byte inside the IDAT payload (starts at 41).
    encoded[42] ^= 0xFF;
    assert!(matches!(
        png::decode(&encoded),
        Err(Error::CrcMismatch { tag, .. }) if &tag == b"IDAT"
    ));
    // Ignoring CRCs surfaces the broken zlib stream instead.
    assert!(png::decode_with_options(&encoded, &DecodeOptions::lax()).is_err());
}

#[test]
fn test_rejects_rgb_from_external_encoder() {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&[10, 20, 30, 40, 50, 60], 2, 1, ExtendedColorType::Rgb8)
        .unwrap();
    assert!(matches!(
        png::decode(&out),
        Err(Error::UnsupportedFormat { color_type: 2, .. })
    ));
}
