//! Codec and validator benchmarks on 1280x720 HUD frames.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hudpng::baseline;
use hudpng::layout::{self, LayoutContract};
use hudpng::png::{self, filter, EncodeOptions, FilterType};
use hudpng::Canvas;

fn hud_frame() -> Canvas {
    baseline::scenes()
        .unwrap()
        .into_iter()
        .find(|s| s.name == "hud_power_warning.png")
        .unwrap()
        .canvas
}

fn noise_frame(mut seed: u32) -> Canvas {
    let mut pixels = Vec::with_capacity(1280 * 720 * 4);
    while pixels.len() < 1280 * 720 * 4 {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        pixels.push((seed >> 16) as u8);
    }
    Canvas::from_pixels(1280, 720, pixels).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let frames = [("hud", hud_frame()), ("noise", noise_frame(0x1234_5678))];
    let mut group = c.benchmark_group("png_encode");
    group.throughput(Throughput::Bytes(1280 * 720 * 4));

    for (name, frame) in &frames {
        for (preset, opts) in [("fast", EncodeOptions::fast()), ("max", EncodeOptions::default())] {
            group.bench_with_input(BenchmarkId::new(preset, name), frame, |b, frame| {
                let mut out = Vec::new();
                b.iter(|| {
                    png::encode_into(&mut out, black_box(frame), &opts).unwrap();
                    black_box(out.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_decode");
    group.throughput(Throughput::Bytes(1280 * 720 * 4));

    let hud = png::encode(&hud_frame()).unwrap();
    let noise = png::encode_with_options(&noise_frame(7), &EncodeOptions::fast()).unwrap();
    for (name, bytes) in [("hud", &hud), ("noise", &noise)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), bytes, |b, bytes| {
            b.iter(|| black_box(png::decode(black_box(bytes)).unwrap()));
        });
    }
    group.finish();
}

fn bench_unfilter(c: &mut Criterion) {
    let frame = noise_frame(42);
    let row_bytes = frame.stride();
    let mut group = c.benchmark_group("unfilter");
    group.throughput(Throughput::Bytes(frame.pixels().len() as u64));

    for f in FilterType::ALL {
        let mut stream = Vec::with_capacity(frame.pixels().len() + 720);
        let mut prev = vec![0u8; row_bytes];
        for row in frame.rows() {
            filter::filter_row(f, row, &prev, 4, &mut stream);
            prev.copy_from_slice(row);
        }
        group.bench_with_input(BenchmarkId::from_parameter(format!("{f:?}")), &stream, |b, s| {
            b.iter(|| black_box(filter::unfilter_scanlines(black_box(s), row_bytes, 720, 4).unwrap()));
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let frame = hud_frame();
    let contract = LayoutContract::default();
    let bg = layout::background_at_origin(&frame);
    c.bench_function("layout_validate_hud", |b| {
        b.iter(|| black_box(layout::validate(black_box(&frame), &contract, bg)));
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_unfilter, bench_validate);
criterion_main!(benches);
