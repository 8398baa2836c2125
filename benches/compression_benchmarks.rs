use bitgrid_compress::{BitGrid, CompressionMethod, Compressor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 640x480 mask with sparse noise and a few solid bands.
fn edge_frame() -> BitGrid {
    let mut rng = StdRng::seed_from_u64(1);
    let mut grid = BitGrid::with_size(640, 480);
    for y in 0..480 {
        for x in 0..640 {
            let band = (x / 40) % 5 == 0 && (y / 30) % 3 == 0;
            grid.set(x, y, band || rng.gen_bool(0.02));
        }
    }
    grid
}

fn bench_compress(c: &mut Criterion) {
    let grid = edge_frame();
    let compressor = Compressor::default();
    let mut group = c.benchmark_group("compress_640x480");
    for method in CompressionMethod::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", method)), &method, |b, &m| {
            b.iter(|| compressor.compress(black_box(&grid), m))
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let grid = edge_frame();
    let compressor = Compressor::default();
    let mut group = c.benchmark_group("decompress_640x480");
    for method in CompressionMethod::ALL {
        let envelope = compressor.compress(&grid, method).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", method)), &envelope, |b, e| {
            b.iter(|| compressor.decompress(black_box(e)))
        });
    }
    group.finish();
}

fn bench_count_true(c: &mut Criterion) {
    let grid = edge_frame();
    c.bench_function("count_true_640x480", |b| b.iter(|| black_box(&grid).count_true()));
}

criterion_group!(benches, bench_compress, bench_decompress, bench_count_true);
criterion_main!(benches);
