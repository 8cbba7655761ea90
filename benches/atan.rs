//! Arctangent benchmarks, single and double precision, comparing scalar,
//! SIMD and parallel SIMD drivers across cache-hierarchy vector sizes.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vectrig::simd::traits::SimdAtan;

const VECTOR_SIZES: &[usize] = &[
    1_024,      // L1 cache
    16_384,     // L1→L2 transition
    262_144,    // L2 cache
    1_048_576,  // L2→L3 transition
    4_194_304,  // L3 cache
    16_777_216, // L3→RAM transition
];

/// Reproducible inputs spanning both reduction branches around |x| = 1.
fn generate_f32_data(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..len).map(|_| rng.random_range(-100.0f32..100.0)).collect()
}

fn generate_f64_data(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..len).map(|_| rng.random_range(-100.0f64..100.0)).collect()
}

fn format_size(elements: usize, elem_bytes: usize) -> String {
    let bytes = elements * elem_bytes;

    if bytes >= 1_048_576 {
        format!("{:.1}_MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}_KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}_B")
    }
}

fn benchmark_atan_f32(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Atan_f32_{}", format_size(size, 4)));

        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let input_vec = generate_f32_data(size);
        let input_slice = input_vec.as_slice();

        group.bench_with_input(BenchmarkId::new("scalar", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).scalar_atan()))
        });

        group.bench_with_input(BenchmarkId::new("simd", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).simd_atan()))
        });

        group.bench_with_input(
            BenchmarkId::new("parallel simd", size),
            input_slice,
            |b, input| b.iter(|| black_box(black_box(input).par_simd_atan())),
        );

        group.finish();
    }
}

fn benchmark_atan_f64(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Atan_f64_{}", format_size(size, 8)));

        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f64>()) as u64));

        let input_vec = generate_f64_data(size);
        let input_slice = input_vec.as_slice();

        group.bench_with_input(BenchmarkId::new("scalar", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).scalar_atan()))
        });

        group.bench_with_input(BenchmarkId::new("simd", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).simd_atan()))
        });

        group.bench_with_input(
            BenchmarkId::new("parallel simd", size),
            input_slice,
            |b, input| b.iter(|| black_box(black_box(input).par_simd_atan())),
        );

        group.finish();
    }
}

criterion_group!(benches, benchmark_atan_f32, benchmark_atan_f64);
criterion_main!(benches);
