//! Scalar fallback benchmarks: kernel over slices vs a plain scalar loop.
//!
//! The special-lane density controls how often the dispatcher loop runs, so
//! each size is measured with no special lanes, about 1% and about 25%.

use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use svmath::{call_f64, B64xN, F64xN, SpecialCaseKernel, SvMap};

const VECTOR_SIZES: &[usize] = &[1_024, 16_384, 131_072, 1_048_576, 4_194_304];

const SPECIAL_DENSITIES: &[f64] = &[0.0, 0.01, 0.25];

/// Values in `[1, 2)` with a fraction of negative lanes the kernel treats as special.
fn generate_test_data(len: usize, density: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| {
            let x = 1.0 + rng.random::<f64>();
            if rng.random_bool(density) {
                -x
            } else {
                x
            }
        })
        .collect()
}

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).sqrt()
    } else {
        x.sqrt()
    }
}

fn benchmark_slice_drivers(c: &mut Criterion) {
    let kernel = SpecialCaseKernel::new(
        |x: F64xN| x.sqrt(),
        |x: F64xN| x.lt_elements(F64xN::splat(0.0)),
        signed_sqrt,
    );

    for &density in SPECIAL_DENSITIES {
        for &size in VECTOR_SIZES {
            let mut group = c.benchmark_group(format!(
                "Signed sqrt {} ({:.0}% special)",
                format_size(size),
                density * 100.0
            ));
            group.throughput(Throughput::Bytes(
                (size * std::mem::size_of::<f64>()) as u64,
            ));

            let input_vec = generate_test_data(size, density);
            let input_slice = input_vec.as_slice();

            group.bench_with_input(BenchmarkId::new("Scalar", size), input_slice, |b, input| {
                b.iter(|| black_box(input.scalar_map(signed_sqrt)))
            });

            group.bench_with_input(BenchmarkId::new("SV", size), input_slice, |b, input| {
                b.iter(|| black_box(input.sv_map(&kernel)))
            });

            group.bench_with_input(
                BenchmarkId::new("Parallel SV", size),
                input_slice,
                |b, input| b.iter(|| black_box(black_box(input).par_sv_map(&kernel))),
            );

            group.bench_with_input(BenchmarkId::new("Fast SV", size), input_slice, |b, input| {
                b.iter(|| black_box(input.fast_sv_map(&kernel)))
            });

            group.finish();
        }
    }
}

/// Cost of one dispatcher call as the number of selected lanes grows.
fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dispatcher");
    let v = F64xN::from_fn(|i| i as f64 + 1.0);

    for active in [0, 1, svmath::LANES_64 / 2, svmath::LANES_64] {
        let select = B64xN::first_n(active);
        group.bench_with_input(BenchmarkId::new("call_f64", active), &select, |b, &pg| {
            b.iter(|| black_box(call_f64(f64::ln, black_box(v), pg)))
        });
    }

    group.finish();
}

fn format_size(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<f64>();
    if bytes >= 1_073_741_824 {
        format!("{:.1} GiB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

fn all_benchmarks(c: &mut Criterion) {
    println!("Starting scalar fallback benchmarks ({} bit vectors)", svmath::VECTOR_BITS);
    let start_time = Instant::now();
    benchmark_dispatch(c);
    benchmark_slice_drivers(c);
    let elapsed = start_time.elapsed();
    println!(
        "Benchmark suite completed in {:.2} seconds",
        elapsed.as_secs_f64()
    );
}

criterion_group!(benches, all_benchmarks);
criterion_main!(benches);
