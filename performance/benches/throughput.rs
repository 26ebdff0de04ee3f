use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

pub fn throughput_bench(c: &mut Criterion) {
    let mb = match std::env::var("THROUGHPUT_MB") {
        Ok(val) => match val.parse::<usize>() {
            Ok(val) => val,
            Err(_) => panic!["Failed to parse env var THROUGHPUT_MB={} as an integer", val],
        },
        Err(_) => 4,
    };
    let weights = Default::default();
    let mut rng = rand::prelude::StdRng::seed_from_u64(43);
    let input = performance::generate_random_ditroff_document(&mut rng, mb * 1000 * 1000, 66, &weights);

    let mut group = c.benchmark_group("throughput");
    group.sample_size(10);

    group.bench_function("tokenize", |b| {
        b.iter(|| performance::tokenize_in_ditroff(&input))
    });

    group.bench_function("interpret", |b| {
        b.iter(|| performance::interpret_in_ditroff(&input))
    });

    group.bench_function("render_tty", |b| {
        b.iter(|| performance::render_in_ditroff_tty(&input))
    });

    group.bench_function("render_vector", |b| {
        b.iter(|| performance::render_in_ditroff_vector(&input))
    });

    if performance::host_has_grotty() {
        group.bench_function("render_grotty", |b| {
            b.iter(|| {
                performance::run_in_grotty(&input);
            })
        });
    } else {
        println!("Skipping grotty benchmark as grotty is not installed (`which grotty` failed).");
    }
}

criterion_group!(benches, throughput_bench);
criterion_main!(benches);
