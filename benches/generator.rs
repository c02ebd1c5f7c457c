use criterion::{black_box, criterion_group, criterion_main, Criterion};
use npuzzle::{generate, scramble};
use rand::{rngs::StdRng, SeedableRng};

fn generate_4x4(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("generate", |b| b.iter(|| generate(black_box(4), &mut rng)));
}

fn scramble_4x4(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("scramble", |b| b.iter(|| scramble(black_box(4), 80, &mut rng)));
}

criterion_group!(benches, generate_4x4, scramble_4x4);
criterion_main!(benches);
