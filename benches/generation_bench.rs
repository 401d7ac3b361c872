//! Benchmarks for NPC generation and validation

use std::hint::black_box;
use std::path::Path;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use npc_generator::definition::load_schema_file;
use npc_generator::generation::{NpcFactory, RngSource};

fn bench_create(c: &mut Criterion) {
    let schema = load_schema_file(Path::new("data/schemas/sample.toml")).unwrap();
    let mut group = c.benchmark_group("create");
    for count in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut random = RngSource::seeded(42);
            b.iter(|| NpcFactory::create(black_box(&schema), count, &[], &mut random).unwrap());
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let schema = load_schema_file(Path::new("data/schemas/sample.toml")).unwrap();
    let npcs = NpcFactory::create(&schema, 1000, &[], &mut RngSource::seeded(42)).unwrap();
    c.bench_function("validate_1000", |b| {
        b.iter(|| NpcFactory::are_npcs_valid(black_box(&npcs), &schema, &[]))
    });
}

criterion_group!(benches, bench_create, bench_validate);
criterion_main!(benches);
