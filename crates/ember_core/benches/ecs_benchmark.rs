//! # ECS Benchmark
//!
//! Measures the store's hot operations at full entity capacity.
//!
//! Run with: `cargo bench --package ember_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ember_core::{Transform, Vec3, World, MAX_ENTITIES};

/// Benchmark: create a world (preallocates every entity slot).
fn bench_world_creation(c: &mut Criterion) {
    c.bench_function("world_creation", |b| {
        b.iter(|| black_box(World::new()));
    });
}

/// Benchmark: spawn entities up to the fixed capacity.
fn bench_create_entities(c: &mut Criterion) {
    c.bench_function("create_entities_to_capacity", |b| {
        b.iter(|| {
            let mut world = World::new();
            for _ in 1..MAX_ENTITIES {
                black_box(world.create_entity());
            }
            world.next_entity_id()
        });
    });
}

/// Benchmark: attach and write a Transform on every entity.
fn bench_add_components(c: &mut Criterion) {
    c.bench_function("add_transform_to_capacity", |b| {
        b.iter(|| {
            let mut world = World::new();
            let transform = world.register_component::<Transform>().unwrap();
            for _ in 1..MAX_ENTITIES {
                let entity = world.create_entity();
                *world.add_component::<Transform>(entity, transform).unwrap() =
                    Transform::at(Vec3::new(1.0, 2.0, 0.0));
            }
            world.storage_stats().used_bytes
        });
    });
}

/// Benchmark: linear mask scan over a fully populated world.
fn bench_mask_scan(c: &mut Criterion) {
    let mut world = World::new();
    let transform = world.register_component::<Transform>().unwrap();
    for _ in 1..MAX_ENTITIES {
        let entity = world.create_entity();
        world.add_component::<Transform>(entity, transform).unwrap();
    }

    c.bench_function("mask_scan_full_world", |b| {
        b.iter(|| black_box(world.iter_with(transform.bit()).count()));
    });
}

criterion_group!(
    benches,
    bench_world_creation,
    bench_create_entities,
    bench_add_components,
    bench_mask_scan
);
criterion_main!(benches);
