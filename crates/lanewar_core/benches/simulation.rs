//! Simulation benchmarks for lanewar_core.
//!
//! Run with: `cargo bench -p lanewar_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lanewar_core::prelude::*;

fn delta() -> Fixed {
    Fixed::from_num(0.05)
}

/// A mid-game session: a few defenses, units on both lanes, several waves in.
fn mid_game(seed: u64) -> Simulation {
    let mut sim = Simulation::new(seed);
    sim.set_resources(Fixed::from_num(20_000));
    for kind in [
        EntityKind::Power,
        EntityKind::Power,
        EntityKind::Barracks,
        EntityKind::Supply,
        EntityKind::Turret,
        EntityKind::Bunker,
    ] {
        let _ = sim.build(kind);
    }
    sim.update(delta());
    for kind in [EntityKind::Infantry, EntityKind::Rocket, EntityKind::Truck] {
        let _ = sim.train(kind);
    }
    for _ in 0..(40 * 20) {
        sim.update(delta());
    }
    sim
}

/// Runs simulation benchmarks for the lanewar_core crate.
pub fn simulation_benchmark(c: &mut Criterion) {
    c.bench_function("tick_fresh_session", |b| {
        b.iter_batched(
            || Simulation::new(1),
            |mut sim| {
                for _ in 0..100 {
                    black_box(sim.update(delta()));
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("tick_mid_game", |b| {
        let template = mid_game(7);
        b.iter_batched(
            || template.clone(),
            |mut sim| {
                for _ in 0..100 {
                    black_box(sim.update(delta()));
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("state_hash_mid_game", |b| {
        let sim = mid_game(7);
        b.iter(|| black_box(sim.state_hash()));
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
