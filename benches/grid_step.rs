use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use std::hint::black_box;

use gravgrid::config::{ForceMode, PhysicsConfig, WorldConfig};
use gravgrid::resources::SharedRng;
use gravgrid::Simulation;

fn populated_simulation(count: usize, grid_edge: usize, force_mode: ForceMode, seed: u64) -> Simulation {
    let world = WorldConfig {
        width: 1000.0,
        height: 1000.0,
        grid_edge,
    };
    let physics = PhysicsConfig {
        force_mode,
        ..Default::default()
    };

    let mut simulation = Simulation::new(&world, &physics).unwrap();
    let mut rng = SharedRng::from_seed(seed);
    for _ in 0..count {
        simulation.spawn_random_particle(&mut *rng).unwrap();
    }
    simulation
}

fn bench_step_by_particle_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_by_particle_count");

    let particle_counts = [10, 100, 500, 1_000, 2_000];

    for &count in &particle_counts {
        let mut simulation = populated_simulation(count, 5, ForceMode::NBody, 42);

        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, _| {
            b.iter(|| black_box(simulation.step(black_box(1.0))));
        });
    }

    group.finish();
}

fn bench_step_by_grid_edge(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_by_grid_edge");

    let grid_edges = [1, 3, 5, 10, 20];

    for &edge in &grid_edges {
        let mut simulation = populated_simulation(1_000, edge, ForceMode::NBody, 42);

        group.bench_with_input(BenchmarkId::new("edge", edge), &edge, |b, _| {
            b.iter(|| black_box(simulation.step(black_box(1.0))));
        });
    }

    group.finish();
}

fn bench_force_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_modes");

    for (name, mode) in [("n_body", ForceMode::NBody), ("uniform_gravity", ForceMode::UniformGravity)] {
        let mut simulation = populated_simulation(1_000, 5, mode, 42);

        group.bench_function(name, |b| {
            b.iter(|| black_box(simulation.step(black_box(1.0))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_step_by_particle_count,
    bench_step_by_grid_edge,
    bench_force_modes
);
criterion_main!(benches);
