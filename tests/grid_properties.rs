//! Whole-tick properties of the grid-limited simulation

use gravgrid::config::{ForceMode, PhysicsConfig, WorldConfig};
use gravgrid::physics::aabb2d::Aabb2d;
use gravgrid::resources::SharedRng;
use gravgrid::{CellCoord, ParticleId, ParticleSpec, Simulation, SpatialGrid, Vector};
use std::collections::BTreeSet;

fn world(width: f64, height: f64, grid_edge: usize) -> WorldConfig {
    WorldConfig {
        width,
        height,
        grid_edge,
    }
}

fn populated(count: usize, seed: u64) -> Simulation {
    let physics = PhysicsConfig {
        gravitational_constant: 0.05,
        ..Default::default()
    };
    let mut simulation = Simulation::new(&world(400.0, 300.0, 6), &physics).unwrap();
    let mut rng = SharedRng::from_seed(seed);
    for _ in 0..count {
        simulation.spawn_random_particle(&mut *rng).unwrap();
    }
    simulation
}

fn ids(simulation: &Simulation) -> BTreeSet<ParticleId> {
    simulation.grid().particles().map(|particle| particle.id()).collect()
}

#[test]
fn test_every_particle_stays_in_its_computed_cell() {
    let mut simulation = populated(200, 1);

    for _ in 0..100 {
        simulation.step(1.0);
        assert_eq!(simulation.grid().check_consistency(), Ok(()));
    }
}

#[test]
fn test_migration_never_loses_or_duplicates_particles() {
    let mut simulation = populated(150, 2);
    let before = ids(&simulation);

    let mut migrated = 0;
    for _ in 0..200 {
        migrated += simulation.step(1.0).migrated;
        assert_eq!(simulation.len(), before.len());
    }

    assert_eq!(ids(&simulation), before);
    assert!(migrated > 0, "particles should have crossed cells");
}

#[test]
fn test_mass_depends_only_on_radius() {
    let mut simulation = populated(0, 3);
    let small = simulation
        .spawn_particle(ParticleSpec::at_rest(4.0, Vector::new(50.0, 50.0)))
        .unwrap();
    let twin = simulation
        .spawn_particle(ParticleSpec::at_rest(4.0, Vector::new(350.0, 250.0)))
        .unwrap();
    let large = simulation
        .spawn_particle(ParticleSpec::at_rest(8.0, Vector::new(200.0, 150.0)))
        .unwrap();

    let masses = |simulation: &Simulation| {
        [small, twin, large].map(|id| simulation.grid().find(id).unwrap().mass())
    };
    let initial = masses(&simulation);
    assert_eq!(initial[0], initial[1]);
    assert!(initial[2] > initial[0]);

    for _ in 0..50 {
        simulation.step(1.0);
    }
    assert_eq!(masses(&simulation), initial);
}

#[test]
fn test_identical_particles_attract_but_never_themselves() {
    let physics = PhysicsConfig {
        gravitational_constant: 1.0,
        min_interaction_distance: 2.0,
        ..Default::default()
    };
    let mut simulation = Simulation::new(&world(100.0, 100.0, 1), &physics).unwrap();
    let lone = simulation
        .spawn_particle(ParticleSpec::at_rest(3.0, Vector::new(50.0, 50.0)))
        .unwrap();

    simulation.step(1.0);
    let particle = simulation.grid().find(lone).unwrap();
    assert_eq!(particle.acceleration(), Vector::ZERO);
    assert_eq!(particle.position(), Vector::new(50.0, 50.0));

    // A value-identical twin is a distinct particle and must pull
    let twin = simulation
        .spawn_particle(ParticleSpec::at_rest(3.0, Vector::new(50.0, 50.0)))
        .unwrap();
    assert_ne!(lone, twin);

    simulation.step(1.0);
    let acceleration = simulation.grid().find(lone).unwrap().acceleration();
    let mass = simulation.grid().find(twin).unwrap().mass();
    assert!((acceleration.length() - mass / 4.0).abs() < 1e-9);
}

#[test]
fn test_zero_distance_pulls_like_minimum_distance() {
    let physics = PhysicsConfig {
        gravitational_constant: 1.0,
        min_interaction_distance: 2.0,
        ..Default::default()
    };
    let mut coincident = Simulation::new(&world(100.0, 100.0, 1), &physics).unwrap();
    let a = coincident
        .spawn_particle(ParticleSpec::at_rest(1.0, Vector::new(50.0, 50.0)))
        .unwrap();
    coincident
        .spawn_particle(ParticleSpec::at_rest(1.0, Vector::new(50.0, 50.0)))
        .unwrap();

    let mut apart = Simulation::new(&world(100.0, 100.0, 1), &physics).unwrap();
    let b = apart
        .spawn_particle(ParticleSpec::at_rest(1.0, Vector::new(50.0, 50.0)))
        .unwrap();
    apart
        .spawn_particle(ParticleSpec::at_rest(1.0, Vector::new(52.0, 50.0)))
        .unwrap();

    coincident.step(1.0);
    apart.step(1.0);

    let at_zero = coincident.grid().find(a).unwrap().acceleration();
    let at_two = apart.grid().find(b).unwrap().acceleration();
    assert!(at_zero.is_finite());
    assert!((at_zero.length() - at_two.length()).abs() < 1e-12);
}

#[test]
fn test_boundary_rebound_clamps_and_reflects() {
    let physics = PhysicsConfig {
        rebound_efficiency: 0.8,
        ..Default::default()
    };
    let mut simulation = Simulation::new(&world(100.0, 100.0, 1), &physics).unwrap();
    let id = simulation
        .spawn_particle(
            ParticleSpec::at_rest(10.0, Vector::new(5.0, 50.0)).with_velocity(Vector::new(-3.0, 0.0)),
        )
        .unwrap();

    let report = simulation.step(1.0);

    let particle = simulation.grid().find(id).unwrap();
    assert_eq!(report.boundary_collisions, 1);
    assert_eq!(particle.position().x, 10.0);
    assert_eq!(particle.velocity().x, 3.0 * 0.8);
    assert!(particle.velocity().x >= 0.0);
}

#[test]
fn test_forces_come_only_from_adjacent_cells() {
    let physics = PhysicsConfig {
        gravitational_constant: 1.0,
        ..Default::default()
    };
    let mut simulation = Simulation::new(&world(500.0, 500.0, 5), &physics).unwrap();
    let center = simulation
        .spawn_particle(ParticleSpec::at_rest(5.0, Vector::new(250.0, 50.0)))
        .unwrap();
    let left = simulation
        .spawn_particle(ParticleSpec::at_rest(5.0, Vector::new(120.0, 50.0)))
        .unwrap();
    let right = simulation
        .spawn_particle(ParticleSpec::at_rest(6.0, Vector::new(350.0, 50.0)))
        .unwrap();
    let far = simulation
        .spawn_particle(ParticleSpec::at_rest(8.0, Vector::new(480.0, 50.0)))
        .unwrap();

    let grid = simulation.grid();
    assert_eq!(grid.find(center).unwrap().cell(), CellCoord { x: 2, y: 0 });
    assert_eq!(grid.find(far).unwrap().cell(), CellCoord { x: 4, y: 0 });

    let params = simulation.interaction_params();
    let subject = grid.find(center).unwrap();
    let expected = [left, right]
        .into_iter()
        .map(|id| {
            subject
                .interaction_with(grid.find(id).unwrap(), &params)
                .unwrap()
                .acceleration
        })
        .fold(Vector::ZERO, |sum, acceleration| sum + acceleration);

    simulation.step(1.0);

    let actual = simulation.grid().find(center).unwrap().acceleration();
    assert!((actual - expected).length() < 1e-15);
    // The far particle only feels its right-hand neighbor
    let far_acceleration = simulation.grid().find(far).unwrap().acceleration();
    assert!(far_acceleration.x < 0.0);
}

#[test]
fn test_uniform_gravity_skips_pairwise_pass() {
    let physics = PhysicsConfig {
        gravitational_constant: 1.0,
        force_mode: ForceMode::UniformGravity,
        uniform_gravity: 0.5,
        ..Default::default()
    };
    let mut simulation = Simulation::new(&world(200.0, 200.0, 2), &physics).unwrap();
    let a = simulation
        .spawn_particle(ParticleSpec::at_rest(4.0, Vector::new(90.0, 50.0)))
        .unwrap();
    let b = simulation
        .spawn_particle(ParticleSpec::at_rest(4.0, Vector::new(110.0, 50.0)))
        .unwrap();

    simulation.step(1.0);

    for id in [a, b] {
        assert_eq!(
            simulation.grid().find(id).unwrap().acceleration(),
            Vector::new(0.0, 0.5)
        );
    }
}

#[test]
fn test_particles_off_the_grid_are_clamped_to_edge_cells() {
    let mut grid = SpatialGrid::new(Aabb2d::from_size(100.0, 100.0), 4).unwrap();
    let id = grid
        .spawn(&ParticleSpec::at_rest(1.0, Vector::new(-20.0, 140.0)), 1.0)
        .unwrap();

    assert_eq!(grid.find(id).unwrap().cell(), CellCoord { x: 0, y: 3 });
    assert_eq!(grid.check_consistency(), Ok(()));
}
