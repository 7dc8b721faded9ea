//! Test utilities for plugin testing

use bevy::app::FixedMain;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use core::time::Duration;

use crate::prelude::*;

/// Creates a minimal test app with core Bevy plugins needed for testing.
///
/// Virtual time never advances on `app.update()`, so fixed ticks only run
/// through [`run_fixed_ticks`].
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::diagnostic::DiagnosticsPlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));

    app
}

/// Runs the whole fixed-timestep schedule group `ticks` times.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedMain);
    }
}

/// A small seeded configuration: a 200×200 world on a 4×4 grid.
pub fn test_config(particle_count: usize, seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.width = 200.0;
    config.world.height = 200.0;
    config.world.grid_edge = 4;
    config.physics.initial_particle_count = particle_count;
    config.physics.initial_seed = Some(seed);
    config
}
