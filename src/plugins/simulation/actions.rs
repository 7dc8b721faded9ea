//! Action handlers for simulation commands
//!
//! This module contains handlers for SimulationCommand events including
//! spawning, restart, and pause/resume functionality.

use super::physics::populate;
use crate::prelude::*;

pub fn handle_simulation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut simulation: ResMut<Simulation>,
    mut rng: ResMut<SharedRng>,
    config: Res<SimulationConfig>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    for command in commands_reader.read() {
        match *command {
            SimulationCommand::SpawnRandom => {
                if let Err(e) = simulation.spawn_random_particle(&mut **rng) {
                    warn!("Failed to spawn particle: {}", e);
                }
            }
            SimulationCommand::SpawnAt(position) => {
                if let Err(e) = simulation.spawn_particle_at(position, &mut **rng) {
                    warn!("Failed to spawn particle at {}: {}", position, e);
                }
            }
            SimulationCommand::Restart => {
                simulation.clear();
                *rng = SharedRng::from_optional_seed(config.physics.initial_seed);
                populate(&mut simulation, &mut rng, config.physics.initial_particle_count);
            }
            SimulationCommand::TogglePause => match state.get() {
                AppState::Running => next_state.set(AppState::Paused),
                AppState::Paused => next_state.set(AppState::Running),
            },
            SimulationCommand::Quit => {
                exit.write(AppExit::Success);
            }
        }
    }
}
