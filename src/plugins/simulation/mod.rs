//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the [`Simulation`] resource and schedules one `step` per fixed tick.
//! Commands arrive as [`SimulationCommand`] events in `Update`; pointer spawn
//! requests are polled at the start of every fixed tick.

use crate::prelude::*;

mod actions;
mod physics;

pub use physics::populate;

use actions::handle_simulation_commands;
use bevy::ecs::schedule::{LogLevel, ScheduleBuildSettings};
use bevy::state::app::StatesPlugin;
use physics::{SimulationSet, poll_pointer_input, report_step, spawn_initial_particles, step_simulation};

pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let mut config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        if let Err(e) = config.validate() {
            error!("{}. Falling back to default configuration.", e);
            config = SimulationConfig::default();
        }

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let simulation = match Simulation::new(&config.world, &config.physics) {
            Ok(simulation) => simulation,
            Err(e) => {
                error!("{}. Falling back to default configuration.", e);
                config = SimulationConfig::default();
                match Simulation::new(&config.world, &config.physics) {
                    Ok(simulation) => simulation,
                    Err(e) => {
                        error!("Default configuration is unusable: {}", e);
                        return;
                    }
                }
            }
        };

        info!(
            "Simulating a {}x{} world on a {}x{} grid with {}",
            config.world.width,
            config.world.height,
            config.world.grid_edge,
            config.world.grid_edge,
            simulation.integrator().name()
        );

        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }

        app.insert_resource(SharedRng::from_optional_seed(config.physics.initial_seed));
        app.insert_resource(Time::<Fixed>::from_hz(config.timing.tick_rate_hz));
        app.insert_resource(simulation);
        app.insert_resource(config);
        app.init_resource::<PointerInput>();
        app.init_resource::<TickLimit>();
        app.init_state::<AppState>();

        app.add_event::<SimulationCommand>();

        app.edit_schedule(FixedUpdate, |schedule| {
            schedule.set_build_settings(ScheduleBuildSettings {
                ambiguity_detection: LogLevel::Warn,
                ..default()
            });
        });

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Input,
                SimulationSet::Step,
                SimulationSet::Report,
            )
                .chain(),
        );

        app.add_systems(Startup, spawn_initial_particles);
        app.add_systems(Update, handle_simulation_commands);
        app.add_systems(
            FixedUpdate,
            (
                poll_pointer_input.in_set(SimulationSet::Input),
                step_simulation
                    .in_set(SimulationSet::Step)
                    .run_if(in_state(AppState::Running)),
                report_step.in_set(SimulationSet::Report),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, run_fixed_ticks, test_config};

    fn app_with(config: SimulationConfig) -> App {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(config));
        app.update();
        app
    }

    #[test]
    fn test_plugin_spawns_initial_population() {
        let app = app_with(test_config(25, 1));

        let simulation = app.world().resource::<Simulation>();
        assert_eq!(simulation.len(), 25);
        assert_eq!(simulation.grid().edge(), 4);
        assert!(simulation.grid().check_consistency().is_ok());
    }

    #[test]
    fn test_fixed_ticks_step_the_simulation() {
        let mut app = app_with(test_config(10, 2));

        run_fixed_ticks(&mut app, 5);

        let simulation = app.world().resource::<Simulation>();
        assert_eq!(simulation.tick(), 5);
        assert_eq!(simulation.last_report().tick, 5);
        assert_eq!(simulation.len(), 10);
    }

    #[test]
    fn test_pause_command_stops_ticks() {
        let mut app = app_with(test_config(5, 3));
        run_fixed_ticks(&mut app, 2);

        app.world_mut().send_event(SimulationCommand::TogglePause);
        // The handler runs in Update; the transition applies on the next frame
        app.update();
        app.update();
        run_fixed_ticks(&mut app, 3);

        assert_eq!(**app.world().resource::<State<AppState>>(), AppState::Paused);
        assert_eq!(app.world().resource::<Simulation>().tick(), 2);
    }

    #[test]
    fn test_spawn_commands_add_particles() {
        let mut app = app_with(test_config(0, 4));

        app.world_mut().send_event(SimulationCommand::SpawnRandom);
        app.world_mut()
            .send_event(SimulationCommand::SpawnAt(Vector::new(50.0, 60.0)));
        app.update();

        let simulation = app.world().resource::<Simulation>();
        assert_eq!(simulation.len(), 2);
        assert!(
            simulation
                .particles()
                .any(|(position, _)| position == Vector::new(50.0, 60.0))
        );
    }

    #[test]
    fn test_pointer_request_consumed_by_tick() {
        let mut app = app_with(test_config(0, 5));

        app.world_mut()
            .resource_mut::<PointerInput>()
            .request_spawn(Some(Vector::new(20.0, 20.0)));
        run_fixed_ticks(&mut app, 2);

        assert_eq!(app.world().resource::<Simulation>().len(), 1);
        assert!(!app.world().resource::<PointerInput>().spawn_requested);
    }

    #[test]
    fn test_restart_is_reproducible_with_seed() {
        let mut app = app_with(test_config(8, 6));
        let initial: Vec<_> = app.world().resource::<Simulation>().particles().collect();

        run_fixed_ticks(&mut app, 10);
        app.world_mut().send_event(SimulationCommand::Restart);
        app.update();

        let simulation = app.world().resource::<Simulation>();
        let restarted: Vec<_> = simulation.particles().collect();
        assert_eq!(simulation.tick(), 0);
        assert_eq!(initial, restarted);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut config = test_config(0, 7);
        config.world.grid_edge = 0;

        let app = app_with(config);

        assert_eq!(
            app.world().resource::<SimulationConfig>().world.grid_edge,
            SimulationConfig::default().world.grid_edge
        );
    }

    #[test]
    fn test_unbounded_tick_rate_falls_back_to_defaults() {
        let mut config = test_config(3, 8);
        config.timing.tick_rate_hz = f64::INFINITY;

        let app = app_with(config);

        assert_eq!(
            app.world().resource::<SimulationConfig>().timing,
            SimulationConfig::default().timing
        );
        assert!(app.world().contains_resource::<Simulation>());
    }
}
