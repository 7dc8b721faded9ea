use bevy::app::ScheduleRunnerPlugin;
use bevy::diagnostic::DiagnosticsPlugin;
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::log::Level;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use clap::Parser;
use core::time::Duration;
use gravgrid::cli::{Args, handle_print_config, load_and_apply_config};
use gravgrid::prelude::{AppState, TickLimit};
use gravgrid::{SimulationDiagnosticsPlugin, SimulationPlugin};

const INVALID_CONFIG_EXIT_CODE: u8 = 2;

fn main() -> AppExit {
    let args = Args::parse();

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::from_code(INVALID_CONFIG_EXIT_CODE);
        }
    };

    if args.print_config {
        return match handle_print_config(&config) {
            Ok(()) => AppExit::Success,
            Err(e) => {
                eprintln!("Error: {e}");
                AppExit::from_code(INVALID_CONFIG_EXIT_CODE)
            }
        };
    }

    let tick_period = Duration::from_secs_f64(1.0 / config.timing.tick_rate_hz);
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick_period)),
        LogPlugin {
            level: log_level,
            ..default()
        },
        StatesPlugin,
        DiagnosticsPlugin,
        SimulationPlugin::with_config(config),
        SimulationDiagnosticsPlugin::default(),
    ));

    if args.verbose {
        app.add_plugins(LogDiagnosticsPlugin::default());
    }

    app.insert_resource(TickLimit(args.ticks));

    if args.paused {
        app.insert_state(AppState::Paused);
    }

    app.run()
}
