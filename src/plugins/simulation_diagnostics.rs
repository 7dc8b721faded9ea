//! Simulation diagnostics module.
//!
//! Publishes each tick's [`StepReport`] through bevy's diagnostic store so
//! `LogDiagnosticsPlugin` (or any other consumer) can show particle count,
//! migrations, boundary collisions, cell clamps, and the achieved tick rate.

use crate::host::ticks_per_second;
use crate::prelude::*;
use bevy::diagnostic::DEFAULT_MAX_HISTORY_LENGTH;
use bevy::diagnostic::Diagnostic;
use bevy::diagnostic::DiagnosticPath;
use bevy::diagnostic::Diagnostics;
use bevy::diagnostic::RegisterDiagnostic;

pub struct SimulationDiagnosticsPlugin {
    max_history_length: usize,
    smoothing_factor: f64,
}

impl Default for SimulationDiagnosticsPlugin {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            smoothing_factor: 0.1,
        }
    }
}

impl SimulationDiagnosticsPlugin {
    pub const PARTICLES_PATH: DiagnosticPath = DiagnosticPath::const_new("simulation/particles");
    pub const MIGRATIONS_PATH: DiagnosticPath = DiagnosticPath::const_new("simulation/migrations");
    pub const BOUNDARY_COLLISIONS_PATH: DiagnosticPath =
        DiagnosticPath::const_new("simulation/boundary_collisions");
    pub const CELL_CLAMPS_PATH: DiagnosticPath = DiagnosticPath::const_new("simulation/cell_clamps");
    pub const TICKS_PER_SECOND_PATH: DiagnosticPath =
        DiagnosticPath::const_new("simulation/ticks_per_second");

    fn diagnostic_paths() -> [DiagnosticPath; 5] {
        [
            Self::PARTICLES_PATH,
            Self::MIGRATIONS_PATH,
            Self::BOUNDARY_COLLISIONS_PATH,
            Self::CELL_CLAMPS_PATH,
            Self::TICKS_PER_SECOND_PATH,
        ]
    }

    fn register_diagnostics(&self, app: &mut App) {
        for path in Self::diagnostic_paths() {
            app.register_diagnostic(
                Diagnostic::new(path)
                    .with_max_history_length(self.max_history_length)
                    .with_smoothing_factor(self.smoothing_factor),
            );
        }
    }

    fn update_step_diagnostics(
        simulation: Res<Simulation>,
        clock: Res<Time<Real>>,
        mut diagnostics: Diagnostics,
    ) {
        let report = simulation.last_report();
        diagnostics.add_measurement(&Self::PARTICLES_PATH, || report.particles as f64);
        diagnostics.add_measurement(&Self::MIGRATIONS_PATH, || report.migrated as f64);
        diagnostics.add_measurement(&Self::BOUNDARY_COLLISIONS_PATH, || {
            report.boundary_collisions as f64
        });
        diagnostics.add_measurement(&Self::CELL_CLAMPS_PATH, || report.clamped as f64);
        diagnostics.add_measurement(&Self::TICKS_PER_SECOND_PATH, || {
            ticks_per_second(simulation.tick(), &*clock)
        });
    }
}

impl Plugin for SimulationDiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        self.register_diagnostics(app);

        app.add_systems(
            FixedPostUpdate,
            Self::update_step_diagnostics.run_if(resource_exists::<Simulation>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::simulation::SimulationPlugin;
    use crate::test_utils::{create_test_app, run_fixed_ticks, test_config};
    use bevy::diagnostic::DiagnosticsStore;

    #[test]
    fn test_diagnostics_track_particle_count() {
        let mut app = create_test_app();
        app.add_plugins((
            SimulationPlugin::with_config(test_config(12, 11)),
            SimulationDiagnosticsPlugin::default(),
        ));
        app.update();

        run_fixed_ticks(&mut app, 3);

        let store = app.world().resource::<DiagnosticsStore>();
        for path in SimulationDiagnosticsPlugin::diagnostic_paths() {
            assert!(store.get(&path).is_some(), "missing diagnostic {path}");
        }
        let particles = store
            .get(&SimulationDiagnosticsPlugin::PARTICLES_PATH)
            .and_then(|diagnostic| diagnostic.value());
        assert_eq!(particles, Some(12.0));
    }
}
