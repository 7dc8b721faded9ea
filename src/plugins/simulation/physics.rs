use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Step,
    Report,
}

/// Fills `simulation` with `count` randomly placed particles.
pub fn populate(simulation: &mut Simulation, rng: &mut SharedRng, count: usize) {
    for _ in 0..count {
        if let Err(e) = simulation.spawn_random_particle(&mut **rng) {
            error!("Failed to spawn particle: {}", e);
            return;
        }
    }
    info!("Spawned {} particles", simulation.len());
}

/// Bevy system to spawn the configured population at startup
pub fn spawn_initial_particles(
    mut simulation: ResMut<Simulation>,
    mut rng: ResMut<SharedRng>,
    config: Res<SimulationConfig>,
) {
    populate(&mut simulation, &mut rng, config.physics.initial_particle_count);
}

/// Consumes a pending pointer spawn request
pub fn poll_pointer_input(
    mut simulation: ResMut<Simulation>,
    mut rng: ResMut<SharedRng>,
    mut pointer: ResMut<PointerInput>,
) {
    if !pointer.spawn_requested {
        return;
    }

    match simulation.poll_input(&*pointer, &mut **rng) {
        Ok(Some(id)) => debug!("Spawned particle {} from pointer input", id.value()),
        Ok(None) => {}
        Err(e) => warn!("Ignoring pointer spawn: {}", e),
    }
    pointer.spawn_requested = false;
}

/// Advances the simulation by the configured fixed time step
pub fn step_simulation(mut simulation: ResMut<Simulation>, config: Res<SimulationConfig>) {
    simulation.step(config.timing.time_step);
}

/// Logs the last step and exits once the tick limit is reached
pub fn report_step(
    simulation: Res<Simulation>,
    tick_limit: Res<TickLimit>,
    mut exit: EventWriter<AppExit>,
) {
    let report = simulation.last_report();
    if report.migrated > 0 || report.clamped > 0 || report.despawned > 0 {
        debug!(
            "Tick {}: {} particles, {} migrated, {} clamped, {} despawned",
            report.tick, report.particles, report.migrated, report.clamped, report.despawned
        );
    }

    if let Some(limit) = **tick_limit {
        if simulation.tick() >= limit {
            info!("Reached tick limit of {}", limit);
            exit.write(AppExit::Success);
        }
    }
}
