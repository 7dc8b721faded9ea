//! One fixed tick of the particle simulation.
//!
//! A tick runs in strict phases so that no phase observes a half-updated
//! world:
//!
//! 1. reset every particle's acceleration to the force-mode baseline
//! 2. accumulate pairwise pulls from each particle's 3×3 neighborhood, reading
//!    only pre-motion positions and cached cells
//! 3. integrate and resolve boundary collisions (order set by [`BoundaryPhase`])
//! 4. drop particles whose state went non-finite
//! 5. migrate particles whose cell changed

use crate::config::{BoundaryPhase, ForceMode, PhysicsConfig, WorldConfig};
use crate::host::{InputSource, Renderer};
use crate::physics::aabb2d::Aabb2d;
use crate::physics::error::SimulationError;
use crate::physics::grid::SpatialGrid;
use crate::physics::integrators::{Integrator, create_integrator};
use crate::physics::math::{Scalar, Vector, random_position_within, random_radius};
use crate::physics::particle::{InteractionParams, ParticleId, ParticleSpec};
use bevy::color::Color;
use bevy::prelude::*;
use rand::Rng;

pub const VELOCITY_COLOR: Color = Color::srgb(0.2, 0.9, 0.3);
pub const ACCELERATION_COLOR: Color = Color::srgb(0.9, 0.3, 0.2);

/// Segment between two interacting particles, for visualization only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionLine {
    pub from: Vector,
    pub to: Vector,
    pub intensity: u8,
}

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub particles: usize,
    pub migrated: usize,
    pub clamped: usize,
    pub boundary_collisions: usize,
    pub despawned: usize,
}

#[derive(Resource)]
pub struct Simulation {
    grid: SpatialGrid,
    physics: PhysicsConfig,
    integrator: Box<dyn Integrator>,
    interactions: Vec<InteractionLine>,
    tick: u64,
    last_report: StepReport,
}

impl Simulation {
    pub fn new(world: &WorldConfig, physics: &PhysicsConfig) -> Result<Self, SimulationError> {
        let bounds = Aabb2d::from_size(world.width, world.height);
        let grid = SpatialGrid::new(bounds, world.grid_edge)?;

        Ok(Self {
            grid,
            physics: physics.clone(),
            integrator: create_integrator(physics.integrator),
            interactions: Vec::new(),
            tick: 0,
            last_report: StepReport::default(),
        })
    }

    #[inline]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    #[inline]
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    #[inline]
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn last_report(&self) -> StepReport {
        self.last_report
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Lines recorded during the last tick when `record_interactions` is on.
    pub fn interactions(&self) -> &[InteractionLine] {
        &self.interactions
    }

    pub fn interaction_params(&self) -> InteractionParams {
        InteractionParams {
            gravitational_constant: self.physics.gravitational_constant,
            min_distance: self.physics.min_interaction_distance,
            intensity_falloff: self.grid.cell_size().x,
        }
    }

    /// Spawns a particle with explicit state, evicting the oldest one first
    /// if the population is at `max_particles`.
    pub fn spawn_particle(&mut self, spec: ParticleSpec) -> Result<ParticleId, SimulationError> {
        spec.validate()?;
        let size = self.grid.bounds().size();
        if spec.radius * 2.0 > size.min_element() {
            return Err(SimulationError::RadiusExceedsWorld {
                radius: spec.radius,
                width: size.x,
                height: size.y,
            });
        }
        self.make_room();
        self.grid.spawn(&spec, self.physics.density)
    }

    /// Spawns a resting particle of random radius at a random position inside the world.
    pub fn spawn_random_particle(&mut self, rng: &mut impl Rng) -> Result<ParticleId, SimulationError> {
        let radius = random_radius(
            rng,
            self.physics.min_particle_radius,
            self.physics.max_particle_radius,
        );
        let position = random_position_within(rng, self.grid.bounds(), radius);
        self.spawn_particle(ParticleSpec::at_rest(radius, position))
    }

    /// Spawns a resting particle of random radius at `position`.
    pub fn spawn_particle_at(&mut self, position: Vector, rng: &mut impl Rng) -> Result<ParticleId, SimulationError> {
        let radius = random_radius(
            rng,
            self.physics.min_particle_radius,
            self.physics.max_particle_radius,
        );
        self.spawn_particle(ParticleSpec::at_rest(radius, position))
    }

    /// Spawns at the pointer, or randomly when no pointer is over the world,
    /// if `input` requests it.
    pub fn poll_input(
        &mut self,
        input: &impl InputSource,
        rng: &mut impl Rng,
    ) -> Result<Option<ParticleId>, SimulationError> {
        if !input.is_spawn_requested() {
            return Ok(None);
        }

        let id = match input.pointer_position() {
            Some(position) => self.spawn_particle_at(position, rng)?,
            None => self.spawn_random_particle(rng)?,
        };
        Ok(Some(id))
    }

    /// Removes every particle and resets the tick counter.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.interactions.clear();
        self.tick = 0;
        self.last_report = StepReport::default();
    }

    fn make_room(&mut self) {
        let Some(capacity) = self.physics.max_particles else {
            return;
        };

        while self.grid.len() >= capacity.max(1) {
            let Some(oldest) = self.grid.oldest() else {
                return;
            };
            if let Some(cell) = self.grid.cell_index_of(oldest) {
                self.grid.remove(oldest, cell);
                debug!("Evicted particle {} to stay within {} particles", oldest.value(), capacity);
            }
        }
    }

    /// Advances the simulation by one fixed tick of length `dt`.
    pub fn step(&mut self, dt: Scalar) -> StepReport {
        self.tick += 1;
        let mut report = StepReport {
            tick: self.tick,
            ..default()
        };

        let baseline = self
            .physics
            .force_mode
            .baseline_acceleration(self.physics.uniform_gravity);
        for particle in self.grid.particles_mut() {
            particle.reset_forces(baseline);
        }

        self.interactions.clear();
        if self.physics.force_mode == ForceMode::NBody {
            self.accumulate_interactions();
        }

        report.boundary_collisions = self.integrate(dt);

        report.despawned = self.grid.retain(|particle| {
            let finite = particle.is_finite();
            if !finite {
                warn!(
                    "Despawning particle {} with non-finite state at {}",
                    particle.id().value(),
                    particle.position()
                );
            }
            finite
        });

        let migration = self.grid.migrate();
        report.migrated = migration.moved;
        report.clamped = migration.clamped;
        report.particles = self.grid.len();

        debug_assert!(self.grid.check_consistency().is_ok());

        self.last_report = report;
        report
    }

    /// Neighborhood pass. Deltas are computed against an immutable view of the
    /// grid and written back afterwards, so every pull uses pre-motion state.
    fn accumulate_interactions(&mut self) {
        let params = self.interaction_params();
        let record = self.physics.record_interactions;
        let grid = &self.grid;

        let mut deltas: Vec<Vec<Vector>> = Vec::with_capacity(grid.cells().len());
        for cell in grid.cells() {
            let mut cell_deltas = Vec::with_capacity(cell.len());
            for particle in cell {
                let mut acceleration = Vector::ZERO;
                for other in grid.neighbors_of(particle.cell()) {
                    let Some(interaction) = particle.interaction_with(other, &params) else {
                        continue;
                    };
                    acceleration += interaction.acceleration;

                    // Each pair shows up from both sides; draw it once
                    if record && particle.id() < other.id() {
                        self.interactions.push(InteractionLine {
                            from: particle.position(),
                            to: other.position(),
                            intensity: interaction.intensity,
                        });
                    }
                }
                cell_deltas.push(acceleration);
            }
            deltas.push(cell_deltas);
        }

        for (cell, cell_deltas) in self.grid.cells_mut().iter_mut().zip(deltas) {
            for (particle, delta) in cell.iter_mut().zip(cell_deltas) {
                particle.add_acceleration(delta);
            }
        }
    }

    fn integrate(&mut self, dt: Scalar) -> usize {
        let bounds = *self.grid.bounds();
        let rebound_efficiency = self.physics.rebound_efficiency;
        let phase = self.physics.boundary_phase;
        let integrator = self.integrator.as_ref();

        let mut collisions = 0;
        for particle in self.grid.particles_mut() {
            let collided = match phase {
                BoundaryPhase::AfterIntegration => {
                    let acceleration = particle.acceleration;
                    integrator.step(&mut particle.position, &mut particle.velocity, acceleration, dt);
                    particle.resolve_boundary_collision(&bounds, rebound_efficiency)
                }
                BoundaryPhase::BeforeIntegration => {
                    let collided = particle.resolve_boundary_collision(&bounds, rebound_efficiency);
                    let acceleration = particle.acceleration;
                    integrator.step(&mut particle.position, &mut particle.velocity, acceleration, dt);
                    collided
                }
            };
            if collided {
                collisions += 1;
            }
        }
        collisions
    }

    /// `(position, radius)` of every live particle.
    pub fn particles(&self) -> impl Iterator<Item = (Vector, Scalar)> + '_ {
        self.grid
            .particles()
            .map(|particle| (particle.position(), particle.radius()))
    }

    /// Hands the current state to `renderer`: particles, recorded interaction
    /// lines, then velocity and acceleration vectors.
    pub fn render(&self, renderer: &mut impl Renderer) {
        for (position, radius) in self.particles() {
            renderer.draw_particle(position, radius);
        }
        for line in &self.interactions {
            renderer.draw_interaction_line(line.from, line.to, line.intensity);
        }
        for particle in self.grid.particles() {
            renderer.draw_vector(particle.position(), particle.velocity(), VELOCITY_COLOR);
            renderer.draw_vector(particle.position(), particle.acceleration(), ACCELERATION_COLOR);
        }
    }
}
