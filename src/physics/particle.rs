//! Circular point-masses and their per-tick behaviours.

use crate::physics::aabb2d::Aabb2d;
use crate::physics::error::SimulationError;
use crate::physics::math::{Scalar, Vector, sphere_mass};

/// Stable identity of a particle, assigned by the grid on spawn.
///
/// Self-interaction is skipped by comparing ids, never by comparing state:
/// two distinct particles may share every physical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub(crate) u64);

impl ParticleId {
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Parameters for spawning a particle with explicit state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub radius: Scalar,
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
}

impl ParticleSpec {
    /// A particle at rest.
    pub fn at_rest(radius: Scalar, position: Vector) -> Self {
        Self {
            radius,
            position,
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SimulationError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SimulationError::InvalidRadius(self.radius));
        }
        for value in [self.position, self.velocity, self.acceleration] {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteState(value));
            }
        }
        Ok(())
    }
}

/// Tunables for the pairwise inverse-square pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionParams {
    pub gravitational_constant: Scalar,
    /// Distances below this are treated as this distance
    pub min_distance: Scalar,
    /// Distance over which the visual intensity fades from 255 to 0
    pub intensity_falloff: Scalar,
}

/// Result of one particle pulling on another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub acceleration: Vector,
    /// Render-only strength in `[0, 255]`
    pub intensity: u8,
}

#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    radius: Scalar,
    mass: Scalar,
    pub(crate) position: Vector,
    pub(crate) velocity: Vector,
    pub(crate) acceleration: Vector,
    pub(crate) cell: CellCoord,
}

impl Particle {
    pub(crate) fn new(id: ParticleId, spec: &ParticleSpec, density: Scalar, cell: CellCoord) -> Self {
        Self {
            id,
            radius: spec.radius,
            mass: sphere_mass(spec.radius, density),
            position: spec.position,
            velocity: spec.velocity,
            acceleration: spec.acceleration,
            cell,
        }
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> Scalar {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> Vector {
        self.acceleration
    }

    /// Cell this particle is bucketed in. Authoritative for neighbor lookup.
    #[inline]
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }

    /// Clears accumulated acceleration, seeding it with `baseline`.
    ///
    /// `baseline` is zero in N-body mode and the constant pull in uniform-gravity mode.
    pub fn reset_forces(&mut self, baseline: Vector) {
        self.acceleration = baseline;
    }

    /// Acceleration `other` imparts on `self`, or `None` when `other` is `self`.
    pub fn interaction_with(&self, other: &Particle, params: &InteractionParams) -> Option<Interaction> {
        if other.id == self.id {
            return None;
        }

        let displacement = other.position - self.position;
        let distance = displacement.length();
        let clamped_distance = distance.max(params.min_distance);
        // Coincident particles still pull with the clamped magnitude; pick a fixed axis
        let direction = displacement.try_normalize().unwrap_or(Vector::X);

        let magnitude = params.gravitational_constant * other.mass / (clamped_distance * clamped_distance);

        Some(Interaction {
            acceleration: direction * magnitude,
            intensity: interaction_intensity(distance, params.intensity_falloff),
        })
    }

    /// Adds `other`'s pull to this particle's acceleration and returns the
    /// interaction intensity, or `None` if `other` is this particle.
    pub fn accumulate_interaction(&mut self, other: &Particle, params: &InteractionParams) -> Option<u8> {
        let interaction = self.interaction_with(other, params)?;
        self.acceleration += interaction.acceleration;
        Some(interaction.intensity)
    }

    pub(crate) fn add_acceleration(&mut self, delta: Vector) {
        self.acceleration += delta;
    }

    /// Clamps the particle inside `bounds` and reflects velocity that still
    /// points out of the world, keeping `rebound_efficiency` of its speed.
    ///
    /// Returns true when any axis collided.
    pub fn resolve_boundary_collision(&mut self, bounds: &Aabb2d, rebound_efficiency: Scalar) -> bool {
        let x = resolve_axis(
            &mut self.position.x,
            &mut self.velocity.x,
            self.radius,
            bounds.min.x,
            bounds.max.x,
            rebound_efficiency,
        );
        let y = resolve_axis(
            &mut self.position.y,
            &mut self.velocity.y,
            self.radius,
            bounds.min.y,
            bounds.max.y,
            rebound_efficiency,
        );
        x || y
    }
}

fn resolve_axis(
    position: &mut Scalar,
    velocity: &mut Scalar,
    radius: Scalar,
    min: Scalar,
    max: Scalar,
    rebound_efficiency: Scalar,
) -> bool {
    if *position - radius < min {
        *position = min + radius;
        if *velocity < 0.0 {
            *velocity = -*velocity * rebound_efficiency;
        }
        true
    } else if *position + radius > max {
        *position = max - radius;
        if *velocity > 0.0 {
            *velocity = -*velocity * rebound_efficiency;
        }
        true
    } else {
        false
    }
}

/// 255 at zero distance, fading linearly to 0 at `falloff`.
fn interaction_intensity(distance: Scalar, falloff: Scalar) -> u8 {
    if !(falloff > 0.0) || !distance.is_finite() {
        return 0;
    }
    let intensity = 255.0 * (1.0 - distance / falloff);
    intensity.clamp(0.0, 255.0) as u8
}
