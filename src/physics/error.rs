use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::ParticleId;
use std::fmt;

/// Errors raised while building the grid or admitting particles into it.
///
/// Nothing inside a tick returns these; in-tick problems are clamped and logged.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Grid edge must be at least one cell
    InvalidEdge(usize),
    /// World dimensions must be positive and finite
    InvalidWorld { width: Scalar, height: Scalar },
    /// Particle radius must be positive and finite
    InvalidRadius(Scalar),
    /// Spawn position, velocity, or acceleration was NaN or infinite
    NonFiniteState(Vector),
    /// A particle with this id already lives in the grid
    DuplicateParticle(ParticleId),
    /// Particle does not fit inside the world
    RadiusExceedsWorld { radius: Scalar, width: Scalar, height: Scalar },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidEdge(edge) => {
                write!(f, "Grid edge must be at least 1, got {edge}")
            }
            SimulationError::InvalidWorld { width, height } => {
                write!(f, "World must have positive finite size, got {width}x{height}")
            }
            SimulationError::InvalidRadius(radius) => {
                write!(f, "Particle radius must be positive and finite, got {radius}")
            }
            SimulationError::NonFiniteState(value) => {
                write!(f, "Particle state must be finite, got {value}")
            }
            SimulationError::DuplicateParticle(id) => {
                write!(f, "Particle {} is already in the grid", id.value())
            }
            SimulationError::RadiusExceedsWorld {
                radius,
                width,
                height,
            } => {
                write!(f, "Particle radius {radius} does not fit a {width}x{height} world")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
