//! Velocity-first Euler step, the default integrator

use super::Integrator;
use crate::physics::math::{Scalar, Vector};

/// Advances velocity from the tick's acceleration, then position from the new
/// velocity. With `dt = 1` this is `velocity += acceleration; position += velocity`.
#[derive(Debug, Clone, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, position: &mut Vector, velocity: &mut Vector, acceleration: Vector, dt: Scalar) {
        *velocity += acceleration * dt;
        *position += *velocity * dt;
    }

    fn name(&self) -> &str {
        "Semi-implicit Euler"
    }

    fn order(&self) -> usize {
        1
    }
}
