//! Explicit Euler integration method (forward Euler)
//!
//! Kept for comparison against the semi-implicit default. Orbits integrated
//! with it gain energy every tick and spiral outward.

use super::Integrator;
use crate::physics::math::{Scalar, Vector};

/// Explicit Euler integrator (forward Euler method)
///
/// Position is advanced with the velocity from the start of the tick, then
/// velocity picks up the acceleration:
///
/// ```text
/// x(t+dt) = x(t) + v(t) * dt
/// v(t+dt) = v(t) + a(t) * dt
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn step(&self, position: &mut Vector, velocity: &mut Vector, acceleration: Vector, dt: Scalar) {
        *position += *velocity * dt;
        *velocity += acceleration * dt;
    }

    fn name(&self) -> &str {
        "Explicit Euler"
    }

    fn order(&self) -> usize {
        1
    }
}
