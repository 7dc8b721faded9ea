//! Numerical integration methods for the fixed-timestep particle simulation

use crate::config::IntegratorType;
use crate::physics::math::{Scalar, Vector};

pub mod explicit_euler;
pub mod semi_implicit_euler;

pub use explicit_euler::ExplicitEuler;
pub use semi_implicit_euler::SemiImplicitEuler;

/// Base trait for all integrators
///
/// Acceleration is evaluated once per tick by the grid pass, so integrators
/// here are single-stage: they only ever see the acceleration sampled at the
/// pre-motion position.
pub trait Integrator: Send + Sync {
    /// Advance a single particle's state by one time step
    ///
    /// # Arguments
    /// * `position` - Mutable reference to position
    /// * `velocity` - Mutable reference to velocity vector
    /// * `acceleration` - Acceleration accumulated this tick
    /// * `dt` - Time step
    fn step(&self, position: &mut Vector, velocity: &mut Vector, acceleration: Vector, dt: Scalar);

    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the order of this integrator
    fn order(&self) -> usize;
}

/// Builds the integrator selected in configuration.
pub fn create_integrator(integrator_type: IntegratorType) -> Box<dyn Integrator> {
    match integrator_type {
        IntegratorType::SemiImplicitEuler => Box::new(SemiImplicitEuler),
        IntegratorType::ExplicitEuler => Box::new(ExplicitEuler),
    }
}
