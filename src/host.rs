//! Collaborators the simulation core talks to but does not implement.
//!
//! A windowing layer provides an [`InputSource`] and a [`Renderer`]; the core
//! only produces the data those calls need and never depends on how they draw.

use crate::physics::math::{Scalar, Vector};
use bevy::color::Color;
use core::time::Duration;

/// Polled once per tick for user spawn requests.
pub trait InputSource {
    fn is_spawn_requested(&self) -> bool;

    /// Pointer location in world coordinates, if the pointer is over the world
    fn pointer_position(&self) -> Option<Vector>;
}

/// Receives the particle set after each tick.
pub trait Renderer {
    fn draw_particle(&mut self, position: Vector, radius: Scalar);

    fn draw_interaction_line(&mut self, _from: Vector, _to: Vector, _intensity: u8) {}

    fn draw_vector(&mut self, _origin: Vector, _vector: Vector, _color: Color) {}
}

/// Monotonic time source, used only for rate diagnostics.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

impl<T: Default> Clock for bevy::time::Time<T> {
    fn elapsed(&self) -> Duration {
        bevy::time::Time::<T>::elapsed(self)
    }
}

/// Ticks completed per second of `clock` time, or zero before any time has passed.
pub fn ticks_per_second(ticks: u64, clock: &impl Clock) -> f64 {
    let seconds = clock.elapsed().as_secs_f64();
    if seconds > 0.0 {
        ticks as f64 / seconds
    } else {
        0.0
    }
}
