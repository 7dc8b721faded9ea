//! Gravgrid prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the crate to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Config
pub use crate::config::{ForceMode, SimulationConfig};

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Resources
pub use crate::resources::{PointerInput, SharedRng, TickLimit};

// Internal re-exports - Events
pub use crate::events::SimulationCommand;

// Internal re-exports - Physics
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::particle::{ParticleId, ParticleSpec};
pub use crate::physics::simulation::{Simulation, StepReport};
