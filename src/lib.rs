//! Gravgrid library
//!
//! Fixed-timestep 2D gravity simulation whose pairwise forces are limited to
//! each particle's 3×3 neighborhood in a uniform spatial grid. The core in
//! [`physics`] is plain Rust; [`plugins`] drives it from a bevy app.

pub mod cli;
pub mod config;
pub mod events;
pub mod host;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;

pub use config::SimulationConfig;
pub use physics::{
    error::SimulationError,
    grid::SpatialGrid,
    math::{Scalar, Vector},
    particle::{CellCoord, Particle, ParticleId, ParticleSpec},
    simulation::{Simulation, StepReport},
};
pub use plugins::{simulation::SimulationPlugin, simulation_diagnostics::SimulationDiagnosticsPlugin};
