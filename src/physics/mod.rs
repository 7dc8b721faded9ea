pub mod aabb2d;
pub mod error;
pub mod grid;
pub mod integrators;
pub mod math;
pub mod particle;
pub mod simulation;
