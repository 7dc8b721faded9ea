//! Centralized event definitions
//!
//! Hosts drive the simulation by sending these. They are handled once per
//! frame in `Update`, between fixed ticks.

use crate::physics::math::Vector;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    SpawnRandom,
    SpawnAt(Vector),
    Restart,
    TogglePause,
    Quit,
}
