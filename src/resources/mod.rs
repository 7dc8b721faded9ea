use crate::host::InputSource;
use crate::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

/// Random source for spawning, handed explicitly to every spawn call so a
/// seed fully determines a run.
#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// Latest pointer state, written by whatever windowing layer hosts the app.
///
/// A spawn request is consumed by the next fixed tick.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub spawn_requested: bool,
    pub position: Option<Vector>,
}

impl PointerInput {
    pub fn request_spawn(&mut self, position: Option<Vector>) {
        self.spawn_requested = true;
        self.position = position;
    }
}

impl InputSource for PointerInput {
    fn is_spawn_requested(&self) -> bool {
        self.spawn_requested
    }

    fn pointer_position(&self) -> Option<Vector> {
        self.position
    }
}

/// Stop after this many ticks, if set.
#[derive(Resource, Deref, DerefMut, Copy, Clone, Default, PartialEq, Debug)]
pub struct TickLimit(pub Option<u64>);
