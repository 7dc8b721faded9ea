use crate::physics::math::{Scalar, Vector};
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";
const ENVIRONMENT_PREFIX: &str = "GRAVGRID";

/// Fastest tick rate a fixed timestep can be built from
pub const MAX_TICK_RATE_HZ: f64 = 10_000.0;

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Layered sources could not be read or deserialized
    Load(::config::ConfigError),
    /// Configuration could not be rendered as TOML
    Serialize(toml::ser::Error),
    /// Configuration file could not be written
    Io(std::io::Error),
    /// A value is out of its allowed range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(err) => write!(f, "Failed to load configuration: {err}"),
            ConfigError::Serialize(err) => write!(f, "Failed to serialize configuration: {err}"),
            ConfigError::Io(err) => write!(f, "Failed to write configuration: {err}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            ConfigError::Io(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(err: ::config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub world: WorldConfig,
    pub timing: TimingConfig,
}

/// How each tick seeds and accumulates acceleration. The modes never mix.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ForceMode {
    /// Pairwise inverse-square attraction within each 3×3 neighborhood
    #[default]
    NBody,
    /// Constant downward pull, no pairwise pass
    UniformGravity,
}

impl ForceMode {
    /// Acceleration every particle starts a tick with.
    ///
    /// Screen coordinates grow downward, so "down" is +y.
    pub fn baseline_acceleration(&self, uniform_gravity: Scalar) -> Vector {
        match self {
            ForceMode::NBody => Vector::ZERO,
            ForceMode::UniformGravity => Vector::new(0.0, uniform_gravity),
        }
    }
}

/// Whether boundary clamping happens on the pre- or post-integration position.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPhase {
    /// Integrate, then clamp and reflect. Particles always end a tick inside the world.
    #[default]
    AfterIntegration,
    /// Clamp and reflect the current position, then integrate
    BeforeIntegration,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    #[default]
    SemiImplicitEuler,
    ExplicitEuler,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: Scalar,
    pub density: Scalar,
    pub min_interaction_distance: Scalar,
    pub rebound_efficiency: Scalar,
    pub force_mode: ForceMode,
    pub uniform_gravity: Scalar,
    pub boundary_phase: BoundaryPhase,
    pub integrator: IntegratorType,
    pub initial_particle_count: usize,
    pub initial_seed: Option<u64>,
    pub min_particle_radius: Scalar,
    pub max_particle_radius: Scalar,
    pub max_particles: Option<usize>,
    pub record_interactions: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 0.0007,
            density: 1.0,
            min_interaction_distance: 2.0,
            rebound_efficiency: 0.8,
            force_mode: ForceMode::NBody,
            uniform_gravity: 0.1,
            boundary_phase: BoundaryPhase::AfterIntegration,
            integrator: IntegratorType::SemiImplicitEuler,
            initial_particle_count: 100,
            initial_seed: None,
            min_particle_radius: 2.0,
            max_particle_radius: 8.0,
            max_particles: None,
            record_interactions: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: Scalar,
    pub height: Scalar,
    pub grid_edge: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            grid_edge: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Ticks per second of wall-clock time
    pub tick_rate_hz: f64,
    /// Simulated time advanced by each tick
    pub time_step: Scalar,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            time_step: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gravgrid")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load defaults, then the user config file, then `GRAVGRID_*` environment overrides
    pub fn load_layered(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(::config::File::from(file.to_path_buf()).required(false));
        }

        let layered: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(layered)
    }

    /// Load from the user config directory, falling back to defaults on any error
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save_to_user_config(&self) -> Result<(), ConfigError> {
        let path = Self::user_config_path()
            .ok_or_else(|| ConfigError::Invalid("no user config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.save(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.width.is_finite() && world.width > 0.0)
            || !(world.height.is_finite() && world.height > 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "world must have positive size, got {}x{}",
                world.width, world.height
            )));
        }
        if world.grid_edge == 0 {
            return Err(ConfigError::Invalid("grid_edge must be at least 1".into()));
        }

        let physics = &self.physics;
        for (name, value) in [
            ("gravitational_constant", physics.gravitational_constant),
            ("uniform_gravity", physics.uniform_gravity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&physics.rebound_efficiency) {
            return Err(ConfigError::Invalid(format!(
                "rebound_efficiency must be within [0, 1], got {}",
                physics.rebound_efficiency
            )));
        }
        if !(physics.min_particle_radius > 0.0
            && physics.min_particle_radius <= physics.max_particle_radius
            && physics.max_particle_radius.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "particle radius range {}..={} is empty, non-positive or unbounded",
                physics.min_particle_radius, physics.max_particle_radius
            )));
        }
        if physics.max_particle_radius * 2.0 > world.width.min(world.height) {
            return Err(ConfigError::Invalid(format!(
                "max_particle_radius {} does not fit a {}x{} world",
                physics.max_particle_radius, world.width, world.height
            )));
        }
        if !(physics.min_interaction_distance.is_finite() && physics.min_interaction_distance > 0.0)
        {
            return Err(ConfigError::Invalid(
                "min_interaction_distance must be positive and finite".into(),
            ));
        }
        if !(physics.density.is_finite() && physics.density > 0.0) {
            return Err(ConfigError::Invalid("density must be positive and finite".into()));
        }
        if physics.max_particles == Some(0) {
            return Err(ConfigError::Invalid("max_particles must be at least 1".into()));
        }

        let timing = &self.timing;
        if !(timing.tick_rate_hz > 0.0 && timing.tick_rate_hz <= MAX_TICK_RATE_HZ) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be within (0, {MAX_TICK_RATE_HZ}], got {}",
                timing.tick_rate_hz
            )));
        }
        if !(timing.time_step.is_finite() && timing.time_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time_step must be positive and finite, got {}",
                timing.time_step
            )));
        }

        Ok(())
    }
}
