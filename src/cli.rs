//! Command line interface for Gravgrid

use clap::Parser;
use std::fmt;
use std::path::Path;

use crate::config::{ForceMode, SimulationConfig};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Configuration is out of range after overrides were applied
    InvalidConfig(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

/// Gravgrid - 2D gravity simulation on a uniform spatial grid
#[derive(Parser, Debug)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Number of particles to spawn at startup (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Gravitational constant (overrides config file)
    #[arg(short = 'g', long, value_name = "VALUE")]
    pub gravity: Option<f64>,

    /// Random seed for particle generation
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of grid cells along each axis
    #[arg(short = 'e', long, value_name = "EDGE")]
    pub edge: Option<usize>,

    /// Pairwise attraction or uniform downward gravity
    #[arg(long, value_name = "MODE")]
    pub force_mode: Option<ForceMode>,

    /// Exit after this many simulation ticks
    #[arg(long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Handles the --print-config flag by printing the effective configuration
pub fn handle_print_config(config: &SimulationConfig) -> Result<(), CliError> {
    let toml_string =
        toml::to_string_pretty(config).map_err(|err| CliError::InvalidConfig(err.to_string()))?;
    println!("{toml_string}");
    Ok(())
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        let path = Path::new(config_path);
        if !path.exists() {
            return Err(CliError::ConfigLoad(format!("{config_path} does not exist")));
        }
        SimulationConfig::load_layered(Some(path))
            .map_err(|err| CliError::ConfigLoad(err.to_string()))?
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(particle_count) = args.particles {
        println!("Overriding particle count to: {particle_count}");
        config.physics.initial_particle_count = particle_count;
    }

    if let Some(gravity) = args.gravity {
        println!("Overriding gravitational constant to: {gravity}");
        config.physics.gravitational_constant = gravity;
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.physics.initial_seed = Some(seed);
    }

    if let Some(edge) = args.edge {
        println!("Using a {edge}x{edge} grid");
        config.world.grid_edge = edge;
    }

    if let Some(force_mode) = args.force_mode {
        println!("Using force mode: {force_mode:?}");
        config.physics.force_mode = force_mode;
    }

    config
        .validate()
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    Ok(config)
}
