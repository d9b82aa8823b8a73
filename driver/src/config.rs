//! Configuration loader and validator for the event loop driver.
//! Handles parsing, validation, and access to run configuration files.

use hadronic::Normalization;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Main Configuration Structs
// ------------------------------------------------------------------------------------------------

/// Main configuration struct for one analysis run.
///
/// Everything that is fixed for the whole run: the analysis to load, the
/// beam and target, the physics case and where plugins are searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    pub beam: BeamConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name of the analysis (compiled-in or `lib<name>` plugin)
    #[serde(default)]
    pub analysis: String,
    /// Number of collisions to simulate
    pub num_collisions: usize,
    /// Seed of the interaction generator
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Directory receiving the histogram file and the run summary
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Reference histogram file for reference-driven analyses
    #[serde(default)]
    pub reference_file: Option<PathBuf>,
    #[serde(default)]
    pub normalization: Normalization,
    /// Every `print_gap` collisions the produced secondaries are logged
    #[serde(default = "default_print_gap")]
    pub print_gap: usize,
}

/// Projectile and target, fixed for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Projectile species name, e.g. `proton`
    pub projectile: String,
    /// Projectile lab momentum along +z (GeV/c)
    pub momentum_gev: f64,
    /// Target material name, e.g. `G4_C`
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub physics_case: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Searched in order after the platform's default library path
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<PathBuf>,
    /// Load `lib<name>` even when a compiled-in analysis of that name exists
    #[serde(default)]
    pub prefer_plugins: bool,
}

fn default_seed() -> u64 {
    1234567
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_print_gap() -> usize {
    100
}

fn default_search_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(hadronic::plugin::DEFAULT_PLUGIN_DIR)]
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { physics_case: "FTFP_BERT".to_string() }
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self { search_dirs: default_search_dirs(), prefer_plugins: false }
    }
}

// ------------------------------------------------------------------------------------------------
// Error Types and Validation
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub trait ValidateConfig {
    fn validate(&self) -> Result<(), ConfigError>;
}

impl ValidateConfig for RunConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_collisions == 0 {
            return Err(ConfigError::ValidationError("Number of collisions must be positive".into()));
        }
        if self.print_gap == 0 {
            return Err(ConfigError::ValidationError("Print gap must be positive".into()));
        }
        Ok(())
    }
}

impl ValidateConfig for BeamConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.momentum_gev.is_finite() && self.momentum_gev > 0.0) {
            return Err(ConfigError::ValidationError("Beam momentum must be positive".into()));
        }
        if self.projectile.trim().is_empty() {
            return Err(ConfigError::ValidationError("Projectile must be named".into()));
        }
        if self.material.trim().is_empty() {
            return Err(ConfigError::ValidationError("Target material must be named".into()));
        }
        Ok(())
    }
}

impl ValidateConfig for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.physics_case.trim().is_empty() {
            return Err(ConfigError::ValidationError("Physics case must be named".into()));
        }
        Ok(())
    }
}

impl ValidateConfig for Config {
    fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        self.beam.validate()?;
        self.physics.validate()?;
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Configuration Implementation Methods
// ------------------------------------------------------------------------------------------------

impl Config {
    /// Reads and validates the TOML configuration at `path`.
    ///
    /// The analysis name is not checked here since it may still come from
    /// the command line.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// The analysis name, if one was given
    pub fn analysis_name(&self) -> Option<&str> {
        let name = self.run.analysis.trim();
        if name.is_empty() { None } else { Some(name) }
    }
}
