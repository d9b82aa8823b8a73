use hadronic::analysis::AnalysisError;
use hadronic::generator::GeneratorError;
use hadronic::plugin::PluginError;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Any error that aborts a run. Each kind maps to a process exit code.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("No analysis name given (set run.analysis or pass --analysis)")]
    NoAnalysisName,
    #[error("Physics case '{0}' is not supported")]
    PhysicsCaseUnsupported(String),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("Material '{0}' not found")]
    MaterialNotFound(String),
    #[error("Projectile '{0}' not found")]
    ProjectileNotFound(String),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Failed to write run summary {path}: {message}")]
    Summary { path: PathBuf, message: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DriverError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::NoAnalysisName => 1,
            DriverError::PhysicsCaseUnsupported(_) | DriverError::Generator(_) => 2,
            DriverError::MaterialNotFound(_) | DriverError::ProjectileNotFound(_) => 3,
            DriverError::Plugin(_) => 4,
            DriverError::Analysis(_) | DriverError::Summary { .. } => 5,
            DriverError::Config(_) => 6,
        }
    }
}
