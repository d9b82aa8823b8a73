use chrono::Local;
use hadronic::kinematics::CollisionKinematics;
use hadronic::utils::logging;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::DriverError;
use crate::stats::RunStats;

pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// What was run and what came out of it, saved next to the histogram file
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    /// Name reported by the analysis instance
    pub analysis: String,
    /// Whether the analysis came from a plugin library
    pub plugin: bool,
    pub histogram_file: PathBuf,
    pub kinematics: CollisionKinematics,
    pub stats: RunStats,
    pub config: Config,
}

impl RunSummary {
    pub fn new(
        analysis: &str,
        plugin: bool,
        histogram_file: PathBuf,
        kinematics: CollisionKinematics,
        stats: RunStats,
        config: &Config,
    ) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            analysis: analysis.to_string(),
            plugin,
            histogram_file,
            kinematics,
            stats,
            config: config.clone(),
        }
    }

    /// Writes the summary as `run_summary.json` in `dir` and returns its path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, DriverError> {
        let path = dir.join(RUN_SUMMARY_FILE);
        let summary_error = |message: String| DriverError::Summary { path: path.clone(), message };

        fs::create_dir_all(dir).map_err(|e| summary_error(e.to_string()))?;
        let text = serde_json::to_string_pretty(self).map_err(|e| summary_error(e.to_string()))?;
        fs::write(&path, text).map_err(|e| summary_error(e.to_string()))?;
        logging::log("DRIVER", &format!("Saved run summary to {}", path.display()));
        Ok(path)
    }
}
