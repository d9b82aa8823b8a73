//! Selection criteria read from histogram annotations.
//!
//! Reference files describe the phase-space cell of each distribution in
//! human-readable annotations, e.g. `Theta = "20-40 mrad"` and
//! `Particle = "pi-"`.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::types::constants::MILLIRADIAN;
use crate::types::particles::{self, ParticleKind};

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("Unknown selection key '{0}'")]
    UnknownSelectionKey(String),
    #[error("Cannot parse angular range from '{0}'")]
    UnparsableRange(String),
}

lazy_static! {
    // "<lo> <sep> <hi> mrad" where <sep> is any mix of blanks and dashes:
    // "20-40 mrad", "0 - 20 mrad", "100 140mrad", "20.5-40 mrad"
    pub static ref THETA_RANGE_PATTERN: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)[\s\-]+(\d+(?:\.\d+)?)\s*mrad").unwrap();
}

/// A polar-angle window `[min, max)` in milliradians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThetaRange {
    pub min_mrad: f64,
    pub max_mrad: f64,
}

impl ThetaRange {
    pub fn new(min_mrad: f64, max_mrad: f64) -> Self {
        Self { min_mrad, max_mrad }
    }

    /// Whether `theta` (rad) falls in the half-open window
    pub fn contains_rad(&self, theta: f64) -> bool {
        let theta_mrad = theta / MILLIRADIAN;
        theta_mrad >= self.min_mrad && theta_mrad < self.max_mrad
    }

    /// Window width in rad
    pub fn width_rad(&self) -> f64 {
        (self.max_mrad - self.min_mrad) * MILLIRADIAN
    }
}

/// Parses an angular range such as `"20-40 mrad"`.
pub fn parse_theta_range(text: &str) -> Result<ThetaRange, SelectionError> {
    let unparsable = || SelectionError::UnparsableRange(text.to_string());
    let captures = THETA_RANGE_PATTERN.captures(text).ok_or_else(unparsable)?;
    let min_mrad: f64 = captures[1].parse().map_err(|_| unparsable())?;
    let max_mrad: f64 = captures[2].parse().map_err(|_| unparsable())?;
    if min_mrad >= max_mrad {
        return Err(unparsable());
    }
    Ok(ThetaRange::new(min_mrad, max_mrad))
}

/// Maps a species label from a reference file to its particle.
pub fn species_from_label(label: &str) -> Result<ParticleKind, SelectionError> {
    particles::find_by_name(label).ok_or_else(|| SelectionError::UnknownSelectionKey(label.to_string()))
}

/// PDG code of a species label
pub fn pdg_from_label(label: &str) -> Result<i32, SelectionError> {
    species_from_label(label).map(|p| p.pdg)
}
