//! The analysis module contract.
//!
//! An analysis goes through `initialize` once, `fill` once per secondary
//! particle, then `finalize` once, which normalizes and writes its histograms.
//! The order is enforced by [`crate::plugin::AnalysisHandle`] through
//! [`LifecycleState`], so implementations only describe what each step does.

use std::path::PathBuf;
use thiserror::Error;

use crate::histogram::{HistogramError, Normalization};
use crate::kinematics::Observables;
use crate::types::ParticleKind;

pub mod lifecycle;
pub mod na61_2024;
pub mod na61_reference;
pub mod selection;


pub use lifecycle::{LifecycleState, LifecycleStep};
pub use na61_2024::Na61Pim2024;
pub use na61_reference::Na61Reference;
pub use selection::{SelectionError, ThetaRange};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot {step} an analysis that is {state}")]
    InvalidTransition { state: LifecycleState, step: LifecycleStep },
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Analysis {0} needs a reference file, none configured")]
    MissingReference(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Run-wide inputs an analysis receives at initialization
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// Number of collisions the driver is going to simulate
    pub num_collisions: usize,
    /// Directory the histogram file is written to
    pub output_dir: PathBuf,
    /// Reference histogram file, for analyses that shape themselves after one
    pub reference_file: Option<PathBuf>,
    pub normalization: Normalization,
}

impl RunContext {
    pub fn new(num_collisions: usize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            num_collisions,
            output_dir: output_dir.into(),
            reference_file: None,
            normalization: Normalization::default(),
        }
    }

    pub fn with_reference_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_file = Some(path.into());
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Path of the histogram file written by the analysis `name`
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", name))
    }
}

pub trait HadronicAnalysis {
    /// Allocates the histograms, possibly reading the reference file.
    fn initialize(&mut self, ctx: &RunContext) -> Result<(), AnalysisError>;

    /// Routes one secondary particle into at most one histogram.
    fn fill(&mut self, observables: &Observables, particle: &ParticleKind);

    /// Normalizes and writes all histograms.
    fn finalize(&mut self) -> Result<(), AnalysisError>;

    /// Name the analysis is registered and loaded under
    fn name(&self) -> &str;
}
