//! Reference-driven analysis.
//!
//! Histograms are shaped after the distributions of a reference file. Each
//! one carries its own selection in annotations: `Theta` holds the lab
//! polar-angle window (`"20-40 mrad"`) and `Particle` the species label.
//! Distributions without a usable `Theta` or `Particle` are still booked and
//! written, but never filled.

use std::path::PathBuf;

use crate::histogram::{deserialize_all, serialize_all, Histo1D, ANNOTATION_NAME};
use crate::kinematics::Observables;
use crate::types::constants::GEV;
use crate::types::ParticleKind;

use super::selection::{parse_theta_range, species_from_label};
use super::{AnalysisError, HadronicAnalysis, RunContext, ThetaRange};

pub const NAME: &str = "NA61_REFERENCE";

pub const ANNOTATION_THETA: &str = "Theta";
pub const ANNOTATION_PARTICLE: &str = "Particle";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Selection {
    pdg: i32,
    theta: ThetaRange,
}

#[derive(Debug)]
struct Booked {
    histogram: Histo1D,
    selection: Option<Selection>,
}

#[derive(Debug, Default)]
pub struct Na61Reference {
    /// Reference names to book; empty books every named distribution
    names: Vec<String>,
    ctx: Option<RunContext>,
    booked: Vec<Booked>,
}

impl Na61Reference {
    pub fn new(names: Vec<String>) -> Self {
        Self { names, ..Default::default() }
    }

    pub fn histograms(&self) -> impl Iterator<Item = &Histo1D> {
        self.booked.iter().map(|b| &b.histogram)
    }

    fn selection_of(histogram: &Histo1D) -> Result<Option<Selection>, AnalysisError> {
        let theta = match histogram.annotation(ANNOTATION_THETA).map(parse_theta_range) {
            Ok(Ok(theta)) => theta,
            Ok(Err(e)) => {
                tracing::debug!(path = histogram.path(), error = %e, "no angular selection, histogram stays empty");
                return Ok(None);
            }
            Err(_) => {
                tracing::debug!(path = histogram.path(), "no Theta annotation, histogram stays empty");
                return Ok(None);
            }
        };
        let label = match histogram.annotation(ANNOTATION_PARTICLE) {
            Ok(label) => label,
            Err(_) => {
                tracing::debug!(path = histogram.path(), "no Particle annotation, histogram stays empty");
                return Ok(None);
            }
        };
        let particle = species_from_label(label)?;
        Ok(Some(Selection { pdg: particle.pdg, theta }))
    }
}

impl HadronicAnalysis for Na61Reference {
    fn initialize(&mut self, ctx: &RunContext) -> Result<(), AnalysisError> {
        let reference: PathBuf = ctx
            .reference_file
            .clone()
            .ok_or_else(|| AnalysisError::MissingReference(NAME.to_string()))?;
        let objects = deserialize_all(&reference)?;

        let names: Vec<String> = if self.names.is_empty() {
            objects
                .iter()
                .filter_map(|o| o.annotation(ANNOTATION_NAME).ok().map(str::to_string))
                .collect()
        } else {
            self.names.clone()
        };

        let mut booked = Vec::with_capacity(names.len());
        for name in &names {
            let histogram = Histo1D::init_from_reference(&objects, name, &reference)?;
            let selection = Self::selection_of(&histogram)?;
            booked.push(Booked { histogram, selection });
        }
        tracing::info!(
            reference = %reference.display(),
            booked = booked.len(),
            selectable = booked.iter().filter(|b| b.selection.is_some()).count(),
            "booked reference histograms"
        );

        self.booked = booked;
        self.ctx = Some(ctx.clone());
        Ok(())
    }

    fn fill(&mut self, observables: &Observables, particle: &ParticleKind) {
        let target = self.booked.iter_mut().find(|b| match b.selection {
            Some(sel) => sel.pdg == particle.pdg && sel.theta.contains_rad(observables.theta_lab),
            None => false,
        });
        if let Some(booked) = target {
            booked.histogram.fill(observables.p_lab.norm() / GEV);
        }
    }

    fn finalize(&mut self) -> Result<(), AnalysisError> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| AnalysisError::Internal(format!("{} finalized before initialization", NAME)))?;
        for booked in self.booked.iter_mut() {
            if let Some(selection) = booked.selection {
                booked
                    .histogram
                    .normalize(ctx.normalization, ctx.num_collisions, selection.theta.width_rad());
            }
        }
        serialize_all(&ctx.output_file(NAME), self.booked.iter().map(|b| &b.histogram))?;
        Ok(())
    }

    fn name(&self) -> &str {
        NAME
    }
}
