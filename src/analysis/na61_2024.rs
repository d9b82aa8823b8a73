//! NA61/SHINE π⁻ production in the 180–240 mrad lab polar-angle window,
//! binned in lab momentum.

use crate::histogram::{serialize_all, Histo1D};
use crate::kinematics::Observables;
use crate::types::constants::GEV;
use crate::types::particles::PI_MINUS;
use crate::types::ParticleKind;
use crate::utils::logging::log;

use super::{AnalysisError, HadronicAnalysis, RunContext, ThetaRange};

pub const NAME: &str = "NA61_2024";

/// Lab momentum grid (GeV/c): 0.1 steps up to 1, then 0.2 steps up to 5
pub const MOMENTUM_EDGES: [f64; 29] = [
    0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.2, 1.4, 1.6, 1.8, 2.0, 2.2, 2.4, 2.6, 2.8,
    3.0, 3.2, 3.4, 3.6, 3.8, 4.0, 4.2, 4.4, 4.6, 4.8, 5.0,
];

pub const THETA_WINDOW: ThetaRange = ThetaRange { min_mrad: 180.0, max_mrad: 240.0 };

#[derive(Debug, Default)]
pub struct Na61Pim2024 {
    ctx: Option<RunContext>,
    histogram: Option<Histo1D>,
}

impl Na61Pim2024 {
    /// The momentum histogram, once initialized
    pub fn histogram(&self) -> Option<&Histo1D> {
        self.histogram.as_ref()
    }

    fn print_table(&self, raw: &Histo1D, normalized: &Histo1D) {
        log(NAME, &format!(
            "=== {} {} histogram in {}-{} mrad ===",
            NAME, PI_MINUS, THETA_WINDOW.min_mrad, THETA_WINDOW.max_mrad
        ));
        for i in 0..raw.num_bins() {
            log(NAME, &format!(
                "{:.2} - {:.2} GeV/c : count = {:>5}, d2n/dpdtheta = {:.4} (rad GeV/c)^-1",
                raw.edges()[i],
                raw.edges()[i + 1],
                raw.counts()[i],
                normalized.counts()[i]
            ));
        }
    }
}

impl HadronicAnalysis for Na61Pim2024 {
    fn initialize(&mut self, ctx: &RunContext) -> Result<(), AnalysisError> {
        let mut histogram = Histo1D::new(MOMENTUM_EDGES.to_vec())?.with_path(&format!("/{}/p_pim_180_240", NAME));
        histogram.set_title("pi- lab momentum, 180-240 mrad");
        histogram.annotate("Theta", "180-240 mrad");
        histogram.annotate("Particle", PI_MINUS.name);
        self.histogram = Some(histogram);
        self.ctx = Some(ctx.clone());
        Ok(())
    }

    fn fill(&mut self, observables: &Observables, particle: &ParticleKind) {
        if particle.pdg != PI_MINUS.pdg || !THETA_WINDOW.contains_rad(observables.theta_lab) {
            return;
        }
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.fill(observables.p_lab.norm() / GEV);
        }
    }

    fn finalize(&mut self) -> Result<(), AnalysisError> {
        let (ctx, raw) = match (self.ctx.as_ref(), self.histogram.as_ref()) {
            (Some(ctx), Some(histogram)) => (ctx, histogram),
            _ => return Err(AnalysisError::Internal(format!("{} finalized without histogram", NAME))),
        };
        let mut normalized = raw.clone();
        normalized.normalize(ctx.normalization, ctx.num_collisions, THETA_WINDOW.width_rad());
        self.print_table(raw, &normalized);

        serialize_all(&ctx.output_file(NAME), [&normalized])?;
        self.histogram = Some(normalized);
        Ok(())
    }

    fn name(&self) -> &str {
        NAME
    }
}
