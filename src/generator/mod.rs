//! Interaction generators.
//!
//! The event loop only sees [`InteractionGenerator`]: given a projectile, its
//! lab momentum and a target material it returns the outgoing particles of one
//! inelastic collision, or `None` when no interaction took place.
//! [`ToyGenerator`] is a seeded stand-in with a plausible multiplicity,
//! species mix and momentum spectrum. It does no physics.

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Exp, Poisson};
use std::f64::consts::PI;
use thiserror::Error;

use crate::types::particles::{
    GAMMA, KAON_MINUS, KAON_PLUS, KAON_ZERO_LONG, NEUTRON, PI_MINUS, PI_PLUS, PI_ZERO, PROTON,
};
use crate::types::{FourMomentum, Material, ParticleKind, Secondary, ThreeVector};
use crate::utils::logging;

// ------------------------------------------------------------------------------------------------
// Interface
// ------------------------------------------------------------------------------------------------

pub trait InteractionGenerator {
    /// Whether the configured physics case can be simulated
    fn is_physics_case_supported(&self) -> bool;

    /// Secondaries of one collision of `projectile` with lab momentum
    /// `momentum` (GeV/c, along +z) on `material`.
    fn generate_interaction(
        &mut self,
        projectile: &ParticleKind,
        momentum: f64,
        material: &Material,
    ) -> Option<Vec<Secondary>>;
}

/// Physics cases the toy generator accepts
pub const SUPPORTED_PHYSICS_CASES: [&str; 3] = ["FTFP_BERT", "QGSP_BERT", "QGSP_BIC"];

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid generator parameter: {0}")]
    InvalidParameter(String),
}

// ------------------------------------------------------------------------------------------------
// Toy generator
// ------------------------------------------------------------------------------------------------

/// Probability that a collision produces no interaction at all
const NO_INTERACTION_PROBABILITY: f64 = 0.05;
/// Mean transverse momentum of produced particles (GeV/c)
const MEAN_PT: f64 = 0.35;

/// Relative production weights of the toy species mix
const SPECIES_WEIGHTS: [(ParticleKind, f64); 9] = [
    (PI_PLUS, 0.28),
    (PI_MINUS, 0.28),
    (PI_ZERO, 0.18),
    (PROTON, 0.10),
    (NEUTRON, 0.08),
    (KAON_PLUS, 0.03),
    (KAON_MINUS, 0.02),
    (KAON_ZERO_LONG, 0.02),
    (GAMMA, 0.01),
];

pub struct ToyGenerator {
    physics_case: String,
    rng: StdRng,
    species: WeightedIndex<f64>,
    pt: Exp<f64>,
    phi: Uniform<f64>,
    longitudinal: Beta<f64>,
}

impl ToyGenerator {
    /// Creates a generator for `physics_case`, reproducible for a given `seed`.
    pub fn new(physics_case: &str, seed: u64) -> Result<Self, GeneratorError> {
        let species = WeightedIndex::new(SPECIES_WEIGHTS.iter().map(|(_, w)| *w)).map_err(invalid)?;
        let pt = Exp::new(1.0 / MEAN_PT).map_err(invalid)?;
        let longitudinal = Beta::new(1.2, 3.0).map_err(invalid)?;
        logging::log("GENERATOR", &format!(
            "Creating toy generator for physics case {} with seed {}",
            physics_case, seed
        ));
        Ok(Self {
            physics_case: physics_case.to_string(),
            rng: StdRng::seed_from_u64(seed),
            species,
            pt,
            phi: Uniform::new(0.0, 2.0 * PI),
            longitudinal,
        })
    }

    pub fn physics_case(&self) -> &str {
        &self.physics_case
    }

    /// Mean number of secondaries, growing with beam momentum and target size
    fn mean_multiplicity(momentum: f64, material: &Material) -> f64 {
        let a = material.mass_number.max(1) as f64;
        (1.0 + 1.6 * (1.0 + momentum.max(0.0)).ln()) * a.powf(0.15)
    }

    fn sample_secondary(&mut self, momentum: f64) -> Secondary {
        let kind = SPECIES_WEIGHTS[self.species.sample(&mut self.rng)].0;
        let pt = self.pt.sample(&mut self.rng);
        let phi = self.phi.sample(&mut self.rng);
        let pz = self.longitudinal.sample(&mut self.rng) * momentum;
        let p = ThreeVector::new(pt * phi.cos(), pt * phi.sin(), pz);
        Secondary { kind, p4: FourMomentum::from_mass_and_momentum(kind.mass, p) }
    }
}

fn invalid(e: impl std::fmt::Display) -> GeneratorError {
    GeneratorError::InvalidParameter(e.to_string())
}

impl InteractionGenerator for ToyGenerator {
    fn is_physics_case_supported(&self) -> bool {
        SUPPORTED_PHYSICS_CASES.contains(&self.physics_case.as_str())
    }

    fn generate_interaction(
        &mut self,
        _projectile: &ParticleKind,
        momentum: f64,
        material: &Material,
    ) -> Option<Vec<Secondary>> {
        if self.rng.gen_bool(NO_INTERACTION_PROBABILITY) {
            return None;
        }
        let mean = Self::mean_multiplicity(momentum, material);
        let multiplicity = match Poisson::new(mean) {
            Ok(poisson) => poisson.sample(&mut self.rng) as usize,
            Err(_) => 0,
        };
        Some((0..multiplicity).map(|_| self.sample_secondary(momentum)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::particles::PROTON;

    fn iron() -> Material {
        Material::find("G4_Fe").unwrap()
    }

    #[test]
    fn test_physics_case_support() {
        assert!(ToyGenerator::new("FTFP_BERT", 1).unwrap().is_physics_case_supported());
        assert!(!ToyGenerator::new("NO_SUCH_LIST", 1).unwrap().is_physics_case_supported());
    }

    #[test]
    fn test_same_seed_same_interactions() {
        let mut a = ToyGenerator::new("FTFP_BERT", 42).unwrap();
        let mut b = ToyGenerator::new("FTFP_BERT", 42).unwrap();
        for _ in 0..50 {
            assert_eq!(
                a.generate_interaction(&PROTON, 31.0, &iron()),
                b.generate_interaction(&PROTON, 31.0, &iron())
            );
        }
    }

    #[test]
    fn test_secondaries_are_on_shell_and_forward() {
        let mut generator = ToyGenerator::new("QGSP_BERT", 7).unwrap();
        let mut produced = 0;
        let mut empty = 0;
        for _ in 0..200 {
            match generator.generate_interaction(&PROTON, 31.0, &iron()) {
                Some(secondaries) => {
                    for s in secondaries {
                        assert!((s.p4.m() - s.kind.mass).abs() < 1e-5);
                        assert!(s.p4.pz() >= 0.0 && s.p4.pz() <= 31.0);
                        produced += 1;
                    }
                }
                None => empty += 1,
            }
        }
        assert!(produced > 200);
        assert!(empty < 40);
    }
}
