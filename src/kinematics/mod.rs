//! Lab-frame and center-of-mass-frame observables of secondary particles.
//!
//! The collision center-of-mass (CMS) frame is fixed for a run, so the boost
//! vector and `sqrt(s)` are computed once in [`CollisionKinematics`] and then
//! applied to every secondary by [`compute_observables`].

use serde::Serialize;

use crate::types::{perp, theta, FourMomentum, ThreeVector};


/// Kinematic observables of one secondary particle in the lab and CMS frames.
///
/// Built per secondary, handed to exactly one analysis call, then dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub p4_lab: FourMomentum,
    pub p_lab: ThreeVector,
    pub e_lab: f64,
    /// Kinetic energy `E - m`
    pub t_lab: f64,
    pub pt_lab: f64,
    /// Polar angle from the beam axis (rad)
    pub theta_lab: f64,

    pub p4_cms: FourMomentum,
    pub p_cms: ThreeVector,
    pub e_cms: f64,
    pub t_cms: f64,
    pub pt_cms: f64,
    pub theta_cms: f64,
    pub y_cms: f64,
    /// Feynman-x, `2 pz_cms / sqrt(s)`
    pub x_f: f64,
}

/// Computes lab and CMS observables for one particle.
///
/// `rest_mass` only enters the kinetic energies. The CMS four-momentum is the
/// lab one boosted by `-boost_to_cms`. `sqrt_s` must be positive, otherwise
/// `x_f` is not finite.
pub fn compute_observables(
    p4_lab: &FourMomentum,
    rest_mass: f64,
    boost_to_cms: &ThreeVector,
    sqrt_s: f64,
) -> Observables {
    let p_lab = p4_lab.vect();
    let e_lab = p4_lab.e();

    let p4_cms = p4_lab.boost(&(-*boost_to_cms));
    let p_cms = p4_cms.vect();
    let e_cms = p4_cms.e();

    Observables {
        p4_lab: *p4_lab,
        p_lab,
        e_lab,
        t_lab: e_lab - rest_mass,
        pt_lab: perp(&p_lab),
        theta_lab: theta(&p_lab),

        p4_cms,
        p_cms,
        e_cms,
        t_cms: e_cms - rest_mass,
        pt_cms: perp(&p_cms),
        theta_cms: theta(&p_cms),
        y_cms: p4_cms.rapidity(),
        x_f: 2.0 * p4_cms.pz() / sqrt_s,
    }
}

/// Run-wide collision kinematics: CMS velocity seen from the lab and `sqrt(s)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionKinematics {
    pub boost_to_cms: ThreeVector,
    pub sqrt_s: f64,
}

impl CollisionKinematics {
    pub fn new(boost_to_cms: ThreeVector, sqrt_s: f64) -> Self {
        Self { boost_to_cms, sqrt_s }
    }

    /// Projectile of mass `projectile_mass` moving along +z with momentum
    /// `beam_momentum` onto a target of mass `target_mass` at rest.
    pub fn fixed_target(projectile_mass: f64, beam_momentum: f64, target_mass: f64) -> Self {
        let projectile = FourMomentum::from_mass_and_momentum(
            projectile_mass,
            ThreeVector::new(0.0, 0.0, beam_momentum),
        );
        let target = FourMomentum::new(target_mass, 0.0, 0.0, 0.0);
        let total = projectile + target;
        Self {
            boost_to_cms: total.beta(),
            sqrt_s: total.m(),
        }
    }

    /// Observables of a particle of mass `rest_mass` with lab four-momentum `p4_lab`
    pub fn observe(&self, p4_lab: &FourMomentum, rest_mass: f64) -> Observables {
        compute_observables(p4_lab, rest_mass, &self.boost_to_cms, self.sqrt_s)
    }
}
