use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod constants;
pub mod particles;

pub use particles::ParticleKind;

/// Cartesian three-vector (momentum or boost velocity)
pub type ThreeVector = Vector3<f64>;

/// An energy-momentum four-vector `(E, px, py, pz)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Total energy
    pub e: f64,
    /// Three-momentum
    pub p: ThreeVector,
}

impl FourMomentum {
    pub fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, p: ThreeVector::new(px, py, pz) }
    }

    /// Builds the four-momentum of an on-shell particle of mass `mass`
    pub fn from_mass_and_momentum(mass: f64, p: ThreeVector) -> Self {
        Self { e: (p.norm_squared() + mass * mass).sqrt(), p }
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn vect(&self) -> ThreeVector {
        self.p
    }

    pub fn pz(&self) -> f64 {
        self.p.z
    }

    /// Invariant mass squared `E^2 - |p|^2`
    pub fn m2(&self) -> f64 {
        self.e * self.e - self.p.norm_squared()
    }

    /// Invariant mass; negative `m2` (space-like) gives `-sqrt(-m2)`
    pub fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }

    /// Momentum component perpendicular to the beam (z) axis
    pub fn perp(&self) -> f64 {
        perp(&self.p)
    }

    /// Polar angle with respect to the beam (z) axis
    pub fn theta(&self) -> f64 {
        theta(&self.p)
    }

    /// Rapidity along the beam axis, `0.5 * ln((E + pz) / (E - pz))`
    pub fn rapidity(&self) -> f64 {
        0.5 * ((self.e + self.p.z) / (self.e - self.p.z)).ln()
    }

    /// Velocity of the frame in which this four-momentum is at rest
    pub fn beta(&self) -> ThreeVector {
        self.p / self.e
    }

    /// Lorentz boost by the velocity `beta` (|beta| < 1).
    ///
    /// Boosting by `-b` expresses a lab-frame vector in a frame moving with `b`.
    pub fn boost(&self, beta: &ThreeVector) -> Self {
        let b2 = beta.norm_squared();
        if b2 == 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = beta.dot(&self.p);
        let gamma2 = (gamma - 1.0) / b2;
        Self {
            e: gamma * (self.e + bp),
            p: self.p + beta * (gamma2 * bp + gamma * self.e),
        }
    }
}

impl std::ops::Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, other: FourMomentum) -> FourMomentum {
        FourMomentum { e: self.e + other.e, p: self.p + other.p }
    }
}

impl fmt::Display for FourMomentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4},{:.4},{:.4};{:.4})", self.p.x, self.p.y, self.p.z, self.e)
    }
}

/// Transverse component of a three-vector with respect to the beam axis
pub fn perp(p: &ThreeVector) -> f64 {
    p.x.hypot(p.y)
}

/// Polar angle of a three-vector with respect to the beam axis
pub fn theta(p: &ThreeVector) -> f64 {
    if p.x == 0.0 && p.y == 0.0 && p.z == 0.0 {
        0.0
    } else {
        perp(p).atan2(p.z)
    }
}

/// A target material: NIST-style name and mass number of its dominant isotope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub mass_number: u32,
}

const MATERIALS: [(&str, u32); 6] = [
    ("G4_H", 1),
    ("G4_C", 12),
    ("G4_Al", 27),
    ("G4_Fe", 56),
    ("G4_Cu", 63),
    ("G4_Pb", 208),
];

impl Material {
    /// Looks up one of the supported target materials by name
    pub fn find(name: &str) -> Option<Material> {
        MATERIALS
            .iter()
            .find(|(material, _)| *material == name)
            .map(|(material, mass_number)| Material {
                name: material.to_string(),
                mass_number: *mass_number,
            })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One outgoing particle of a collision
#[derive(Debug, Clone, PartialEq)]
pub struct Secondary {
    pub kind: ParticleKind,
    /// Lab-frame four-momentum
    pub p4: FourMomentum,
}
