//! Particle species known to the pipeline.
//!
//! This is a small literal table, not a particle database: it covers the
//! species the built-in analyses select on and the ones the toy generator
//! produces.

use serde::{Serialize, Serializer};
use std::fmt;

/// A particle species: name, PDG code and rest mass (GeV)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleKind {
    /// Human readable name, e.g. `pi-`
    pub name: &'static str,
    /// PDG Monte Carlo particle code
    pub pdg: i32,
    /// Rest mass in GeV
    pub mass: f64,
}

pub const PI_PLUS: ParticleKind = ParticleKind { name: "pi+", pdg: 211, mass: 0.139_570_39 };
pub const PI_MINUS: ParticleKind = ParticleKind { name: "pi-", pdg: -211, mass: 0.139_570_39 };
pub const PI_ZERO: ParticleKind = ParticleKind { name: "pi0", pdg: 111, mass: 0.134_976_8 };
pub const KAON_PLUS: ParticleKind = ParticleKind { name: "kaon+", pdg: 321, mass: 0.493_677 };
pub const KAON_MINUS: ParticleKind = ParticleKind { name: "kaon-", pdg: -321, mass: 0.493_677 };
pub const KAON_ZERO_LONG: ParticleKind = ParticleKind { name: "kaon0L", pdg: 130, mass: 0.497_611 };
pub const PROTON: ParticleKind = ParticleKind { name: "proton", pdg: 2212, mass: 0.938_272_088 };
pub const ANTI_PROTON: ParticleKind = ParticleKind { name: "anti_proton", pdg: -2212, mass: 0.938_272_088 };
pub const NEUTRON: ParticleKind = ParticleKind { name: "neutron", pdg: 2112, mass: 0.939_565_42 };
pub const GAMMA: ParticleKind = ParticleKind { name: "gamma", pdg: 22, mass: 0.0 };

/// Every species in the table
pub const ALL_PARTICLES: [ParticleKind; 10] = [
    PI_PLUS,
    PI_MINUS,
    PI_ZERO,
    KAON_PLUS,
    KAON_MINUS,
    KAON_ZERO_LONG,
    PROTON,
    ANTI_PROTON,
    NEUTRON,
    GAMMA,
];

/// Legacy spellings found in reference files, mapped to canonical names
const ALIASES: [(&str, &str); 3] = [
    ("kaon_", "kaon+"),
    ("p", "proton"),
    ("pbar", "anti_proton"),
];

/// Looks up a species by name, accepting the legacy aliases.
pub fn find_by_name(name: &str) -> Option<ParticleKind> {
    let name = name.trim();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name);
    ALL_PARTICLES.iter().copied().find(|p| p.name == canonical)
}

/// Looks up a species by PDG code.
pub fn find_by_pdg(pdg: i32) -> Option<ParticleKind> {
    ALL_PARTICLES.iter().copied().find(|p| p.pdg == pdg)
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for ParticleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_alias() {
        assert_eq!(find_by_name("pi-").map(|p| p.pdg), Some(-211));
        assert_eq!(find_by_name(" proton ").map(|p| p.pdg), Some(2212));
        assert_eq!(find_by_name("kaon_").map(|p| p.pdg), Some(321));
        assert_eq!(find_by_name("kaon-").map(|p| p.pdg), Some(-321));
        assert!(find_by_name("muon").is_none());
    }

    #[test]
    fn test_lookup_by_pdg() {
        assert_eq!(find_by_pdg(211), Some(PI_PLUS));
        assert!(find_by_pdg(13).is_none());
    }
}
