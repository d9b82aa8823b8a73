//! Units and fixed physical constants.
//!
//! Energies and momenta are carried in GeV (momenta in GeV/c), angles in radians.

/// One GeV in the internal energy unit
pub const GEV: f64 = 1.0;

/// One milliradian in radians
pub const MILLIRADIAN: f64 = 1.0e-3;

/// Mass of the target nucleon used for fixed-target kinematics (proton mass)
pub const NUCLEON_MASS: f64 = 0.938_272_088 * GEV;
