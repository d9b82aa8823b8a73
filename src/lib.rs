pub mod types;
pub mod kinematics;
pub mod histogram;
pub mod analysis;
pub mod plugin;
pub mod generator;
pub mod utils;

pub use analysis::{HadronicAnalysis, RunContext};
pub use generator::{InteractionGenerator, ToyGenerator};
pub use histogram::{Histo1D, Normalization};
pub use kinematics::{compute_observables, CollisionKinematics, Observables};
pub use plugin::{AnalysisHandle, AnalysisRegistry, PluginLoader};
