//! Event loop driver: runs one analysis over a series of simulated collisions.

pub mod config;
pub mod error;
pub mod run_collisions;
pub mod run_summary;
pub mod stats;

pub use config::{Config, ConfigError, ValidateConfig};
pub use error::DriverError;
pub use run_collisions::{run_collisions, CollisionSetup};
pub use run_summary::RunSummary;
pub use stats::RunStats;

use hadronic::analysis::RunContext;
use hadronic::generator::InteractionGenerator;
use hadronic::kinematics::CollisionKinematics;
use hadronic::plugin::{AnalysisRegistry, PluginLoader};
use hadronic::types::constants::NUCLEON_MASS;
use hadronic::types::{particles, Material};
use hadronic::utils::logging;

/// Registry resolving analyses with the plugin settings of `config`
pub fn registry_for(config: &Config) -> AnalysisRegistry {
    AnalysisRegistry::new(PluginLoader::new(config.plugins.search_dirs.clone()))
        .prefer_plugins(config.plugins.prefer_plugins)
}

/// Runs the configured analysis: initialize, event loop, finalize, unload.
///
/// Nothing is written when the run fails before the event loop starts.
pub fn run_analysis(
    config: &Config,
    generator: &mut dyn InteractionGenerator,
    registry: &AnalysisRegistry,
    show_progress: bool,
) -> Result<RunSummary, DriverError> {
    let name = config.analysis_name().ok_or(DriverError::NoAnalysisName)?;

    if !generator.is_physics_case_supported() {
        return Err(DriverError::PhysicsCaseUnsupported(config.physics.physics_case.clone()));
    }
    let projectile = particles::find_by_name(&config.beam.projectile)
        .ok_or_else(|| DriverError::ProjectileNotFound(config.beam.projectile.clone()))?;
    let material = Material::find(&config.beam.material)
        .ok_or_else(|| DriverError::MaterialNotFound(config.beam.material.clone()))?;
    let kinematics = CollisionKinematics::fixed_target(projectile.mass, config.beam.momentum_gev, NUCLEON_MASS);

    log_configuration(config, name, &kinematics);

    let mut analysis = registry.resolve(name)?;
    let mut ctx = RunContext::new(config.run.num_collisions, &config.run.output_dir)
        .with_normalization(config.run.normalization);
    if let Some(reference) = &config.run.reference_file {
        ctx = ctx.with_reference_file(reference);
    }
    analysis.initialize(&ctx)?;

    let setup = CollisionSetup {
        projectile,
        momentum: config.beam.momentum_gev,
        material,
        kinematics,
        num_collisions: config.run.num_collisions,
        print_gap: config.run.print_gap,
    };
    let stats = run_collisions(&setup, generator, &mut analysis, show_progress)?;
    analysis.finalize()?;
    stats.print_final_stats();

    let analysis_name = analysis.name().to_string();
    let plugin = analysis.is_plugin();
    analysis.unload()?;

    let summary = RunSummary::new(
        &analysis_name,
        plugin,
        ctx.output_file(&analysis_name),
        kinematics,
        stats,
        config,
    );
    summary.save(&config.run.output_dir)?;
    Ok(summary)
}

fn log_configuration(config: &Config, name: &str, kinematics: &CollisionKinematics) {
    logging::log("DRIVER", "=================  Configuration ==================");
    logging::log("DRIVER", &format!("Analysis: {}", name));
    logging::log("DRIVER", &format!("Model: {}", config.physics.physics_case));
    logging::log("DRIVER", &format!(
        "Projectile: {} at {} GeV/c on {}",
        config.beam.projectile, config.beam.momentum_gev, config.beam.material
    ));
    logging::log("DRIVER", &format!("Number of collisions: {}", config.run.num_collisions));
    logging::log("DRIVER", &format!(
        "sqrt(s) = {:.4} GeV, beta_cms = {:.6}",
        kinematics.sqrt_s,
        kinematics.boost_to_cms.z
    ));
    logging::log("DRIVER", &format!("Seed: {}", config.run.seed));
    logging::log("DRIVER", "===================================================");
}
