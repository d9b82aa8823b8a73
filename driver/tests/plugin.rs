use hadronic::analysis::na61_2024;
use hadronic::histogram::deserialize_all;
use hadronic::plugin::PluginLoader;
use hadronic::types::constants::NUCLEON_MASS;
use hadronic::types::particles::{PI_MINUS, PROTON};
use hadronic::types::{FourMomentum, ThreeVector};
use hadronic::{CollisionKinematics, Normalization, RunContext};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Directories cargo places `libNA61_2024` in for this build profile
fn build_dirs() -> Vec<PathBuf> {
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap().to_path_buf();
    let profile = deps.parent().unwrap().to_path_buf();
    vec![deps, profile]
}

#[test]
fn test_plugin_runs_full_lifecycle_and_unloads() {
    let dir = tempdir().unwrap();
    let log_file = dir.path().join("run.log");
    // Only the plugin's copy of the logger reads these
    std::env::set_var("HADRONIC_LOGGING", "true");
    std::env::set_var("HADRONIC_LOG_TO_FILE", "true");
    std::env::set_var("HADRONIC_LOG_FILE", &log_file);

    let mut analysis = PluginLoader::new(build_dirs()).load(na61_2024::NAME).unwrap();
    assert!(analysis.is_plugin());
    assert_eq!(analysis.name(), "NA61_2024");

    let ctx = RunContext::new(1, dir.path()).with_normalization(Normalization::Raw);
    analysis.initialize(&ctx).unwrap();

    let kinematics = CollisionKinematics::fixed_target(PROTON.mass, 31.0, NUCLEON_MASS);
    let (theta, p): (f64, f64) = (0.2, 1.5);
    let momentum = ThreeVector::new(p * theta.sin(), 0.0, p * theta.cos());
    let p4 = FourMomentum::from_mass_and_momentum(PI_MINUS.mass, momentum);
    analysis.fill(&kinematics.observe(&p4, PI_MINUS.mass), &PI_MINUS).unwrap();

    analysis.finalize().unwrap();
    analysis.unload().unwrap();

    let histograms = deserialize_all(&ctx.output_file(na61_2024::NAME)).unwrap();
    assert_eq!(histograms.len(), 1);
    assert_eq!(histograms[0].entries(), 1);
    assert_eq!(histograms[0].counts()[histograms[0].bin_index(1.5).unwrap()], 1.0);

    let text = fs::read_to_string(&log_file).unwrap();
    assert_eq!(text.lines().filter(|line| line.contains("count =")).count(), 28);
}
