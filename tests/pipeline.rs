use hadronic::analysis::{na61_2024, Na61Pim2024};
use hadronic::histogram::deserialize_all;
use hadronic::plugin::AnalysisBox;
use hadronic::types::constants::NUCLEON_MASS;
use hadronic::types::particles::{PI_MINUS, PROTON};
use hadronic::types::{FourMomentum, ThreeVector};
use hadronic::utils::logging;
use hadronic::{AnalysisHandle, AnalysisRegistry, CollisionKinematics, Normalization, RunContext};
use tempfile::tempdir;

hadronic::export_analysis!(Na61Pim2024::default());

#[test]
fn test_exported_factory_hands_over_an_analysis() {
    let raw = create_analysis();
    assert!(!raw.is_null());
    let instance: AnalysisBox = *unsafe { Box::from_raw(raw) };
    assert_eq!(instance.name(), na61_2024::NAME);

    let handle = AnalysisHandle::builtin(instance);
    assert_eq!(handle.name(), "NA61_2024");
    handle.unload().unwrap();
}

#[test]
fn test_pions_from_a_fixed_target_beam_end_up_in_the_histogram() {
    logging::init_logging();
    let dir = tempdir().unwrap();
    let kinematics = CollisionKinematics::fixed_target(PROTON.mass, 31.0, NUCLEON_MASS);
    assert!((kinematics.sqrt_s - 7.74).abs() < 0.01);

    let mut analysis = AnalysisRegistry::default().resolve(na61_2024::NAME).unwrap();
    let ctx = RunContext::new(2, dir.path()).with_normalization(Normalization::Raw);
    analysis.initialize(&ctx).unwrap();

    // Two pi- at 200 mrad with 1.5 and 3.3 GeV/c, one outside the window
    for (theta, p) in [(0.2, 1.5), (0.2, 3.3), (0.3, 1.5)] {
        let momentum = ThreeVector::new(p * f64::sin(theta), 0.0, p * f64::cos(theta));
        let p4 = FourMomentum::from_mass_and_momentum(PI_MINUS.mass, momentum);
        let observables = kinematics.observe(&p4, PI_MINUS.mass);
        assert!(observables.y_cms < p4.rapidity());
        analysis.fill(&observables, &PI_MINUS).unwrap();
    }
    analysis.finalize().unwrap();
    analysis.unload().unwrap();

    let histograms = deserialize_all(&ctx.output_file(na61_2024::NAME)).unwrap();
    let histogram = &histograms[0];
    assert_eq!(histogram.integral(), 2.0);
    assert_eq!(histogram.counts()[histogram.bin_index(1.5).unwrap()], 1.0);
    assert_eq!(histogram.counts()[histogram.bin_index(3.3).unwrap()], 1.0);
}
