use crate::histogram::{Histo1D, HistogramError, Normalization};
use proptest::prelude::*;

/// The NA61 lab-momentum grid: 0.1 GeV/c steps up to 1 GeV/c, then 0.2 GeV/c steps to 5 GeV/c
fn na61_edges() -> Vec<f64> {
    vec![
        0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.2, 1.4, 1.6, 1.8, 2.0, 2.2, 2.4, 2.6, 2.8,
        3.0, 3.2, 3.4, 3.6, 3.8, 4.0, 4.2, 4.4, 4.6, 4.8, 5.0,
    ]
}

#[test]
fn test_na61_grid_bin_lookup() {
    let mut histo = Histo1D::new(na61_edges()).expect("valid edges");
    assert_eq!(histo.num_bins(), 28);

    assert_eq!(histo.fill(0.25), Some(0));
    // An internal edge belongs to the bin it starts
    assert_eq!(histo.fill(0.3), Some(1));
    assert_eq!(histo.fill(5.1), None);
    // The upper edge of the last bin is outside
    assert_eq!(histo.fill(5.0), None);
    assert_eq!(histo.fill(0.2), Some(0));
    assert_eq!(histo.fill(4.99), Some(27));

    assert_eq!(histo.counts()[0], 2.0);
    assert_eq!(histo.counts()[1], 1.0);
    assert_eq!(histo.counts()[27], 1.0);
    assert_eq!(histo.integral(), 4.0);
    assert_eq!(histo.entries(), 4);
}

#[test]
fn test_out_of_range_and_nan_are_dropped() {
    let mut histo = Histo1D::new(vec![0.0, 1.0, 2.0]).unwrap();
    assert_eq!(histo.fill(-0.5), None);
    assert_eq!(histo.fill(f64::NAN), None);
    assert_eq!(histo.fill(f64::INFINITY), None);
    assert_eq!(histo.integral(), 0.0);
    assert_eq!(histo.entries(), 0);
}

#[test]
fn test_weighted_fill_tracks_sumw2() {
    let mut histo = Histo1D::new(vec![0.0, 1.0, 2.0]).unwrap();
    histo.fill_weighted(0.5, 2.0);
    histo.fill_weighted(0.7, 3.0);
    assert_eq!(histo.counts(), &[5.0, 0.0]);
    assert_eq!(histo.sumw2(), &[13.0, 0.0]);
    assert!((histo.bin_error(0) - 13.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_invalid_edges_are_rejected() {
    assert!(matches!(Histo1D::new(vec![1.0]), Err(HistogramError::InvalidEdges(_))));
    assert!(matches!(Histo1D::new(vec![0.0, 1.0, 1.0]), Err(HistogramError::InvalidEdges(_))));
    assert!(matches!(Histo1D::new(vec![0.0, 2.0, 1.0]), Err(HistogramError::InvalidEdges(_))));
    assert!(matches!(Histo1D::new(vec![0.0, f64::NAN]), Err(HistogramError::InvalidEdges(_))));
}

#[test]
fn test_annotations() {
    let mut histo = Histo1D::new(vec![0.0, 1.0]).unwrap();
    histo.annotate("Particle", "pi-");
    assert!(histo.has_annotation("Particle"));
    assert_eq!(histo.annotation("Particle").unwrap(), "pi-");

    match histo.annotation("Theta") {
        Err(HistogramError::MissingAnnotation(key)) => assert_eq!(key, "Theta"),
        other => panic!("expected missing annotation, got {:?}", other),
    }
}

#[test]
fn test_phase_space_normalization() {
    let mut histo = Histo1D::new(vec![0.0, 0.5, 1.5]).unwrap();
    histo.fill(0.2);
    histo.fill(0.3);
    histo.fill(1.0);

    // 10 collisions, angular width 0.06 rad
    histo.normalize(Normalization::PhaseSpace, 10, 0.06);
    assert!((histo.counts()[0] - 2.0 / (10.0 * 0.5 * 0.06)).abs() < 1e-12);
    assert!((histo.counts()[1] - 1.0 / (10.0 * 1.0 * 0.06)).abs() < 1e-12);
}

#[test]
fn test_other_normalizations() {
    let mut histo = Histo1D::new(vec![0.0, 1.0, 2.0]).unwrap();
    histo.fill(0.5);
    histo.fill(1.5);
    histo.fill(1.5);

    let mut raw = histo.clone();
    raw.normalize(Normalization::Raw, 4, 0.1);
    assert_eq!(raw.counts(), histo.counts());

    let mut per_collision = histo.clone();
    per_collision.normalize(Normalization::PerCollision, 4, 0.1);
    assert_eq!(per_collision.counts(), &[0.25, 0.5]);

    // No collisions: weights untouched instead of dividing by zero
    let mut empty_run = histo.clone();
    empty_run.normalize(Normalization::PhaseSpace, 0, 0.1);
    assert_eq!(empty_run.counts(), histo.counts());
}

#[test]
fn test_merge_is_bin_wise_sum() {
    let mut a = Histo1D::new(vec![0.0, 1.0, 2.0]).unwrap();
    let mut b = Histo1D::new(vec![0.0, 1.0, 2.0]).unwrap();
    a.fill(0.5);
    b.fill(0.5);
    b.fill(1.5);

    a.merge(&b).unwrap();
    assert_eq!(a.counts(), &[2.0, 1.0]);
    assert_eq!(a.entries(), 3);

    let c = Histo1D::new(vec![0.0, 2.0]).unwrap();
    assert!(matches!(a.merge(&c), Err(HistogramError::ShapeMismatch(_))));
}

#[test]
fn test_reset_keeps_shape_and_annotations() {
    let mut histo = Histo1D::new(vec![0.0, 1.0]).unwrap().with_path("/A/b");
    histo.fill(0.5);
    histo.reset();
    assert_eq!(histo.counts(), &[0.0]);
    assert_eq!(histo.entries(), 0);
    assert_eq!(histo.path(), "/A/b");
}

fn edges_strategy() -> impl Strategy<Value = Vec<f64>> {
    (-10.0f64..10.0, prop::collection::vec(0.01f64..5.0, 1..30)).prop_map(|(start, widths)| {
        let mut edges = vec![start];
        for w in widths {
            let last = edges[edges.len() - 1];
            edges.push(last + w);
        }
        edges
    })
}

proptest! {
    /// A fill lands in exactly one bin whose half-open interval holds the value, or in none
    #[test]
    fn prop_fill_hits_at_most_one_bin(
        edges in edges_strategy(),
        value in -20.0f64..160.0,
        weight in 0.1f64..10.0,
    ) {
        let mut histo = Histo1D::new(edges.clone()).unwrap();
        let before = histo.counts().to_vec();
        let filled = histo.fill_weighted(value, weight);

        let in_range = value >= edges[0] && value < edges[edges.len() - 1];
        match filled {
            Some(i) => {
                prop_assert!(in_range);
                prop_assert!(edges[i] <= value && value < edges[i + 1]);
                for (j, (b, a)) in before.iter().zip(histo.counts()).enumerate() {
                    if j == i {
                        prop_assert_eq!(*a, b + weight);
                    } else {
                        prop_assert_eq!(a, b);
                    }
                }
            }
            None => {
                prop_assert!(!in_range);
                prop_assert_eq!(histo.counts(), &before[..]);
            }
        }
    }
}
