use crate::histogram::io::{find_by_name, FORMAT_VERSION};
use crate::histogram::{deserialize_all, serialize_all, Histo1D, HistogramError, ANNOTATION_NAME};
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

fn sample(name: &str, edges: Vec<f64>, values: &[f64]) -> Histo1D {
    let mut histo = Histo1D::new(edges).unwrap().with_path(&format!("/TEST/{}", name));
    histo.annotate(ANNOTATION_NAME, name);
    histo.annotate("Theta", "20-40 mrad");
    for v in values {
        histo.fill_weighted(*v, 0.3);
    }
    histo
}

#[test]
fn test_round_trip_preserves_everything() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");

    let histos = vec![
        sample("a", vec![0.2, 0.3, 0.4, 1.0], &[0.25, 0.35, 0.35, 0.9]),
        sample("b", vec![-1.0, 0.0, 1.0 / 3.0, 2.5], &[-0.5, 0.1, 0.1, 2.4]),
    ];
    serialize_all(&path, &histos).unwrap();

    let restored = deserialize_all(&path).unwrap();
    assert_eq!(restored, histos);
}

#[test]
fn test_serialize_overwrites_and_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("out.json");

    serialize_all(&path, &[sample("a", vec![0.0, 1.0], &[0.5])]).unwrap();
    serialize_all(&path, &[sample("b", vec![0.0, 2.0], &[])]).unwrap();

    let restored = deserialize_all(&path).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].annotation(ANNOTATION_NAME).unwrap(), "b");
}

#[test]
fn test_reference_file_without_sumw2() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ref.json");
    let text = format!(
        r#"{{
  "format": "{}",
  "histograms": [
    {{ "edges": [0.0, 1.0, 2.0], "sumw": [0.5, -0.25],
       "annotations": {{ "Name": "d01-x01-y01", "Particle": "pi-" }} }}
  ]
}}"#,
        FORMAT_VERSION
    );
    fs::write(&path, text).unwrap();

    let objects = deserialize_all(&path).unwrap();
    assert_eq!(objects[0].sumw2(), &[0.5, 0.25]);
    assert_eq!(objects[0].entries(), 0);
    assert!(find_by_name(&objects, "d01-x01-y01").is_some());
    assert!(find_by_name(&objects, "d02-x01-y01").is_none());
}

#[test]
fn test_from_reference_copies_shape_and_annotations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ref.json");
    let reference = sample("d01-x01-y01", vec![0.2, 0.4, 0.8], &[0.3, 0.5]);
    serialize_all(&path, [&reference]).unwrap();

    let histo = Histo1D::from_reference(&path, "d01-x01-y01").unwrap();
    assert_eq!(histo.edges(), reference.edges());
    assert_eq!(histo.counts(), &[0.0, 0.0]);
    assert_eq!(histo.path(), "/TMP/d01-x01-y01");
    assert_eq!(histo.annotation("Title").unwrap(), "d01-x01-y01");
    assert_eq!(histo.annotation("Theta").unwrap(), "20-40 mrad");

    match Histo1D::from_reference(&path, "missing") {
        Err(HistogramError::NotFound { name, .. }) => assert_eq!(name, "missing"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_malformed_files_are_format_errors() {
    let dir = tempdir().unwrap();

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "not json").unwrap();
    assert!(matches!(deserialize_all(&garbage), Err(HistogramError::Format { .. })));

    let wrong_version = dir.path().join("v0.json");
    fs::write(&wrong_version, r#"{"format": "yoda", "histograms": []}"#).unwrap();
    assert!(matches!(deserialize_all(&wrong_version), Err(HistogramError::Format { .. })));

    let bad_shape = dir.path().join("shape.json");
    let text = format!(
        r#"{{"format": "{}", "histograms": [{{"edges": [0.0, 1.0], "sumw": [1.0, 2.0]}}]}}"#,
        FORMAT_VERSION
    );
    fs::write(&bad_shape, text).unwrap();
    assert!(matches!(deserialize_all(&bad_shape), Err(HistogramError::Format { .. })));

    let missing = dir.path().join("missing.json");
    assert!(matches!(deserialize_all(&missing), Err(HistogramError::Io { .. })));
}

fn histogram_strategy() -> impl Strategy<Value = Histo1D> {
    (
        -10.0f64..10.0,
        prop::collection::vec(0.001f64..5.0, 1..20),
        prop::collection::vec((-20.0f64..120.0, -3.0f64..3.0), 0..40),
        prop::collection::btree_map("[A-Za-z]{1,8}", "[ -~]{0,16}", 0..4),
    )
        .prop_map(|(start, widths, fills, annotations)| {
            let mut edges = vec![start];
            for w in widths {
                let last = edges[edges.len() - 1];
                edges.push(last + w);
            }
            let mut histo = Histo1D::new(edges).unwrap();
            for (value, weight) in fills {
                histo.fill_weighted(value, weight);
            }
            for (key, value) in annotations {
                histo.annotate(&key, &value);
            }
            histo
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Writing then reading a set of histograms gives the same set back
    #[test]
    fn prop_round_trip_preserves_any_store_set(
        histos in prop::collection::vec(histogram_strategy(), 0..4),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        serialize_all(&path, &histos).unwrap();
        prop_assert_eq!(deserialize_all(&path).unwrap(), histos);
    }
}
