//! Binned one-dimensional distributions with annotations.
//!
//! A [`Histo1D`] holds `N + 1` strictly increasing edges, `N` accumulated
//! weights (plus their squares) and a string-keyed annotation map. Bins are
//! half-open `[lo, hi)`; values outside `[first, last)` are dropped. Files are
//! only touched by the functions in [`io`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub mod io;

#[cfg(test)]
mod tests;

pub use io::{deserialize_all, serialize_all};

/// Annotation holding the logical name a reference distribution is looked up by
pub const ANNOTATION_NAME: &str = "Name";
/// Annotation holding the object path, e.g. `/NA61_2024/p_pim_180_240`
pub const ANNOTATION_PATH: &str = "Path";
/// Annotation holding the display title
pub const ANNOTATION_TITLE: &str = "Title";

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("No distribution named '{name}' in {path}")]
    NotFound { path: PathBuf, name: String },
    #[error("Missing annotation '{0}'")]
    MissingAnnotation(String),
    #[error("Invalid bin edges: {0}")]
    InvalidEdges(String),
    #[error("Histogram shapes differ: {0}")]
    ShapeMismatch(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed histogram file {path}: {message}")]
    Format { path: PathBuf, message: String },
}

/// How distributions are rescaled when an analysis finalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Keep the accumulated weights as they are
    Raw,
    /// Divide by the number of collisions
    PerCollision,
    /// Divide every bin by `collisions * bin width * angular width`
    #[default]
    PhaseSpace,
}

/// A binned 1-D distribution
#[derive(Debug, Clone, PartialEq)]
pub struct Histo1D {
    edges: Vec<f64>,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
    entries: u64,
    annotations: BTreeMap<String, String>,
}

impl Histo1D {
    /// Creates an empty histogram from `N + 1` strictly increasing, finite edges.
    pub fn new(edges: Vec<f64>) -> Result<Self, HistogramError> {
        validate_edges(&edges)?;
        let n_bins = edges.len() - 1;
        Ok(Self {
            edges,
            sumw: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            entries: 0,
            annotations: BTreeMap::new(),
        })
    }

    /// Rebuilds a histogram from stored parts, checking the shape invariants.
    pub fn from_parts(
        edges: Vec<f64>,
        sumw: Vec<f64>,
        sumw2: Vec<f64>,
        entries: u64,
        annotations: BTreeMap<String, String>,
    ) -> Result<Self, HistogramError> {
        validate_edges(&edges)?;
        let n_bins = edges.len() - 1;
        if sumw.len() != n_bins || sumw2.len() != n_bins {
            return Err(HistogramError::ShapeMismatch(format!(
                "{} edges need {} bins, got {} weights and {} squared weights",
                edges.len(),
                n_bins,
                sumw.len(),
                sumw2.len()
            )));
        }
        Ok(Self { edges, sumw, sumw2, entries, annotations })
    }

    /// Empty histogram with the edges and all annotations of `reference`.
    pub fn empty_like(reference: &Histo1D) -> Self {
        let n_bins = reference.num_bins();
        Self {
            edges: reference.edges.clone(),
            sumw: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            entries: 0,
            annotations: reference.annotations.clone(),
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.set_path(path);
        self
    }

    pub fn set_path(&mut self, path: &str) {
        self.annotate(ANNOTATION_PATH, path);
    }

    pub fn set_title(&mut self, title: &str) {
        self.annotate(ANNOTATION_TITLE, title);
    }

    /// Object path, empty if never set
    pub fn path(&self) -> &str {
        self.annotations.get(ANNOTATION_PATH).map(String::as_str).unwrap_or("")
    }

    pub fn num_bins(&self) -> usize {
        self.sumw.len()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Accumulated weight per bin
    pub fn counts(&self) -> &[f64] {
        &self.sumw
    }

    /// Accumulated squared weight per bin
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Number of fills that landed in range
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn bin_width(&self, index: usize) -> f64 {
        self.edges[index + 1] - self.edges[index]
    }

    /// Sum of all bin weights
    pub fn integral(&self) -> f64 {
        self.sumw.iter().sum()
    }

    /// Statistical error of a bin, `sqrt(sumw2)`
    pub fn bin_error(&self, index: usize) -> f64 {
        self.sumw2[index].sqrt()
    }

    /// Index of the half-open bin containing `value`, if any.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if !(value >= first && value < last) {
            return None;
        }
        Some(self.edges.partition_point(|&edge| edge <= value) - 1)
    }

    pub fn fill(&mut self, value: f64) -> Option<usize> {
        self.fill_weighted(value, 1.0)
    }

    /// Adds `weight` to the bin containing `value`; out-of-range values are dropped.
    ///
    /// Returns the bin that was filled.
    pub fn fill_weighted(&mut self, value: f64, weight: f64) -> Option<usize> {
        let index = self.bin_index(value)?;
        self.sumw[index] += weight;
        self.sumw2[index] += weight * weight;
        self.entries += 1;
        Some(index)
    }

    /// Multiplies every bin by `factor`
    pub fn scale(&mut self, factor: f64) {
        for (w, w2) in self.sumw.iter_mut().zip(self.sumw2.iter_mut()) {
            *w *= factor;
            *w2 *= factor * factor;
        }
    }

    /// Rescales according to `policy`.
    ///
    /// `angular_width` is the angular acceptance width (rad) of the selection
    /// that filled this histogram. With zero collisions the weights
    /// are left untouched.
    pub fn normalize(&mut self, policy: Normalization, num_collisions: usize, angular_width: f64) {
        if num_collisions == 0 {
            tracing::warn!(path = self.path(), "skipping normalization of histogram without collisions");
            return;
        }
        let n = num_collisions as f64;
        match policy {
            Normalization::Raw => {}
            Normalization::PerCollision => self.scale(1.0 / n),
            Normalization::PhaseSpace => {
                for i in 0..self.num_bins() {
                    let factor = 1.0 / (n * self.bin_width(i) * angular_width);
                    self.sumw[i] *= factor;
                    self.sumw2[i] *= factor * factor;
                }
            }
        }
    }

    /// Adds the bins of `other`, which must have identical edges.
    pub fn merge(&mut self, other: &Histo1D) -> Result<(), HistogramError> {
        if self.edges != other.edges {
            return Err(HistogramError::ShapeMismatch(format!(
                "cannot merge '{}' into '{}': bin edges differ",
                other.path(),
                self.path()
            )));
        }
        for i in 0..self.num_bins() {
            self.sumw[i] += other.sumw[i];
            self.sumw2[i] += other.sumw2[i];
        }
        self.entries += other.entries;
        Ok(())
    }

    /// Clears the accumulated weights, keeping edges and annotations
    pub fn reset(&mut self) {
        self.sumw.iter_mut().for_each(|w| *w = 0.0);
        self.sumw2.iter_mut().for_each(|w| *w = 0.0);
        self.entries = 0;
    }

    pub fn annotate(&mut self, key: &str, value: &str) {
        self.annotations.insert(key.to_string(), value.to_string());
    }

    pub fn has_annotation(&self, key: &str) -> bool {
        self.annotations.contains_key(key)
    }

    /// Value of annotation `key`
    pub fn annotation(&self, key: &str) -> Result<&str, HistogramError> {
        self.annotations
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| HistogramError::MissingAnnotation(key.to_string()))
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}

fn validate_edges(edges: &[f64]) -> Result<(), HistogramError> {
    if edges.len() < 2 {
        return Err(HistogramError::InvalidEdges(format!(
            "need at least 2 edges, got {}",
            edges.len()
        )));
    }
    if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
        return Err(HistogramError::InvalidEdges(format!("non-finite edge {}", bad)));
    }
    if let Some(pair) = edges.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(HistogramError::InvalidEdges(format!(
            "edges must be strictly increasing, found {} followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
