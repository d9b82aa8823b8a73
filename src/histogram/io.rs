//! Histogram file format.
//!
//! One JSON document per file:
//! ```text
//! {
//!   "format": "hadronic-histo/1",
//!   "histograms": [
//!     { "edges": [...], "sumw": [...], "sumw2": [...], "entries": 12,
//!       "annotations": { "Path": "/NA61_2024/p_pim_180_240", ... } },
//!     ...
//!   ]
//! }
//! ```
//! `sumw2` and `entries` may be omitted in hand-written reference files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{Histo1D, HistogramError, ANNOTATION_NAME};

/// Format tag written into every file
pub const FORMAT_VERSION: &str = "hadronic-histo/1";

#[derive(Debug, Serialize, Deserialize)]
struct HistogramFile {
    format: String,
    histograms: Vec<HistogramRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistogramRecord {
    edges: Vec<f64>,
    sumw: Vec<f64>,
    #[serde(default)]
    sumw2: Option<Vec<f64>>,
    #[serde(default)]
    entries: u64,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

impl From<&Histo1D> for HistogramRecord {
    fn from(histo: &Histo1D) -> Self {
        Self {
            edges: histo.edges.clone(),
            sumw: histo.sumw.clone(),
            sumw2: Some(histo.sumw2.clone()),
            entries: histo.entries,
            annotations: histo.annotations.clone(),
        }
    }
}

impl HistogramRecord {
    fn into_histo(self) -> Result<Histo1D, HistogramError> {
        let sumw2 = match self.sumw2 {
            Some(sumw2) => sumw2,
            None => self.sumw.iter().map(|w| w.abs()).collect(),
        };
        Histo1D::from_parts(self.edges, self.sumw, sumw2, self.entries, self.annotations)
    }
}

/// Writes every histogram into one file at `path`, replacing any existing file.
pub fn serialize_all<'a, I>(path: &Path, histograms: I) -> Result<(), HistogramError>
where
    I: IntoIterator<Item = &'a Histo1D>,
{
    let document = HistogramFile {
        format: FORMAT_VERSION.to_string(),
        histograms: histograms.into_iter().map(HistogramRecord::from).collect(),
    };
    let text = serde_json::to_string_pretty(&document).map_err(|e| HistogramError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| HistogramError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| HistogramError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), histograms = document.histograms.len(), "wrote histogram file");
    Ok(())
}

/// Reads every histogram stored in the file at `path`, in file order.
pub fn deserialize_all(path: &Path) -> Result<Vec<Histo1D>, HistogramError> {
    let text = fs::read_to_string(path).map_err(|source| HistogramError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: HistogramFile = serde_json::from_str(&text).map_err(|e| HistogramError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if document.format != FORMAT_VERSION {
        return Err(HistogramError::Format {
            path: path.to_path_buf(),
            message: format!("unsupported format '{}', expected '{}'", document.format, FORMAT_VERSION),
        });
    }
    document
        .histograms
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            record.into_histo().map_err(|e| HistogramError::Format {
                path: path.to_path_buf(),
                message: format!("histogram #{}: {}", i, e),
            })
        })
        .collect()
}

/// First histogram whose `Name` annotation equals `name`
pub fn find_by_name<'a>(histograms: &'a [Histo1D], name: &str) -> Option<&'a Histo1D> {
    histograms
        .iter()
        .find(|h| h.annotations.get(ANNOTATION_NAME).map(String::as_str) == Some(name))
}

impl Histo1D {
    /// Empty histogram shaped after the reference distribution `name` in `objects`.
    ///
    /// Copies the reference edges and all its annotations, then sets the path
    /// to `/TMP/<name>` and the title to `name`. `source` only labels errors.
    pub fn init_from_reference(
        objects: &[Histo1D],
        name: &str,
        source: &Path,
    ) -> Result<Self, HistogramError> {
        let reference = find_by_name(objects, name).ok_or_else(|| HistogramError::NotFound {
            path: source.to_path_buf(),
            name: name.to_string(),
        })?;
        let mut histo = Histo1D::empty_like(reference);
        histo.set_path(&format!("/TMP/{}", name));
        histo.set_title(name);
        Ok(histo)
    }

    /// Reads the file at `path` and shapes an empty histogram after distribution `name`.
    pub fn from_reference(path: &Path, name: &str) -> Result<Self, HistogramError> {
        let objects = deserialize_all(path)?;
        Self::init_from_reference(&objects, name, path)
    }
}
