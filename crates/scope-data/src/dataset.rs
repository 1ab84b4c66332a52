//! JSON-backed datasets.
//!
//! A dataset file is a single JSON document:
//!
//! ```json
//! {
//!   "species": "dmel",
//!   "genes": ["brat", "Abd-B"],
//!   "clusterings": [{"name": "Leiden", "clusters": [{"id": 0, "description": "Neurons"}]}],
//!   "regulons": ["brat_(+)"],
//!   "annotations": [{"name": "tissue", "values": ["brain"]}]
//! }
//! ```
//!
//! Only `species` and `genes` are required for searching. The optional
//! sections report as absent when their key is missing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use scope_core::{
    Annotation, Clustering, DatasetAccessor, DatasetIdentity, DatasetSource, Error, Result,
    Species,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    species: Option<String>,
    #[serde(default)]
    genes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clusterings: Option<Vec<Clustering>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regulons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotations: Option<Vec<Annotation>>,
}

/// A dataset read from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    identity: DatasetIdentity,
    document: Document,
}

impl JsonDataset {
    /// Read and parse a dataset file.
    ///
    /// Missing required sections are not an error here; they surface when
    /// the dataset is searched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::InvalidDataset`] when it is not a dataset document.
    pub fn open(path: &Path) -> Result<Self> {
        let identity = DatasetIdentity::resolve(path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(identity, &content)
    }

    /// Parse a dataset document held in memory.
    pub fn from_json(identity: DatasetIdentity, json: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(json)
            .map_err(|e| Error::invalid_dataset(&identity, format!("malformed document: {e}")))?;
        log::debug!(
            "Loaded dataset {} ({} genes)",
            identity,
            document.genes.as_ref().map_or(0, Vec::len)
        );
        Ok(Self { identity, document })
    }
}

impl DatasetAccessor for JsonDataset {
    fn identity(&self) -> &DatasetIdentity {
        &self.identity
    }

    fn infer_species(&self) -> Result<Species> {
        let code = self
            .document
            .species
            .as_deref()
            .ok_or_else(|| Error::invalid_dataset(&self.identity, "no species declared"))?;
        code.parse()
    }

    fn genes(&self) -> Result<Vec<String>> {
        self.document
            .genes
            .clone()
            .ok_or_else(|| Error::invalid_dataset(&self.identity, "no gene list"))
    }

    fn has_clustering_metadata(&self) -> bool {
        self.document.clusterings.is_some()
    }

    fn clustering_metadata(&self) -> Result<Vec<Clustering>> {
        Ok(self.document.clusterings.clone().unwrap_or_default())
    }

    fn has_regulons(&self) -> bool {
        self.document.regulons.is_some()
    }

    fn regulon_names(&self) -> Result<Vec<String>> {
        Ok(self.document.regulons.clone().unwrap_or_default())
    }

    fn has_annotation_metadata(&self) -> bool {
        self.document.annotations.is_some()
    }

    fn annotation_metadata(&self) -> Result<Vec<Annotation>> {
        Ok(self.document.annotations.clone().unwrap_or_default())
    }
}

/// Opens [`JsonDataset`]s by identity.
///
/// Every call reads the file again; callers cache the indices built from
/// it, not the dataset itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDatasetSource;

impl JsonDatasetSource {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetSource for JsonDatasetSource {
    fn open(&self, identity: &DatasetIdentity) -> Result<Arc<dyn DatasetAccessor>> {
        let path = identity.as_path();
        if !path.is_file() {
            return Err(Error::NotFound {
                entity: "dataset",
                id: identity.to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let dataset = JsonDataset::from_json(identity.clone(), &content)?;
        Ok(Arc::new(dataset))
    }
}
