//! Dataset collaborator contracts.
//!
//! The search engine never touches dataset storage directly. It sees a
//! dataset through [`DatasetAccessor`], and turns a [`DatasetIdentity`] into
//! an accessor through a [`DatasetSource`]. Both are read-only from the
//! engine's point of view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::species::Species;

/// Stable value-equality key for a dataset.
///
/// Two handles opened independently for the same file compare equal, so
/// caches keyed by identity survive re-opening a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetIdentity(PathBuf);

impl DatasetIdentity {
    /// Resolve a path into an identity.
    ///
    /// Uses the canonical path when the file exists; otherwise the path is
    /// made absolute against the current directory without touching the
    /// filesystem further.
    pub fn resolve(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            return Self(canonical);
        }
        log::debug!("{} does not exist; using it uncanonicalized", path.display());
        if path.is_absolute() {
            return Self(path.to_path_buf());
        }
        let absolute = std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf());
        Self(absolute)
    }

    /// Wrap a path verbatim, without resolution.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DatasetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One cluster inside a clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i64,
    pub description: String,
}

/// A named clustering of the dataset's cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clustering {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// A named cell annotation (e.g. tissue, sex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Read access to one dataset's searchable features.
///
/// Absence of regulons, clusterings, or annotations is reported through the
/// `has_*` methods and is never an error.
pub trait DatasetAccessor: Send + Sync + fmt::Debug {
    /// The identity this handle was opened for.
    fn identity(&self) -> &DatasetIdentity;

    /// The dataset's own species.
    fn infer_species(&self) -> Result<Species>;

    /// Gene names in the order the dataset stores them.
    fn genes(&self) -> Result<Vec<String>>;

    fn has_clustering_metadata(&self) -> bool;

    fn clustering_metadata(&self) -> Result<Vec<Clustering>>;

    fn has_regulons(&self) -> bool;

    fn regulon_names(&self) -> Result<Vec<String>>;

    fn has_annotation_metadata(&self) -> bool;

    fn annotation_metadata(&self) -> Result<Vec<Annotation>>;
}

/// Resolves identities to dataset handles.
pub trait DatasetSource: Send + Sync + fmt::Debug {
    fn open(&self, identity: &DatasetIdentity) -> Result<Arc<dyn DatasetAccessor>>;
}
