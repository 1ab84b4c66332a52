//! Core domain types for single-cell feature search.
//!
//! This crate defines the species vocabulary, the dataset and orthology
//! collaborator traits consumed by the search engine, the in-memory
//! ortholog/synonym tables, and the shared error type.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod dataset;
pub mod error;
pub mod orthology;
pub mod species;

pub use dataset::{Annotation, Cluster, Clustering, DatasetAccessor, DatasetIdentity, DatasetSource};
pub use error::{Error, Result};
pub use orthology::{Ortholog, OrthologProvider, OrthologyTables, SynonymTable};
pub use species::{Species, SpeciesPair};
