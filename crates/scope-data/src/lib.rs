//! File-backed collaborators for scope.
//!
//! Reads datasets from JSON files and ortholog/synonym tables from a
//! directory of TSV files, and loads the layered configuration.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod dataset;
pub mod orthology;

pub use config::Config;
pub use dataset::{JsonDataset, JsonDatasetSource};
