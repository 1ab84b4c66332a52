pub mod config;
pub mod index;
pub mod lookup;

pub use index::show_index;
pub use lookup::run_lookup;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use scope_core::{DatasetIdentity, OrthologyTables};
use scope_data::{orthology, Config, JsonDatasetSource};
use scope_search::FeatureSearch;

/// Build the search engine from the configured orthology tables.
///
/// A missing orthology directory leaves cross-species queries and synonym
/// collapsing unavailable but is not an error.
pub fn open_engine(config: &Config) -> Result<FeatureSearch> {
    let tables = if config.orthology_dir.is_dir() {
        orthology::load_dir(&config.orthology_dir).with_context(|| {
            format!(
                "Failed to load orthology tables from {}",
                config.orthology_dir.display()
            )
        })?
    } else {
        log::warn!(
            "Orthology directory {} not found; searching without ortholog or synonym tables",
            config.orthology_dir.display()
        );
        OrthologyTables::new()
    };

    Ok(FeatureSearch::new(
        Arc::new(JsonDatasetSource::new()),
        Arc::new(tables),
        config.search,
    ))
}

/// Identity of a dataset named on the command line.
pub fn dataset_identity(config: &Config, dataset: &Path) -> DatasetIdentity {
    DatasetIdentity::resolve(config.dataset_path(dataset))
}
