//! The feature lookup entry point used by the request layer.

use std::sync::Arc;

use scope_core::{DatasetIdentity, DatasetSource, OrthologProvider, Result, Species};

use crate::cache::{BoundedCache, CacheStats};
use crate::config::SearchConfig;
use crate::index::SearchIndex;
use crate::query::ParsedQuery;
use crate::resolve::{resolve, MatchResult};

type IndexKey = (DatasetIdentity, Option<Species>);
type QueryKey = (DatasetIdentity, String);

/// Resolves free-text feature queries against datasets.
///
/// Built indices and resolved queries are cached per dataset identity, so
/// handles opened independently for the same file share cache entries.
/// `FeatureSearch` is `Sync` and meant to be shared across request workers.
#[derive(Debug)]
pub struct FeatureSearch {
    datasets: Arc<dyn DatasetSource>,
    orthology: Arc<dyn OrthologProvider>,
    indices: BoundedCache<IndexKey, SearchIndex>,
    queries: BoundedCache<QueryKey, MatchResult>,
}

impl FeatureSearch {
    pub fn new(
        datasets: Arc<dyn DatasetSource>,
        orthology: Arc<dyn OrthologProvider>,
        config: SearchConfig,
    ) -> Self {
        Self {
            datasets,
            orthology,
            indices: BoundedCache::new(config.index_cache_capacity),
            queries: BoundedCache::new(config.query_cache_capacity),
        }
    }

    /// Ranked features of `identity` matching `raw_query`.
    ///
    /// `raw_query` may carry a species prefix (`hsap\BRCA`) to search that
    /// species' genes and report their orthologs in the dataset.
    ///
    /// # Errors
    ///
    /// Fails when the dataset cannot be opened or indexed. Failures are not
    /// cached; the next call retries.
    pub fn lookup_features(
        &self,
        identity: &DatasetIdentity,
        raw_query: &str,
    ) -> Result<Arc<MatchResult>> {
        let key = (identity.clone(), raw_query.to_string());
        self.queries.get_or_try_insert_with(&key, || -> Result<MatchResult> {
            let parsed = ParsedQuery::parse(raw_query);
            let index = self.index(identity, parsed.cross_species)?;
            Ok(resolve(&index, parsed.text, self.orthology.as_ref()))
        })
    }

    /// The search index for `identity` in the mode selected by
    /// `cross_species`, building it on first use.
    pub fn index(
        &self,
        identity: &DatasetIdentity,
        cross_species: Option<Species>,
    ) -> Result<Arc<SearchIndex>> {
        let key = (identity.clone(), cross_species);
        self.indices.get_or_try_insert_with(&key, || -> Result<SearchIndex> {
            log::debug!("Opening {} to build its search index", identity);
            let dataset = self.datasets.open(identity)?;
            SearchIndex::build(dataset.as_ref(), cross_species, self.orthology.as_ref())
        })
    }

    pub fn index_cache_stats(&self) -> CacheStats {
        self.indices.stats()
    }

    pub fn query_cache_stats(&self) -> CacheStats {
        self.queries.stats()
    }
}
