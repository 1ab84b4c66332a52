//! Engine tuning knobs.

use serde::{Deserialize, Serialize};

/// Cache sizes for [`FeatureSearch`](crate::FeatureSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Built indices kept, keyed by dataset and cross-species tag.
    pub index_cache_capacity: usize,
    /// Resolved queries kept, keyed by dataset and raw query.
    pub query_cache_capacity: usize,
}

impl SearchConfig {
    pub const DEFAULT_INDEX_CACHE_CAPACITY: usize = 16;
    pub const DEFAULT_QUERY_CACHE_CAPACITY: usize = 256;
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_cache_capacity: Self::DEFAULT_INDEX_CACHE_CAPACITY,
            query_cache_capacity: Self::DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}
