//! Feature search for single-cell datasets.
//!
//! Turns free-text queries into ranked lists of dataset features (genes,
//! regulons, cluster labels, annotations), optionally translating genes from
//! another species through ortholog tables. Indices and resolved queries are
//! held in bounded, thread-safe caches keyed by dataset identity.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod config;
pub mod engine;
pub mod index;
pub mod query;
pub mod resolve;

#[cfg(test)]
mod testing;

pub use cache::{BoundedCache, CacheStats};
pub use config::SearchConfig;
pub use engine::FeatureSearch;
pub use index::{normalize, Category, IndexEntry, IndexKey, SearchIndex, ALL_CLUSTERS};
pub use query::{ParsedQuery, PREFIX_DELIMITER};
pub use resolve::{resolve, Feature, FeatureColumns, MatchResult};
