//! Query resolution: candidate filtering, ranking, grouping, descriptions.
//!
//! Ranking is a cascade of stable move-to-front passes. Each pass moves the
//! candidates satisfying its predicate ahead of the rest without reordering
//! either side, and later passes dominate earlier ones:
//!
//! 1. normalized term contains the raw (unfolded) query
//! 2. normalized term starts with the folded query
//! 3. normalized term equals the folded query
//! 4. original term equals the raw query
//!
//! Ties at every level keep index insertion order.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use scope_core::{OrthologProvider, SpeciesPair};

use crate::index::{normalize, Category, IndexEntry, SearchIndex};

/// One resolved feature, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub category: Category,
    /// Empty, a synonym list, or an ortholog annotation.
    pub description: String,
}

/// Ranked, de-duplicated features for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    features: Vec<Feature>,
}

/// Index-aligned columns handed to the request layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureColumns {
    pub features: Vec<String>,
    pub feature_types: Vec<String>,
    pub feature_descriptions: Vec<String>,
}

impl MatchResult {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in ranked order.
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Split into three parallel columns of equal length.
    pub fn columns(&self) -> FeatureColumns {
        let mut columns = FeatureColumns::default();
        for feature in &self.features {
            columns.features.push(feature.name.clone());
            columns.feature_types.push(feature.category.to_string());
            columns.feature_descriptions.push(feature.description.clone());
        }
        columns
    }
}

/// Resolve `query` (species prefix already removed) against `index`.
///
/// Cross-species indices translate each match through `orthology` into the
/// dataset's species; native indices collapse synonyms of one canonical term.
pub fn resolve(index: &SearchIndex, query: &str, orthology: &dyn OrthologProvider) -> MatchResult {
    let started = Instant::now();
    let folded = normalize(query);

    let mut candidates: Vec<&IndexEntry> = index
        .entries()
        .iter()
        .filter(|e| e.key.normalized.contains(folded.as_str()))
        .collect();
    rank(&mut candidates, query, &folded);

    let features = match index.cross_species() {
        Some(pair) => group_orthologs(&candidates, pair, orthology),
        None => group_synonyms(&candidates),
    };

    log::debug!(
        "{} entries matching '{}' collapsed to {} features in {:?}",
        candidates.len(),
        query,
        features.len(),
        started.elapsed()
    );
    MatchResult { features }
}

/// Apply the ranking cascade in place.
fn rank(candidates: &mut [&IndexEntry], raw: &str, folded: &str) {
    promote(candidates, |e| e.key.normalized.contains(raw));
    promote(candidates, |e| e.key.normalized.starts_with(folded));
    promote(candidates, |e| e.key.normalized == folded);
    promote(candidates, |e| e.key.original == raw);
}

/// Stable move-to-front of every candidate matching `pred`.
fn promote(candidates: &mut [&IndexEntry], pred: impl Fn(&IndexEntry) -> bool) {
    // `sort_by_key` is stable and `false < true`.
    candidates.sort_by_key(|entry| !pred(entry));
}

/// Collapse candidates onto `(canonical, category)`; every original spelling
/// becomes a synonym of its group.
fn group_synonyms(candidates: &[&IndexEntry]) -> Vec<Feature> {
    let mut groups: Vec<(&str, &Category, Vec<&str>)> = Vec::new();
    let mut slots: HashMap<(&str, &Category), usize> = HashMap::new();

    for entry in candidates {
        let key = (entry.canonical.as_str(), &entry.key.category);
        match slots.get(&key) {
            Some(&slot) => groups[slot].2.push(entry.key.original.as_str()),
            None => {
                slots.insert(key, groups.len());
                groups.push((key.0, key.1, vec![entry.key.original.as_str()]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(canonical, category, mut synonyms)| {
            synonyms.sort_unstable();
            synonyms.retain(|s| *s != canonical);
            let description = if synonyms.is_empty() {
                String::new()
            } else {
                format!("Synonym of: {}", synonyms.join(", "))
            };
            Feature {
                name: canonical.to_string(),
                category: category.clone(),
                description,
            }
        })
        .collect()
}

/// Expand candidates into their orthologs. The first candidate to reach an
/// `(ortholog, category)` pair owns it; later ones are dropped.
fn group_orthologs(
    candidates: &[&IndexEntry],
    pair: SpeciesPair,
    orthology: &dyn OrthologProvider,
) -> Vec<Feature> {
    let mut features: Vec<Feature> = Vec::new();
    let mut seen: HashSet<(String, Category)> = HashSet::new();

    for entry in candidates {
        for ortholog in orthology.orthologs(pair, &entry.canonical) {
            let key = (ortholog.gene, entry.key.category.clone());
            if !seen.insert(key.clone()) {
                continue;
            }
            let (name, category) = key;
            features.push(Feature {
                name,
                category,
                description: format!(
                    "Orthologue of {}, {:.2}% identity ({})",
                    entry.key.original, ortholog.identity, pair
                ),
            });
        }
    }

    features
}
