//! Search index construction.
//!
//! A [`SearchIndex`] maps `(normalized, original, category)` keys to the
//! canonical term a match should be reported as. It is built once per
//! `(dataset, cross-species tag)` and never mutated afterwards.
//!
//! Entry order matters: the resolver's ranking passes are stable, so ties
//! come out in the order terms were inserted here.

use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use scope_core::{
    DatasetAccessor, Error, OrthologProvider, Result, Species, SpeciesPair, SynonymTable,
};

/// Literal entry added to every clustering so a whole clustering can be
/// selected at once.
pub const ALL_CLUSTERS: &str = "All Clusters";

/// Kind of feature an index entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Gene,
    Regulon,
    Annotation,
    /// A cluster (or "All Clusters") within the named clustering.
    Clustering(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gene => f.write_str("gene"),
            Self::Regulon => f.write_str("regulon"),
            Self::Annotation => f.write_str("annotation"),
            Self::Clustering(name) => write!(f, "Clustering: {name}"),
        }
    }
}

/// Serialized as its display label, the form clients see in `featureTypes`.
impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Full Unicode case folding, so `Straße` and `STRASSE` fold alike.
pub fn normalize(term: &str) -> String {
    caseless::default_case_fold_str(term)
}

/// Composite key of an index entry. Unique within an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub normalized: String,
    pub original: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub key: IndexKey,
    /// Term the entry resolves to: itself, its canonical synonym, or (in
    /// cross-species mode) the source-species gene used for ortholog lookup.
    pub canonical: String,
}

/// Searchable terms of one dataset in one mode.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    species: Species,
    cross_species: Option<SpeciesPair>,
    entries: Vec<IndexEntry>,
    positions: HashMap<IndexKey, usize>,
}

impl SearchIndex {
    fn new(species: Species, cross_species: Option<SpeciesPair>) -> Self {
        Self {
            species,
            cross_species,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Build the index for `dataset`.
    ///
    /// When `cross_species` names a species other than the dataset's own and
    /// `orthology` has a table translating it into the dataset's species, the
    /// index holds only that species' genes. Otherwise (no tag, the dataset's
    /// own species, or no table) the dataset's genes, clusterings, regulons,
    /// and annotations are indexed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataset`] when the dataset cannot report its
    /// species or genes, or fails while listing any other feature.
    pub fn build(
        dataset: &dyn DatasetAccessor,
        cross_species: Option<Species>,
        orthology: &dyn OrthologProvider,
    ) -> Result<Self> {
        let started = Instant::now();
        let species = dataset
            .infer_species()
            .map_err(|e| invalid_dataset(dataset, e))?;

        // Every mode requires a readable gene list.
        let genes = dataset.genes().map_err(|e| invalid_dataset(dataset, e))?;

        let pair = cross_species
            .filter(|&tag| tag != species)
            .map(|tag| SpeciesPair::new(tag, species));

        let index = match pair {
            Some(pair) if orthology.has_orthologs(pair) => {
                Self::build_cross_species(species, pair, orthology)
            }
            Some(pair) => {
                log::warn!(
                    "No ortholog table for {}; indexing {} natively",
                    pair,
                    dataset.identity()
                );
                Self::build_native(dataset, species, &genes, orthology)?
            }
            None => Self::build_native(dataset, species, &genes, orthology)?,
        };

        log::debug!(
            "Built search index for {} ({} entries, cross-species: {:?}) in {:?}",
            dataset.identity(),
            index.len(),
            index.cross_species.map(|p| p.to_string()),
            started.elapsed()
        );
        Ok(index)
    }

    fn build_cross_species(
        species: Species,
        pair: SpeciesPair,
        orthology: &dyn OrthologProvider,
    ) -> Self {
        let mut index = Self::new(species, Some(pair));
        let genes = orthology.source_genes(pair);
        index.add_terms(genes.iter().map(String::as_str), &Category::Gene, None);
        index
    }

    fn build_native(
        dataset: &dyn DatasetAccessor,
        species: Species,
        genes: &[String],
        orthology: &dyn OrthologProvider,
    ) -> Result<Self> {
        let mut index = Self::new(species, None);

        match orthology.synonyms(species).filter(|t| !t.is_empty()) {
            Some(mapping) => {
                let present: HashSet<&str> = genes.iter().map(String::as_str).collect();
                let reachable = mapping
                    .iter()
                    .filter(|(literal, canonical)| {
                        present.contains(literal) || present.contains(canonical)
                    })
                    .map(|(literal, _)| literal);
                index.add_terms(reachable, &Category::Gene, Some(mapping));
            }
            None => index.add_terms(genes.iter().map(String::as_str), &Category::Gene, None),
        }

        if dataset.has_clustering_metadata() {
            let clusterings = dataset
                .clustering_metadata()
                .map_err(|e| invalid_dataset(dataset, e))?;
            for clustering in &clusterings {
                let category = Category::Clustering(clustering.name.clone());
                let terms = std::iter::once(ALL_CLUSTERS)
                    .chain(clustering.clusters.iter().map(|c| c.description.as_str()));
                index.add_terms(terms, &category, None);
            }
        }

        if dataset.has_regulons() {
            let regulons = dataset
                .regulon_names()
                .map_err(|e| invalid_dataset(dataset, e))?;
            index.add_terms(regulons.iter().map(String::as_str), &Category::Regulon, None);
        } else {
            log::debug!("No regulons found in {}", dataset.identity());
        }

        if dataset.has_annotation_metadata() {
            let annotations = dataset
                .annotation_metadata()
                .map_err(|e| invalid_dataset(dataset, e))?;
            index.add_terms(
                annotations.iter().map(|a| a.name.as_str()),
                &Category::Annotation,
                None,
            );
        }

        Ok(index)
    }

    /// Insert every term under `category`. With a mapping, a term whose
    /// canonical name differs from its spelling resolves to that canonical
    /// name.
    fn add_terms<'a>(
        &mut self,
        terms: impl IntoIterator<Item = &'a str>,
        category: &Category,
        mapping: Option<&SynonymTable>,
    ) {
        for term in terms {
            let canonical = mapping
                .and_then(|m| m.canonical(term))
                .unwrap_or(term)
                .to_string();
            self.insert(term, category.clone(), canonical);
        }
    }

    /// Map semantics: re-inserting a key replaces its canonical term and
    /// keeps its original position.
    fn insert(&mut self, original: &str, category: Category, canonical: String) {
        let key = IndexKey {
            normalized: normalize(original),
            original: original.to_string(),
            category,
        };
        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].canonical = canonical;
        } else {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push(IndexEntry { key, canonical });
        }
    }

    /// The dataset's own species.
    pub fn species(&self) -> Species {
        self.species
    }

    /// The translation this index was built for, if it is a cross-species
    /// index.
    pub fn cross_species(&self) -> Option<SpeciesPair> {
        self.cross_species
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn canonical(&self, key: &IndexKey) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].canonical.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry count per category, in order of first appearance.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for entry in &self.entries {
            match counts.iter_mut().find(|(c, _)| *c == entry.key.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((entry.key.category.clone(), 1)),
            }
        }
        counts
    }
}

fn invalid_dataset(dataset: &dyn DatasetAccessor, err: Error) -> Error {
    match err {
        Error::InvalidDataset { .. } => err,
        other => Error::invalid_dataset(dataset.identity(), other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tables, FakeDataset};

    fn gene_originals(index: &SearchIndex) -> Vec<&str> {
        index
            .entries()
            .iter()
            .filter(|e| e.key.category == Category::Gene)
            .map(|e| e.key.original.as_str())
            .collect()
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Gene.to_string(), "gene");
        assert_eq!(Category::Regulon.to_string(), "regulon");
        assert_eq!(Category::Annotation.to_string(), "annotation");
        assert_eq!(
            Category::Clustering("Leiden".to_string()).to_string(),
            "Clustering: Leiden"
        );
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&[
            Category::Gene,
            Category::Clustering("Leiden".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"["gene","Clustering: Leiden"]"#);
    }

    #[test]
    fn test_normalize_applies_full_case_folding() {
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("STRASSE"), "strasse");
        assert_eq!(normalize("ΟΔΟΣ"), normalize("οδος"));
        assert_eq!(normalize("Trp53"), "trp53");
    }

    #[test]
    fn test_native_index_covers_every_feature_kind() {
        let dataset = FakeDataset::dmel_full();
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();

        assert_eq!(index.species(), Species::Dmel);
        assert!(index.cross_species().is_none());
        let counts = index.category_counts();
        assert_eq!(
            counts,
            vec![
                (Category::Gene, 4),
                (Category::Clustering("Leiden".to_string()), 3),
                (Category::Regulon, 2),
                (Category::Annotation, 2),
            ]
        );
    }

    #[test]
    fn test_entries_are_case_folded() {
        let dataset = FakeDataset::new(Species::Mmus).with_genes(&["Trp53", "GAPDH"]);
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();

        let normalized: Vec<&str> = index
            .entries()
            .iter()
            .map(|e| e.key.normalized.as_str())
            .collect();
        assert_eq!(normalized, vec!["trp53", "gapdh"]);
        assert_eq!(index.entries()[0].canonical, "Trp53");
    }

    #[test]
    fn test_all_clusters_precedes_cluster_descriptions() {
        let dataset = FakeDataset::dmel_full();
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();

        let clusters: Vec<&str> = index
            .entries()
            .iter()
            .filter(|e| matches!(e.key.category, Category::Clustering(_)))
            .map(|e| e.key.original.as_str())
            .collect();
        assert_eq!(clusters, vec![ALL_CLUSTERS, "Neurons", "Glia"]);
    }

    #[test]
    fn test_synonym_mapping_restricts_to_reachable_genes() {
        // Table knows CG9999 -> zzz, but neither spelling is in the dataset.
        let dataset = FakeDataset::new(Species::Dmel).with_genes(&["brat", "Abd-B"]);
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();

        assert_eq!(gene_originals(&index), vec!["brat", "CG10719", "Abd-B", "CG11648"]);
        let cg = index
            .entries()
            .iter()
            .find(|e| e.key.original == "CG10719")
            .unwrap();
        assert_eq!(cg.canonical, "brat");
    }

    #[test]
    fn test_duplicate_terms_collapse() {
        let dataset = FakeDataset::new(Species::Hsap).with_genes(&["TP53", "TP53", "tp53"]);
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();

        // Same original twice collapses; a different spelling is its own key.
        assert_eq!(gene_originals(&index), vec!["TP53", "tp53"]);
    }

    #[test]
    fn test_cross_species_index_contains_only_genes() {
        let dataset = FakeDataset::dmel_full();
        let index = SearchIndex::build(&dataset, Some(Species::Hsap), &tables()).unwrap();

        assert_eq!(
            index.cross_species(),
            Some(SpeciesPair::new(Species::Hsap, Species::Dmel))
        );
        assert!(index.entries().iter().all(|e| e.key.category == Category::Gene));
        assert_eq!(gene_originals(&index), vec!["BRAT", "TRIM3", "HOXA9"]);
        assert!(index.entries().iter().all(|e| e.canonical == e.key.original));
    }

    #[test]
    fn test_native_species_tag_is_not_cross_species() {
        let dataset = FakeDataset::dmel_full();
        let index = SearchIndex::build(&dataset, Some(Species::Dmel), &tables()).unwrap();

        assert!(index.cross_species().is_none());
        assert!(index
            .entries()
            .iter()
            .any(|e| e.key.category == Category::Regulon));
    }

    #[test]
    fn test_tag_without_table_falls_back_to_native() {
        let dataset = FakeDataset::new(Species::Hsap).with_genes(&["TP53"]);
        let index = SearchIndex::build(&dataset, Some(Species::Mmus), &tables()).unwrap();

        assert!(index.cross_species().is_none());
        assert_eq!(gene_originals(&index), vec!["TP53"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let dataset = FakeDataset::dmel_full();
        let first = SearchIndex::build(&dataset, None, &tables()).unwrap();
        let second = SearchIndex::build(&dataset, None, &tables()).unwrap();
        assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn test_missing_species_is_invalid_dataset() {
        let dataset = FakeDataset::broken();
        let err = SearchIndex::build(&dataset, None, &tables()).unwrap_err();
        assert!(matches!(err, Error::InvalidDataset { .. }));
    }

    #[test]
    fn test_cross_species_build_requires_gene_list() {
        let dataset = FakeDataset::new(Species::Dmel).without_genes();
        let err = SearchIndex::build(&dataset, Some(Species::Hsap), &tables()).unwrap_err();
        assert!(matches!(err, Error::InvalidDataset { .. }));

        let err = SearchIndex::build(&dataset, None, &tables()).unwrap_err();
        assert!(matches!(err, Error::InvalidDataset { .. }));
    }

    #[test]
    fn test_canonical_lookup_by_key() {
        let dataset = FakeDataset::new(Species::Hsap).with_genes(&["TP53"]);
        let index = SearchIndex::build(&dataset, None, &tables()).unwrap();
        let key = IndexKey {
            normalized: "tp53".to_string(),
            original: "TP53".to_string(),
            category: Category::Gene,
        };
        assert_eq!(index.canonical(&key), Some("TP53"));
    }
}
