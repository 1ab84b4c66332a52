//! Ortholog and synonym tables.
//!
//! Both are static, read-only lookups loaded once at start-up. Tables keep
//! insertion order so anything built from them (search indices in
//! particular) is deterministic for identical inputs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::species::{Species, SpeciesPair};

/// A gene in another species with its percent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ortholog {
    pub gene: String,
    /// Percent identity as supplied by the source table (e.g. `97.5`).
    pub identity: f64,
}

impl Ortholog {
    #[must_use]
    pub fn new(gene: impl Into<String>, identity: f64) -> Self {
        Self {
            gene: gene.into(),
            identity,
        }
    }
}

/// Read-only supplier of ortholog and synonym lookups.
pub trait OrthologProvider: Send + Sync + fmt::Debug {
    /// Whether a translation table exists for `pair`.
    fn has_orthologs(&self, pair: SpeciesPair) -> bool;

    /// Every source-species gene with at least one ortholog, in table order.
    fn source_genes(&self, pair: SpeciesPair) -> Vec<String>;

    /// Orthologs in the target species for one source-species gene.
    fn orthologs(&self, pair: SpeciesPair, gene: &str) -> Vec<Ortholog>;

    /// Literal-to-canonical gene name table for a species, if one exists.
    fn synonyms(&self, species: Species) -> Option<&SynonymTable>;
}

/// Ordered mapping from a literal gene spelling to its canonical name.
///
/// Re-inserting a literal replaces its canonical name but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynonymTable {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl SynonymTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, literal: impl Into<String>, canonical: impl Into<String>) {
        let literal = literal.into();
        let canonical = canonical.into();
        if let Some(&pos) = self.positions.get(&literal) {
            self.entries[pos].1 = canonical;
        } else {
            self.positions.insert(literal.clone(), self.entries.len());
            self.entries.push((literal, canonical));
        }
    }

    /// Canonical name for a literal spelling.
    pub fn canonical(&self, literal: &str) -> Option<&str> {
        self.positions
            .get(literal)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// `(literal, canonical)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, C: Into<String>> FromIterator<(L, C)> for SynonymTable {
    fn from_iter<I: IntoIterator<Item = (L, C)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (literal, canonical) in iter {
            table.insert(literal, canonical);
        }
        table
    }
}

/// Orthologs for one species pair, keyed by source gene.
#[derive(Debug, Clone, Default, PartialEq)]
struct OrthologTable {
    source_genes: Vec<String>,
    targets: HashMap<String, Vec<Ortholog>>,
}

impl OrthologTable {
    fn insert(&mut self, source_gene: String, ortholog: Ortholog) {
        let targets = self.targets.entry(source_gene).or_insert_with_key(|gene| {
            self.source_genes.push(gene.clone());
            Vec::new()
        });
        targets.push(ortholog);
    }
}

/// In-memory [`OrthologProvider`].
#[derive(Debug, Clone, Default)]
pub struct OrthologyTables {
    pairs: HashMap<SpeciesPair, OrthologTable>,
    synonyms: HashMap<Species, SynonymTable>,
}

impl OrthologyTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ortholog of `source_gene` for `pair`. Multiple orthologs
    /// per source gene accumulate in insertion order.
    pub fn add_ortholog(
        &mut self,
        pair: SpeciesPair,
        source_gene: impl Into<String>,
        ortholog: Ortholog,
    ) {
        self.pairs
            .entry(pair)
            .or_default()
            .insert(source_gene.into(), ortholog);
    }

    /// Install (or replace) the synonym table for a species.
    pub fn set_synonyms(&mut self, species: Species, table: SynonymTable) {
        if self.synonyms.insert(species, table).is_some() {
            log::warn!("Replaced existing {} synonym table", species);
        }
    }

    /// Species pairs with a translation table, sorted.
    pub fn pairs(&self) -> Vec<SpeciesPair> {
        let mut pairs: Vec<SpeciesPair> = self.pairs.keys().copied().collect();
        pairs.sort();
        pairs
    }

    /// Number of source genes for a pair.
    pub fn gene_count(&self, pair: SpeciesPair) -> usize {
        self.pairs.get(&pair).map_or(0, |t| t.source_genes.len())
    }
}

impl OrthologProvider for OrthologyTables {
    fn has_orthologs(&self, pair: SpeciesPair) -> bool {
        self.pairs.contains_key(&pair)
    }

    fn source_genes(&self, pair: SpeciesPair) -> Vec<String> {
        self.pairs
            .get(&pair)
            .map(|t| t.source_genes.clone())
            .unwrap_or_default()
    }

    fn orthologs(&self, pair: SpeciesPair, gene: &str) -> Vec<Ortholog> {
        self.pairs
            .get(&pair)
            .and_then(|t| t.targets.get(gene))
            .cloned()
            .unwrap_or_default()
    }

    fn synonyms(&self, species: Species) -> Option<&SynonymTable> {
        self.synonyms.get(&species)
    }
}
