//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scope_core::{
    Annotation, Cluster, Clustering, DatasetAccessor, DatasetIdentity, DatasetSource, Error,
    Ortholog, OrthologyTables, Result, Species, SpeciesPair, SynonymTable,
};

#[derive(Debug, Clone)]
pub struct FakeDataset {
    identity: DatasetIdentity,
    species: Option<Species>,
    genes: Option<Vec<String>>,
    clusterings: Option<Vec<Clustering>>,
    regulons: Option<Vec<String>>,
    annotations: Option<Vec<Annotation>>,
}

impl FakeDataset {
    pub fn new(species: Species) -> Self {
        Self {
            identity: DatasetIdentity::from_path(format!("/data/{}.json", species.code())),
            species: Some(species),
            genes: Some(Vec::new()),
            clusterings: None,
            regulons: None,
            annotations: None,
        }
    }

    /// A dataset that cannot report its species.
    pub fn broken() -> Self {
        Self {
            species: None,
            ..Self::new(Species::Dmel)
        }
    }

    /// Fly dataset with genes, one clustering, regulons, and annotations.
    pub fn dmel_full() -> Self {
        Self::new(Species::Dmel)
            .with_genes(&["brat", "Abd-B"])
            .with_clustering("Leiden", &["Neurons", "Glia"])
            .with_regulons(&["brat_(+)", "Abd-B_(+)"])
            .with_annotations(&["tissue", "sex"])
    }

    pub fn with_identity(mut self, path: &str) -> Self {
        self.identity = DatasetIdentity::from_path(path);
        self
    }

    pub fn with_genes(mut self, genes: &[&str]) -> Self {
        self.genes = Some(genes.iter().map(|g| (*g).to_string()).collect());
        self
    }

    /// A dataset with a species but no gene list.
    pub fn without_genes(mut self) -> Self {
        self.genes = None;
        self
    }

    pub fn with_clustering(mut self, name: &str, clusters: &[&str]) -> Self {
        let clusters = clusters
            .iter()
            .zip(0..)
            .map(|(description, id)| Cluster {
                id,
                description: (*description).to_string(),
            })
            .collect();
        let clusterings = self.clusterings.get_or_insert_with(Vec::new);
        let id = clusterings.len() as i64;
        clusterings.push(Clustering {
            id,
            name: name.to_string(),
            clusters,
        });
        self
    }

    pub fn with_regulons(mut self, regulons: &[&str]) -> Self {
        self.regulons = Some(regulons.iter().map(|r| (*r).to_string()).collect());
        self
    }

    pub fn with_annotations(mut self, names: &[&str]) -> Self {
        self.annotations = Some(
            names
                .iter()
                .map(|n| Annotation {
                    name: (*n).to_string(),
                    values: Vec::new(),
                })
                .collect(),
        );
        self
    }
}

impl DatasetAccessor for FakeDataset {
    fn identity(&self) -> &DatasetIdentity {
        &self.identity
    }

    fn infer_species(&self) -> Result<Species> {
        self.species
            .ok_or_else(|| Error::InvalidData("species unknown".to_string()))
    }

    fn genes(&self) -> Result<Vec<String>> {
        self.genes
            .clone()
            .ok_or_else(|| Error::InvalidData("genes unavailable".to_string()))
    }

    fn has_clustering_metadata(&self) -> bool {
        self.clusterings.is_some()
    }

    fn clustering_metadata(&self) -> Result<Vec<Clustering>> {
        Ok(self.clusterings.clone().unwrap_or_default())
    }

    fn has_regulons(&self) -> bool {
        self.regulons.is_some()
    }

    fn regulon_names(&self) -> Result<Vec<String>> {
        Ok(self.regulons.clone().unwrap_or_default())
    }

    fn has_annotation_metadata(&self) -> bool {
        self.annotations.is_some()
    }

    fn annotation_metadata(&self) -> Result<Vec<Annotation>> {
        Ok(self.annotations.clone().unwrap_or_default())
    }
}

/// Dataset source over fixed fakes that counts how often each identity is
/// opened. Opening is slowed down so concurrent callers overlap.
#[derive(Debug, Default)]
pub struct FakeSource {
    datasets: HashMap<DatasetIdentity, Arc<FakeDataset>>,
    opens: AtomicUsize,
    delay: Duration,
}

impl FakeSource {
    pub fn new(datasets: impl IntoIterator<Item = FakeDataset>) -> Self {
        Self {
            datasets: datasets
                .into_iter()
                .map(|d| (d.identity.clone(), Arc::new(d)))
                .collect(),
            opens: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl DatasetSource for FakeSource {
    fn open(&self, identity: &DatasetIdentity) -> Result<Arc<dyn DatasetAccessor>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.datasets
            .get(identity)
            .map(|d| Arc::clone(d) as Arc<dyn DatasetAccessor>)
            .ok_or_else(|| Error::NotFound {
                entity: "dataset",
                id: identity.to_string(),
            })
    }
}

pub const HSAP_DMEL: SpeciesPair = SpeciesPair::new(Species::Hsap, Species::Dmel);
pub const MMUS_DMEL: SpeciesPair = SpeciesPair::new(Species::Mmus, Species::Dmel);

/// Fly synonyms plus human and mouse ortholog tables into fly.
pub fn tables() -> OrthologyTables {
    let mut tables = OrthologyTables::new();

    let synonyms: SynonymTable = [
        ("brat", "brat"),
        ("CG10719", "brat"),
        ("CG9999", "zzz"),
        ("Abd-B", "Abd-B"),
        ("CG11648", "Abd-B"),
    ]
    .into_iter()
    .collect();
    tables.set_synonyms(Species::Dmel, synonyms);

    tables.add_ortholog(HSAP_DMEL, "BRAT", Ortholog::new("brat", 97.5));
    tables.add_ortholog(HSAP_DMEL, "TRIM3", Ortholog::new("brat", 45.0));
    tables.add_ortholog(HSAP_DMEL, "TRIM3", Ortholog::new("wech", 31.0));
    tables.add_ortholog(HSAP_DMEL, "HOXA9", Ortholog::new("Abd-B", 60.25));

    tables.add_ortholog(MMUS_DMEL, "Trim3", Ortholog::new("brat", 44.0));

    tables
}
