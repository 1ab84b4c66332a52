//! Species vocabulary shared by datasets, orthology tables, and queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A species whose genes can be indexed or translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// *Homo sapiens*.
    Hsap,
    /// *Mus musculus*.
    Mmus,
    /// *Drosophila melanogaster*.
    Dmel,
}

/// Short codes and display labels for each [`Species`] variant. Codes double
/// as query prefixes and orthology file name components.
const SPECIES_NAMES: &[(Species, &str, &str)] = &[
    (Species::Hsap, "hsap", "Human"),
    (Species::Mmus, "mmus", "Mouse"),
    (Species::Dmel, "dmel", "Drosophila"),
];

impl Species {
    /// All supported species, in declaration order.
    pub const ALL: [Species; 3] = [Species::Hsap, Species::Mmus, Species::Dmel];

    /// The four-letter species code (e.g. `"hsap"`).
    pub fn code(self) -> &'static str {
        SPECIES_NAMES
            .iter()
            .find(|(s, _, _)| *s == self)
            .map(|(_, code, _)| *code)
            .unwrap_or("unknown")
    }

    /// The human-readable label used in ortholog descriptions.
    pub fn label(self) -> &'static str {
        SPECIES_NAMES
            .iter()
            .find(|(s, _, _)| *s == self)
            .map(|(_, _, label)| *label)
            .unwrap_or("Unknown")
    }

    /// Look up a species by code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Self> {
        SPECIES_NAMES
            .iter()
            .find(|(_, c, _)| c.eq_ignore_ascii_case(code))
            .map(|(s, _, _)| *s)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Species {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| Error::UnrecognizedSpecies(s.to_string()))
    }
}

/// A directed translation from one species' gene namespace to another's.
///
/// `source` is the namespace the user types in; `target` is the dataset's
/// own namespace that results are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesPair {
    pub source: Species,
    pub target: Species,
}

impl SpeciesPair {
    #[must_use]
    pub const fn new(source: Species, target: Species) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for SpeciesPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.label(), self.target.label())
    }
}
