//! Raw query parsing.

use scope_core::Species;

/// Separates a species prefix from the query text, as in `hsap\TP53`.
pub const PREFIX_DELIMITER: char = '\\';

/// A feature query with its optional cross-species prefix removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuery<'a> {
    /// Species the query text is written in, when prefixed.
    pub cross_species: Option<Species>,
    /// Query text after the prefix, not yet case-folded.
    pub text: &'a str,
}

impl<'a> ParsedQuery<'a> {
    /// Split a recognised `<code>\` prefix off `raw`.
    ///
    /// Prefixes must match a species code exactly. Anything else, including
    /// an unknown code, is left in the query text and matched literally.
    pub fn parse(raw: &'a str) -> Self {
        if let Some((prefix, rest)) = raw.split_once(PREFIX_DELIMITER) {
            if let Some(species) = Species::ALL.into_iter().find(|s| s.code() == prefix) {
                return Self {
                    cross_species: Some(species),
                    text: rest,
                };
            }
        }
        Self {
            cross_species: None,
            text: raw,
        }
    }
}
