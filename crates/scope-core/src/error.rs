use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid dataset {dataset}: {reason}")]
    InvalidDataset { dataset: String, reason: String },

    #[error("unrecognized species: {0}")]
    UnrecognizedSpecies(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidDataset`].
    pub fn invalid_dataset(dataset: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidDataset {
            dataset: dataset.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` when the caller supplied bad input rather than the
    /// system failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedSpecies(_) | Self::NotFound { .. } | Self::InvalidDataset { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
