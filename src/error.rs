use thiserror::Error;

use crate::catalog::item::ItemId;

/// Failure to produce a usable catalog. No partial catalog is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch catalog {origin}: {reason}")]
    Fetch { origin: String, reason: String },

    #[error("malformed catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("embedded catalog asset not found: {0}")]
    MissingAsset(String),

    #[error("duplicate {kind} id {id} in catalog")]
    DuplicateId { kind: &'static str, id: ItemId },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("not enough items for a session: requested {requested}, available {available}")]
    InsufficientItems { requested: usize, available: usize },

    #[error("sentence {id} lists answer {answer:?} that is not among its options")]
    AnswerNotInOptions { id: ItemId, answer: String },
}
