use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building schemas from configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("collection {collection}: field '{field}' is both a single and a multi reference")]
    ConflictingFieldKind { collection: String, field: String },

    #[error("collection {collection}: reference field '{field}' is not listed in keep")]
    RefFieldNotKept { collection: String, field: String },

    #[error("collection {collection}: field '{field}' is listed more than once in keep")]
    DuplicateField { collection: String, field: String },

    #[error("collection {collection}: slug source is empty")]
    EmptySlugSource { collection: String },

    #[error("aggregation into '{field}' targets unconfigured collection {collection}")]
    UnknownAggregationTarget { collection: String, field: String },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
