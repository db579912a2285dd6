//! Error types for mock resolution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid override pattern {key:?}: {source}")]
    InvalidOverridePattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cyclic schema reference {reference} (via {})", chain.join(" -> "))]
    CyclicSchema {
        reference: String,
        chain: Vec<String>,
    },

    #[error("Schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("Invalid mock options: {message}")]
    InvalidOptions { message: String },

    #[error("Unknown specification document: {spec_key}")]
    UnknownSpec { spec_key: String },
}
