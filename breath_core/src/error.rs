//! Error types for the breath_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for breath_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown exercise id
    #[error("Exercise not found: {0}")]
    NotFound(String),

    /// An exercise definition breaks the phase duration invariants
    #[error("Invalid exercise definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    /// The merged catalog is inconsistent
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Session control requested before any exercise was selected
    #[error("No exercise selected")]
    NoExerciseSelected,
}
