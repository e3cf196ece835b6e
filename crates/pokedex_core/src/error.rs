//! Error types for pokedex_core

use thiserror::Error;

/// Errors that can occur while loading or building catalog entities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The catalog source could not deliver a list
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The catalog payload could not be decoded
    #[error("Catalog decoding failed: {0}")]
    Decode(String),

    /// A record violated an entity invariant (empty name, no types, ...)
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// The fetch was cancelled before it completed
    #[error("Fetch cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode(err.to_string())
    }
}

/// Result type for pokedex_core operations
pub type Result<T> = std::result::Result<T, CoreError>;
