//! Error types for pokedex_animation

use thiserror::Error;

/// Errors raised when configuring animations
///
/// Runtime sampling never fails: bad timing inputs are clamped instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Spring parameters that would make the oscillator non-finite
    #[error("Invalid spring parameters: {0}")]
    InvalidSpring(String),

    /// Motion configuration out of range or unparsable
    #[error("Invalid motion configuration: {0}")]
    InvalidConfig(String),
}

impl From<toml::de::Error> for AnimationError {
    fn from(err: toml::de::Error) -> Self {
        AnimationError::InvalidConfig(err.to_string())
    }
}

/// Result type for pokedex_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
