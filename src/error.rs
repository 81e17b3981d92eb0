//! Error types for the portfolio simulator.

use thiserror::Error;

/// Main error type for the simulator.
#[derive(Error, Debug)]
pub enum GymError {
    /// Target weights cannot be applied to the current holdings.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// A quantity is undefined for the current portfolio state.
    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Agent action cannot be normalised into weights.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Episode finished; call reset() before stepping again")]
    EpisodeFinished,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, GymError>;
