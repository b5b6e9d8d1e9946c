//! Error types for navguard Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid route name: {0}")]
    InvalidRoute(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    // Route registry errors
    #[error("Route registry error: {0}")]
    Registry(String),

    #[error("Route source '{source_name}' failed: {message}")]
    RouteSource {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
