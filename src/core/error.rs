use thiserror::Error;

/// Error taxonomy for the chase core
///
/// `Configuration` and `MissingReference` are never returned from the
/// per-tick API. They are produced as diagnostics, logged, and absorbed.
#[derive(Error, Debug)]
pub enum ChaseError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChaseError>;
